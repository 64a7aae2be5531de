// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Telegram notifier module.

use crate::monitor::Notifier;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::{debug, error, info};

/// Deadline for a single send.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    pub fn new(token: &SecretString, chat_id: &str) -> Result<Self, String> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build Telegram client: {}", e))?;

        info!("📱 Initializing Telegram: chat={}", chat_id.trim());
        let recipient = parse_recipient(chat_id);

        Ok(Self {
            bot: Bot::with_client(token.expose_secret(), client),
            recipient,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        match self.bot.send_message(self.recipient.clone(), text).await {
            Ok(_) => debug!("📤 Sent Telegram message"),
            Err(e) => error!("Telegram send error: {}", e),
        }
    }
}

/// Numeric ids are chats; anything else is treated as a channel username.
fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_chat_id() {
        assert_eq!(parse_recipient("-100123"), Recipient::Id(ChatId(-100123)));
        assert_eq!(parse_recipient(" 42 "), Recipient::Id(ChatId(42)));
    }

    #[test]
    fn channel_username() {
        assert_eq!(
            parse_recipient("@positions"),
            Recipient::ChannelUsername("@positions".into())
        );
    }
}
