// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration module - loads settings from environment variables.

use secrecy::SecretString;
use thiserror::Error;

/// Default MEXC contract (swap) REST endpoint.
const DEFAULT_CONTRACT_URL: &str = "https://contract.mexc.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    // Exchange
    pub api_key: String,
    pub api_secret: SecretString,
    pub contract_url: String,

    // Telegram
    pub telegram_token: SecretString,
    pub telegram_chat_id: String,
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: required(&lookup, "API_KEY")?,
            api_secret: SecretString::from(required(&lookup, "API_SECRET")?),
            contract_url: lookup("MEXC_CONTRACT_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTRACT_URL.to_string()),

            telegram_token: SecretString::from(required(&lookup, "BOT_TOKEN")?),
            telegram_chat_id: required(&lookup, "CHAT_ID")?,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("contract_url", &self.contract_url)
            .field("telegram_token", &"[REDACTED]")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}
