// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Position Watch - Telegram alerts for MEXC swap positions and their TP/SL.

mod config;
mod exchange;
mod monitor;
mod position;
mod telegram;

use config::Config;
use exchange::MexcClient;
use monitor::{Notifier, PositionWatcher};
use position::TriggerResolver;
use telegram::TelegramNotifier;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Position Watch starting...");

    // Installed before any network work so an early Ctrl-C still stops cleanly.
    let shutdown = shutdown_signal()?;

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load config: {}", e);
        e
    })?;

    info!("📡 Exchange: {}", config.contract_url);

    let client = Arc::new(MexcClient::from_config(&config)?);
    let telegram = TelegramNotifier::new(&config.telegram_token, &config.telegram_chat_id)
        .map_err(anyhow::Error::msg)?;

    let resolver = TriggerResolver::for_mexc(Arc::clone(&client));
    let mut watcher = PositionWatcher::new(client, resolver, telegram.clone());

    telegram.notify("🚀 Position watcher started").await;
    info!("✅ Watching open positions");

    watcher.run(shutdown).await;

    info!("🛑 Stopped with {} open positions tracked", watcher.previous().len());
    telegram.notify("🛑 Position watcher stopped").await;
    Ok(())
}

type Shutdown = Pin<Box<dyn Future<Output = ()>>>;

/// Register the interrupt handler now; the returned future resolves on Ctrl-C.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<Shutdown> {
    let mut interrupt = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    Ok(Box::pin(async move {
        interrupt.recv().await;
    }))
}

#[cfg(windows)]
fn shutdown_signal() -> std::io::Result<Shutdown> {
    let mut ctrl_c = signal::windows::ctrl_c()?;
    Ok(Box::pin(async move {
        ctrl_c.recv().await;
    }))
}
