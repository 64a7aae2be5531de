// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! The reconciliation loop.

use crate::exchange::{ExchangeError, PositionFeed};
use crate::monitor::message::render;
use crate::monitor::reconcile::{diff, PositionEvent};
use crate::monitor::schedule::PollState;
use crate::monitor::{Notifier, PollSchedule};
use crate::position::{Position, Snapshot, TriggerResolver};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

/// Owns the previous snapshot and the poll schedule for the process lifetime.
pub struct PositionWatcher<F, N> {
    feed: F,
    resolver: TriggerResolver,
    notifier: N,
    previous: Snapshot,
    schedule: PollSchedule,
}

impl<F: PositionFeed, N: Notifier> PositionWatcher<F, N> {
    pub fn new(feed: F, resolver: TriggerResolver, notifier: N) -> Self {
        Self {
            feed,
            resolver,
            notifier,
            previous: Snapshot::new(),
            schedule: PollSchedule::new(),
        }
    }

    /// Snapshot from the last successful cycle.
    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    #[cfg(test)]
    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    /// Poll until `shutdown` resolves. `shutdown` is polled once before the
    /// first cycle, then observed while sleeping between cycles.
    pub async fn run<S>(&mut self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("🛑 Stop signal received before first poll, exiting.");
                return;
            }
            _ = std::future::ready(()) => {}
        }
        info!("📊 Position watcher started");

        loop {
            let delay = self.poll_once().await;

            tokio::select! {
                _ = &mut shutdown => {
                    info!("🛑 Stop signal received, exiting.");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One fetch-resolve-diff-notify cycle. Returns how long to sleep.
    pub async fn poll_once(&mut self) -> Duration {
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                if self.schedule.state() == PollState::Backoff {
                    info!("✅ Fetch recovered");
                }
                let events = diff(&self.previous, &snapshot);
                for event in &events {
                    self.announce(event).await;
                }
                debug!(
                    "Cycle complete: {} open, {} notifications",
                    snapshot.len(),
                    events.len()
                );
                self.previous = snapshot;
                self.schedule.on_success()
            }
            Err(e) => {
                let delay = self.schedule.on_failure();
                error!(
                    "❌ Fetch failed: {} (retrying in {}s)",
                    e,
                    self.schedule.delay_secs()
                );
                delay
            }
        }
    }

    /// Fetch open positions and fill in any missing TP/SL.
    async fn fetch_snapshot(&self) -> Result<Snapshot, ExchangeError> {
        let records = self.feed.fetch_positions().await?;
        let mut snapshot = Snapshot::new();

        for record in &records {
            let Some(mut position) = Position::from_record(record) else {
                continue;
            };
            if !position.triggers.is_complete() {
                position.triggers = self
                    .resolver
                    .resolve(&position.symbol, position.triggers)
                    .await;
            }
            snapshot.insert(position);
        }

        Ok(snapshot)
    }

    async fn announce(&self, event: &PositionEvent) {
        match event {
            PositionEvent::Opened(p) => info!("🆕 Opened: {} {}", p.symbol, p.side),
            PositionEvent::Updated { position, .. } => info!(
                "✏️ TP/SL changed: {} TP={:?} SL={:?}",
                position.symbol, position.triggers.take_profit, position.triggers.stop_loss
            ),
            PositionEvent::Closed { symbol } => info!("🔒 Closed: {}", symbol),
        }
        self.notifier.notify(&render(event)).await;
    }
}
