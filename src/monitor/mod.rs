// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Poll-diff-notify loop over the account's open positions.

pub mod message;
pub mod reconcile;
pub mod schedule;
pub mod watcher;

pub use reconcile::PositionEvent;
pub use schedule::PollSchedule;
pub use watcher::PositionWatcher;

use async_trait::async_trait;

/// Outbound message channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Best effort: implementations log their own failures and never retry.
    async fn notify(&self, text: &str);
}
