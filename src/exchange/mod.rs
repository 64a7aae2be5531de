// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exchange access: MEXC contract REST client and wire types.

mod client;
mod error;
mod responses;
mod signer;

pub use client::MexcClient;
pub use error::ExchangeError;
pub use responses::{AttachedTriggerRecord, PlanOrderRecord, PositionRecord};
pub use signer::RequestSigner;

use async_trait::async_trait;

/// Source of the account's current position records.
#[async_trait]
pub trait PositionFeed: Send + Sync {
    async fn fetch_positions(&self) -> Result<Vec<PositionRecord>, ExchangeError>;
}

#[async_trait]
impl<T: PositionFeed + ?Sized> PositionFeed for std::sync::Arc<T> {
    async fn fetch_positions(&self) -> Result<Vec<PositionRecord>, ExchangeError> {
        (**self).fetch_positions().await
    }
}
