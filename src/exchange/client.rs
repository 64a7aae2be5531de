// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! MEXC contract REST client (private, read-only endpoints).

use crate::config::Config;
use crate::exchange::responses::{
    AttachedTriggerRecord, Envelope, OrderList, PlanOrderRecord, PositionRecord,
};
use crate::exchange::{ExchangeError, PositionFeed, RequestSigner};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Request timeout for exchange calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Minimum gap between two private requests (MEXC allows 20 per 2s).
const REQUEST_SPACING: Duration = Duration::from_millis(100);

const OPEN_POSITIONS_PATH: &str = "/api/v1/private/position/open_positions";
const OPEN_ORDERS_PATH: &str = "/api/v1/private/order/list/open_orders";
const STOP_ORDERS_PATH: &str = "/api/v1/private/stoporder/list/orders";
const PLAN_ORDERS_PATH: &str = "/api/v1/private/planorder/list/orders";

/// Authenticated client for the MEXC swap API.
pub struct MexcClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_secret: SecretString,
    /// When the last request was sent.
    last_request: Mutex<Option<Instant>>,
}

impl MexcClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        api_secret: SecretString,
    ) -> Result<Self, ExchangeError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExchangeError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
            last_request: Mutex::new(None),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ExchangeError> {
        Self::new(
            &config.contract_url,
            config.api_key.clone(),
            config.api_secret.clone(),
        )
    }

    /// All open positions on the account.
    pub async fn open_positions(&self) -> Result<Vec<PositionRecord>, ExchangeError> {
        self.get_private(OPEN_POSITIONS_PATH, &[]).await
    }

    /// Open orders for `symbol`; these may carry attached TP/SL.
    pub async fn open_orders(&self, symbol: &str) -> Result<Vec<AttachedTriggerRecord>, ExchangeError> {
        let path = format!("{}/{}", OPEN_ORDERS_PATH, symbol);
        let list: OrderList<AttachedTriggerRecord> = self
            .get_private(&path, &[("page_num", "1"), ("page_size", "100")])
            .await?;
        Ok(list.into_vec())
    }

    /// Unfinished position stop orders for `symbol`.
    pub async fn stop_orders(&self, symbol: &str) -> Result<Vec<AttachedTriggerRecord>, ExchangeError> {
        let list: OrderList<AttachedTriggerRecord> = self
            .get_private(STOP_ORDERS_PATH, &[("symbol", symbol), ("is_finished", "0")])
            .await?;
        Ok(list.into_vec())
    }

    /// Untriggered plan orders for `symbol`.
    pub async fn plan_orders(&self, symbol: &str) -> Result<Vec<PlanOrderRecord>, ExchangeError> {
        let list: OrderList<PlanOrderRecord> = self
            .get_private(PLAN_ORDERS_PATH, &[("symbol", symbol), ("states", "1")])
            .await?;
        Ok(list.into_vec())
    }

    /// Signed GET returning the envelope payload.
    async fn get_private<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned + Default,
    {
        self.throttle().await;

        let query = RequestSigner::param_string(params);
        let request_time = chrono::Utc::now().timestamp_millis();
        let signature = RequestSigner::new(&self.api_key, &self.api_secret).sign(request_time, &query);

        let url = self.build_url(path, &query);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("ApiKey", &self.api_key)
            .header("Request-Time", request_time.to_string())
            .header("Signature", signature)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse response from {}: {}", path, e);
            ExchangeError::Parse(e.to_string())
        })?;

        envelope.into_result()
    }

    /// Wait until at least [`REQUEST_SPACING`] has passed since the previous request.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            tokio::time::sleep_until(prev + REQUEST_SPACING).await;
        }
        *last = Some(Instant::now());
    }

    fn build_url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }
}

#[async_trait]
impl PositionFeed for MexcClient {
    async fn fetch_positions(&self) -> Result<Vec<PositionRecord>, ExchangeError> {
        self.open_positions().await
    }
}
