// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! TP/SL resolution from fallback order sources.

use crate::exchange::{AttachedTriggerRecord, ExchangeError, MexcClient, PlanOrderRecord};
use crate::position::TriggerPair;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// One place TP/SL prices can be read from.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn lookup(&self, symbol: &str) -> Result<TriggerPair, ExchangeError>;
}

/// Applies sources in priority order until both sides are known.
pub struct TriggerResolver {
    sources: Vec<Box<dyn TriggerSource>>,
}

impl TriggerResolver {
    pub fn new(sources: Vec<Box<dyn TriggerSource>>) -> Self {
        Self { sources }
    }

    /// Default MEXC chain: open orders, then stop orders, then plan orders.
    pub fn for_mexc(client: Arc<MexcClient>) -> Self {
        Self::new(vec![
            Box::new(OpenOrderTriggers::new(Arc::clone(&client))),
            Box::new(StopOrderTriggers::new(Arc::clone(&client))),
            Box::new(PlanOrderTriggers::new(client)),
        ])
    }

    /// Complete `known` for `symbol`. Source failures count as "no data".
    pub async fn resolve(&self, symbol: &str, known: TriggerPair) -> TriggerPair {
        let mut resolved = known;

        for source in &self.sources {
            if resolved.is_complete() {
                break;
            }
            match source.lookup(symbol).await {
                Ok(found) => resolved.fill_from(found),
                Err(e) => debug!("{} lookup failed for {}: {}", source.name(), symbol, e),
            }
        }

        resolved
    }
}

/// First positive TP and first positive SL across attached-trigger records.
fn first_attached(records: &[AttachedTriggerRecord]) -> TriggerPair {
    let mut pair = TriggerPair::default();
    for record in records {
        pair.fill_from(TriggerPair::new(record.take_profit_price, record.stop_loss_price));
        if pair.is_complete() {
            break;
        }
    }
    pair
}

/// Plan orders labelled as take-profit or stop-loss.
fn labelled_plan_triggers(records: &[PlanOrderRecord]) -> TriggerPair {
    let mut pair = TriggerPair::default();
    for record in records {
        let label = record.label_text();
        if label.contains("TAKE_PROFIT") {
            pair.fill_from(TriggerPair::new(record.trigger_price, None));
        }
        if label.contains("STOP_LOSS") {
            pair.fill_from(TriggerPair::new(None, record.trigger_price));
        }
        if pair.is_complete() {
            break;
        }
    }
    pair
}

/// Open orders with TP/SL attached.
pub struct OpenOrderTriggers {
    client: Arc<MexcClient>,
}

impl OpenOrderTriggers {
    pub fn new(client: Arc<MexcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TriggerSource for OpenOrderTriggers {
    fn name(&self) -> &'static str {
        "open-orders"
    }

    async fn lookup(&self, symbol: &str) -> Result<TriggerPair, ExchangeError> {
        let orders = self.client.open_orders(symbol).await?;
        Ok(first_attached(&orders))
    }
}

/// Position stop orders (the combined TP/SL list).
pub struct StopOrderTriggers {
    client: Arc<MexcClient>,
}

impl StopOrderTriggers {
    pub fn new(client: Arc<MexcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TriggerSource for StopOrderTriggers {
    fn name(&self) -> &'static str {
        "stop-orders"
    }

    async fn lookup(&self, symbol: &str) -> Result<TriggerPair, ExchangeError> {
        let orders = self.client.stop_orders(symbol).await?;
        Ok(first_attached(&orders))
    }
}

/// Standalone plan orders, matched by label.
pub struct PlanOrderTriggers {
    client: Arc<MexcClient>,
}

impl PlanOrderTriggers {
    pub fn new(client: Arc<MexcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TriggerSource for PlanOrderTriggers {
    fn name(&self) -> &'static str {
        "plan-orders"
    }

    async fn lookup(&self, symbol: &str) -> Result<TriggerPair, ExchangeError> {
        let orders = self.client.plan_orders(symbol).await?;
        Ok(labelled_plan_triggers(&orders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted source that counts how often it is asked.
    struct FixedSource {
        result: Option<TriggerPair>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        fn boxed(result: Option<TriggerPair>, calls: &Arc<AtomicUsize>) -> Box<dyn TriggerSource> {
            Box::new(Self {
                result,
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait]
    impl TriggerSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn lookup(&self, _symbol: &str) -> Result<TriggerPair, ExchangeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .ok_or_else(|| ExchangeError::Connection("boom".into()))
        }
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn embedded_values_skip_every_source() {
        let calls = counter();
        let resolver = TriggerResolver::new(vec![FixedSource::boxed(
            Some(TriggerPair::new(Some(1.0), Some(2.0))),
            &calls,
        )]);

        let known = TriggerPair::new(Some(52000.0), Some(48000.0));
        assert_eq!(resolver.resolve("BTC_USDT", known).await, known);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_value_per_side_wins() {
        let (a, b, c) = (counter(), counter(), counter());
        let resolver = TriggerResolver::new(vec![
            FixedSource::boxed(Some(TriggerPair::new(None, Some(48000.0))), &a),
            FixedSource::boxed(Some(TriggerPair::new(Some(52000.0), Some(47000.0))), &b),
            FixedSource::boxed(Some(TriggerPair::new(Some(53000.0), None)), &c),
        ]);

        let resolved = resolver.resolve("BTC_USDT", TriggerPair::default()).await;
        assert_eq!(resolved, TriggerPair::new(Some(52000.0), Some(48000.0)));
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(c.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_source_is_skipped() {
        let (a, b) = (counter(), counter());
        let resolver = TriggerResolver::new(vec![
            FixedSource::boxed(None, &a),
            FixedSource::boxed(Some(TriggerPair::new(Some(52000.0), None)), &b),
        ]);

        let resolved = resolver.resolve("BTC_USDT", TriggerPair::default()).await;
        assert_eq!(resolved, TriggerPair::new(Some(52000.0), None));
        assert_eq!(a.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_sources_failing_leaves_sides_absent() {
        let calls = counter();
        let resolver = TriggerResolver::new(vec![
            FixedSource::boxed(None, &calls),
            FixedSource::boxed(None, &calls),
        ]);

        let known = TriggerPair::new(None, Some(48000.0));
        assert_eq!(resolver.resolve("BTC_USDT", known).await, known);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn attached_records_take_first_positive_value() {
        let records = vec![
            AttachedTriggerRecord {
                take_profit_price: Some(0.0),
                stop_loss_price: None,
            },
            AttachedTriggerRecord {
                take_profit_price: Some(52000.0),
                stop_loss_price: None,
            },
            AttachedTriggerRecord {
                take_profit_price: Some(60000.0),
                stop_loss_price: Some(48000.0),
            },
        ];
        assert_eq!(
            first_attached(&records),
            TriggerPair::new(Some(52000.0), Some(48000.0))
        );
    }

    #[test]
    fn plan_orders_match_labels_case_insensitively() {
        let records = vec![
            PlanOrderRecord {
                trigger_price: Some(51000.0),
                kind: Some("limit".into()),
                ..Default::default()
            },
            PlanOrderRecord {
                trigger_price: Some(47000.0),
                order_type: Some("stop_loss_market".into()),
                ..Default::default()
            },
            PlanOrderRecord {
                trigger_price: Some(53000.0),
                label: Some("Take_Profit".into()),
                ..Default::default()
            },
        ];
        assert_eq!(
            labelled_plan_triggers(&records),
            TriggerPair::new(Some(53000.0), Some(47000.0))
        );
    }

    #[test]
    fn unlabelled_plan_orders_yield_nothing() {
        let records = vec![PlanOrderRecord {
            trigger_price: Some(51000.0),
            ..Default::default()
        }];
        assert_eq!(labelled_plan_triggers(&records), TriggerPair::default());
    }
}
