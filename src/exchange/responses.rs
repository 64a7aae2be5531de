// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wire types for the MEXC contract REST API.

use crate::exchange::ExchangeError;
use serde::{Deserialize, Deserializer};

/// Common response wrapper: `{"success": .., "code": .., "data": ..}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Default> Envelope<T> {
    /// Unwrap the payload, turning `success: false` into an API error.
    pub fn into_result(self) -> Result<T, ExchangeError> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(ExchangeError::Api {
                code: self.code,
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

/// One entry of `open_positions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    #[serde(default)]
    pub symbol: Option<String>,
    /// 1 = long, 2 = short.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub position_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hold_vol: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hold_avg_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open_avg_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub take_profit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stop_loss_price: Option<f64>,
}

impl PositionRecord {
    /// Entry price, preferring the holding average over the opening average.
    pub fn entry_price(&self) -> Option<f64> {
        self.hold_avg_price.or(self.open_avg_price)
    }
}

/// An open order or a position stop order; both may carry attached TP/SL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedTriggerRecord {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub take_profit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stop_loss_price: Option<f64>,
}

/// A standalone plan (trigger) order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOrderRecord {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trigger_price: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stop_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
}

impl PlanOrderRecord {
    /// Upper-cased concatenation of every textual kind field.
    pub fn label_text(&self) -> String {
        [&self.kind, &self.order_type, &self.stop_type, &self.label]
            .iter()
            .filter_map(|f| f.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }
}

/// List payload; some endpoints page it under `resultList`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrderList<T> {
    Plain(Vec<T>),
    Paged {
        #[serde(rename = "resultList")]
        result_list: Vec<T>,
    },
    Empty,
}

impl<T> Default for OrderList<T> {
    fn default() -> Self {
        OrderList::Empty
    }
}

impl<T> OrderList<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OrderList::Plain(items) => items,
            OrderList::Paged { result_list } => result_list,
            OrderList::Empty => Vec::new(),
        }
    }
}

/// Accept a JSON number or numeric string; anything else is absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Labels come back as strings on some endpoints and integer codes on others.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_record_accepts_numbers_and_strings() {
        let json = r#"{
            "symbol": "BTC_USDT",
            "positionType": 1,
            "holdVol": "2",
            "holdAvgPrice": 50000.5,
            "takeProfitPrice": null
        }"#;
        let record: PositionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.symbol.as_deref(), Some("BTC_USDT"));
        assert_eq!(record.position_type, Some(1));
        assert_eq!(record.hold_vol, Some(2.0));
        assert_eq!(record.entry_price(), Some(50000.5));
        assert_eq!(record.take_profit_price, None);
        assert_eq!(record.stop_loss_price, None);
    }

    #[test]
    fn unparseable_volume_is_absent() {
        let record: PositionRecord =
            serde_json::from_str(r#"{"symbol": "ETH_USDT", "holdVol": "abc"}"#).unwrap();
        assert_eq!(record.hold_vol, None);
    }

    #[test]
    fn entry_falls_back_to_open_average() {
        let record: PositionRecord =
            serde_json::from_str(r#"{"symbol": "ETH_USDT", "openAvgPrice": 3000}"#).unwrap();
        assert_eq!(record.entry_price(), Some(3000.0));
    }

    #[test]
    fn envelope_failure_becomes_api_error() {
        let env: Envelope<Vec<PositionRecord>> =
            serde_json::from_str(r#"{"success": false, "code": 602, "message": "Signature verification failed"}"#)
                .unwrap();
        match env.into_result() {
            Err(ExchangeError::Api { code, message }) => {
                assert_eq!(code, 602);
                assert_eq!(message, "Signature verification failed");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn envelope_success_without_data_is_empty() {
        let env: Envelope<Vec<PositionRecord>> =
            serde_json::from_str(r#"{"success": true, "code": 0}"#).unwrap();
        assert!(env.into_result().unwrap().is_empty());
    }

    #[test]
    fn order_list_plain_and_paged() {
        let plain: OrderList<AttachedTriggerRecord> =
            serde_json::from_str(r#"[{"takeProfitPrice": 1.5}]"#).unwrap();
        assert_eq!(plain.into_vec().len(), 1);

        let paged: OrderList<AttachedTriggerRecord> =
            serde_json::from_str(r#"{"resultList": [{"stopLossPrice": "0.9"}, {}]}"#).unwrap();
        let items = paged.into_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].stop_loss_price, Some(0.9));
    }

    #[test]
    fn plan_order_label_combines_kind_fields() {
        let record: PlanOrderRecord = serde_json::from_str(
            r#"{"triggerPrice": "52000", "type": "take_profit_market", "orderType": 5}"#,
        )
        .unwrap();
        assert_eq!(record.trigger_price, Some(52000.0));
        assert_eq!(record.label_text(), "TAKE_PROFIT_MARKET 5");
    }
}
