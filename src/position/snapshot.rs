// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Open positions and the per-cycle snapshot.

use crate::exchange::PositionRecord;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
    Unknown,
}

impl Side {
    /// Map the exchange's `positionType` code.
    pub fn from_position_type(code: Option<i64>) -> Self {
        match code {
            Some(1) => Side::Long,
            Some(2) => Side::Short,
            _ => Side::Unknown,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
            Side::Unknown => write!(f, "unknown"),
        }
    }
}

/// Take-profit / stop-loss prices. `None` covers both "not configured" and
/// "could not be resolved".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriggerPair {
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl TriggerPair {
    pub fn new(take_profit: Option<f64>, stop_loss: Option<f64>) -> Self {
        Self {
            take_profit: valid_price(take_profit),
            stop_loss: valid_price(stop_loss),
        }
    }

    /// Both sides resolved.
    pub fn is_complete(&self) -> bool {
        self.take_profit.is_some() && self.stop_loss.is_some()
    }

    /// Fill only the sides that are still unresolved; existing values win.
    pub fn fill_from(&mut self, other: TriggerPair) {
        if self.take_profit.is_none() {
            self.take_profit = valid_price(other.take_profit);
        }
        if self.stop_loss.is_none() {
            self.stop_loss = valid_price(other.stop_loss);
        }
    }
}

/// Zero or negative trigger prices mean "not set" on the exchange.
fn valid_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

/// One open position as observed in a poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub entry_price: Option<f64>,
    pub contracts: f64,
    pub triggers: TriggerPair,
}

impl Position {
    /// Convert an exchange record, dropping anything that is not an open position.
    pub fn from_record(record: &PositionRecord) -> Option<Self> {
        let symbol = record.symbol.as_deref().map(str::trim).unwrap_or_default();
        if symbol.is_empty() {
            return None;
        }

        let contracts = record.hold_vol.unwrap_or(0.0);
        if !(contracts > 0.0) {
            debug!("Skipping {} with {} contracts", symbol, contracts);
            return None;
        }

        Some(Self {
            symbol: symbol.to_string(),
            side: Side::from_position_type(record.position_type),
            entry_price: record.entry_price(),
            contracts,
            triggers: TriggerPair::new(record.take_profit_price, record.stop_loss_price),
        })
    }
}

/// Every open position of one cycle, keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    positions: HashMap<String, Position>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position. Closed positions are rejected; a later record for
    /// the same symbol replaces the earlier one.
    pub fn insert(&mut self, position: Position) {
        if position.contracts > 0.0 {
            self.positions.insert(position.symbol.clone(), position);
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.positions.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<Position> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for position in iter {
            snapshot.insert(position);
        }
        snapshot
    }
}
