// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Snapshot diffing: classify symbols into opened / updated / closed.

use crate::position::{Position, Snapshot, TriggerPair};

/// Two trigger prices closer than this are the same price.
pub const PRICE_TOLERANCE: f64 = 1e-8;

/// Lifecycle change of one symbol between two cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Opened(Position),
    Updated {
        position: Position,
        previous: TriggerPair,
    },
    Closed {
        symbol: String,
    },
}

impl PositionEvent {
    pub fn symbol(&self) -> &str {
        match self {
            PositionEvent::Opened(position) => &position.symbol,
            PositionEvent::Updated { position, .. } => &position.symbol,
            PositionEvent::Closed { symbol } => symbol,
        }
    }
}

/// Absent equals only absent; present values compare within [`PRICE_TOLERANCE`].
pub fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => (x - y).abs() <= PRICE_TOLERANCE,
        _ => false,
    }
}

pub fn triggers_changed(previous: &TriggerPair, current: &TriggerPair) -> bool {
    !approx_eq(previous.take_profit, current.take_profit)
        || !approx_eq(previous.stop_loss, current.stop_loss)
}

/// At most one event per symbol, in symbol order. Side or entry changes on
/// their own produce nothing.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<PositionEvent> {
    let mut events = Vec::new();

    for symbol in current.symbols() {
        let Some(position) = current.get(symbol) else {
            continue;
        };
        match previous.get(symbol) {
            None => events.push(PositionEvent::Opened(position.clone())),
            Some(before) if triggers_changed(&before.triggers, &position.triggers) => {
                events.push(PositionEvent::Updated {
                    position: position.clone(),
                    previous: before.triggers,
                });
            }
            Some(_) => {}
        }
    }

    for symbol in previous.symbols() {
        if !current.contains(symbol) {
            events.push(PositionEvent::Closed {
                symbol: symbol.to_string(),
            });
        }
    }

    events.sort_by(|a, b| a.symbol().cmp(b.symbol()));
    events
}
