// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification text for position events.

use crate::monitor::PositionEvent;
use crate::position::{Position, TriggerPair};

/// Plain-text message for one event.
pub fn render(event: &PositionEvent) -> String {
    match event {
        PositionEvent::Opened(position) => opened(position),
        PositionEvent::Updated { position, previous } => updated(position, previous),
        PositionEvent::Closed { symbol } => format!("🔴 {}\nclosed", symbol),
    }
}

fn opened(position: &Position) -> String {
    let entry = position
        .entry_price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "n/a".to_string());

    let mut msg = format!("🟢 {}\n{}\nentry: {}", position.symbol, position.side, entry);
    if let Some(tp) = position.triggers.take_profit {
        msg.push_str(&format!("\nTP: {}", tp));
    }
    if let Some(sl) = position.triggers.stop_loss {
        msg.push_str(&format!("\nSL: {}", sl));
    }
    msg
}

fn updated(position: &Position, previous: &TriggerPair) -> String {
    let mut msg = format!("✏️ {} TP/SL updated", position.symbol);
    push_side(&mut msg, "TP", previous.take_profit, position.triggers.take_profit);
    push_side(&mut msg, "SL", previous.stop_loss, position.triggers.stop_loss);
    msg
}

/// Current value if any, `removed` if it just disappeared, nothing otherwise.
fn push_side(msg: &mut String, label: &str, before: Option<f64>, now: Option<f64>) {
    match (before, now) {
        (_, Some(v)) => msg.push_str(&format!("\n{}: {}", label, v)),
        (Some(_), None) => msg.push_str(&format!("\n{}: removed", label)),
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::snapshot::Side;

    fn pos(tp: Option<f64>, sl: Option<f64>) -> Position {
        Position {
            symbol: "BTCUSDT".into(),
            side: Side::Long,
            entry_price: Some(50000.0),
            contracts: 1.0,
            triggers: TriggerPair::new(tp, sl),
        }
    }

    #[test]
    fn opened_without_triggers() {
        let text = render(&PositionEvent::Opened(pos(None, None)));
        assert_eq!(text, "🟢 BTCUSDT\nlong\nentry: 50000");
    }

    #[test]
    fn opened_with_triggers_and_unknown_entry() {
        let mut p = pos(Some(52000.5), Some(48000.0));
        p.entry_price = None;
        p.side = Side::Unknown;
        let text = render(&PositionEvent::Opened(p));
        assert_eq!(text, "🟢 BTCUSDT\nunknown\nentry: n/a\nTP: 52000.5\nSL: 48000");
    }

    #[test]
    fn updated_lists_present_sides_only() {
        let text = render(&PositionEvent::Updated {
            position: pos(Some(52000.0), None),
            previous: TriggerPair::default(),
        });
        assert!(text.contains("TP: 52000"));
        assert!(!text.contains("SL:"));
    }

    #[test]
    fn updated_marks_removed_side() {
        let text = render(&PositionEvent::Updated {
            position: pos(None, Some(48000.0)),
            previous: TriggerPair::new(Some(52000.0), Some(47000.0)),
        });
        assert_eq!(text, "✏️ BTCUSDT TP/SL updated\nTP: removed\nSL: 48000");
    }

    #[test]
    fn closed_names_symbol_only() {
        let text = render(&PositionEvent::Closed {
            symbol: "BTCUSDT".into(),
        });
        assert_eq!(text, "🔴 BTCUSDT\nclosed");
    }
}
