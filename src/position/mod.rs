// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Position model and TP/SL resolution.

pub mod snapshot;
pub mod triggers;

pub use snapshot::{Position, Snapshot, TriggerPair};
pub use triggers::TriggerResolver;
