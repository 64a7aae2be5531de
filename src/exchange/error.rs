// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exchange access error types.

use thiserror::Error;

/// Errors returned while talking to the MEXC contract API.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The HTTP client could not be built.
    #[error("client build error: {0}")]
    ClientBuild(String),

    /// Request timed out.
    #[error("request timeout")]
    Timeout,

    /// Network or transport failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The exchange answered with `success: false`.
    #[error("MEXC API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout
        } else if err.is_decode() {
            ExchangeError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ExchangeError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ExchangeError::Connection(err.to_string())
        }
    }
}
