// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! HMAC-SHA256 request signing for MEXC contract private endpoints.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

/// Signs private requests as `hex(HMAC(secret, api_key + request_time + params))`.
pub struct RequestSigner<'a> {
    api_key: &'a str,
    secret: &'a SecretString,
}

impl<'a> RequestSigner<'a> {
    pub fn new(api_key: &'a str, secret: &'a SecretString) -> Self {
        Self { api_key, secret }
    }

    /// Canonical parameter string: sorted by key, joined as `k=v&k=v`.
    pub fn param_string(params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Lowercase hex signature for one request.
    pub fn sign(&self, request_time_ms: i64, param_string: &str) -> String {
        let mut mac = match HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()) {
            Ok(mac) => mac,
            Err(e) => {
                // An empty signature makes the exchange reject the call, which
                // surfaces as an ordinary fetch error.
                error!("HMAC key initialization failed: {}", e);
                return String::new();
            }
        };

        mac.update(self.api_key.as_bytes());
        mac.update(request_time_ms.to_string().as_bytes());
        mac.update(param_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
