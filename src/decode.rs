//! Remote VIN decoding against the NHTSA vPIC service.
//!
//! [`VinLookup::decode`] issues a single `GET
//! <api_base>/DecodeVin/<vin>?format=json` and maps the response through
//! [`VehicleRecord::from_results`]. Validation of the VIN itself is the
//! caller's job (see [`dreamcar_core::vin::validate_vin`]); the service is
//! only contacted for codes that already passed it.
//!
//! # Failure Modes
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Connection failure, timeout, non-2xx status | [`LookupError::Network`] |
//! | Body is not lookup JSON, or `Message` reports an error | [`LookupError::Decode`] |
//!
//! There is no retry. A caller that starts a new decode simply stops
//! awaiting the previous future.

use std::time::Duration;

use dreamcar_core::vin::{LookupResponse, VehicleRecord};
use thiserror::Error;

use crate::config::VinConfig;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("VIN lookup service unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Invalid VIN or API error: {0}")]
    Decode(String),
}

impl LookupError {
    /// Transport-level failures; worth retrying later.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// HTTP client for the vehicle lookup service.
#[derive(Debug, Clone)]
pub struct VinLookup {
    client: reqwest::Client,
    api_base: String,
}

impl VinLookup {
    pub fn new(config: &VinConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn decode_url(&self, vin: &str) -> String {
        format!("{}/DecodeVin/{}?format=json", self.api_base, vin)
    }

    /// Look up a VIN and normalize the result.
    pub async fn decode(&self, vin: &str) -> Result<VehicleRecord, LookupError> {
        let url = self.decode_url(vin);
        tracing::debug!(%url, "decoding VIN");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(LookupError::Network)?;

        let response = response.error_for_status().map_err(|e| {
            tracing::warn!(status = ?e.status(), vin, "VIN lookup failed");
            LookupError::Network(e)
        })?;

        let body = response.text().await.map_err(LookupError::Network)?;
        let parsed: LookupResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::Decode(format!("unexpected response body: {}", e)))?;

        if parsed.reports_error() {
            let message = parsed.message.unwrap_or_default();
            tracing::warn!(vin, %message, "VIN lookup reported an error");
            return Err(LookupError::Decode(message));
        }

        let record = VehicleRecord::from_results(&parsed.results);
        tracing::info!(vin, vehicle = %record.display_name(), "VIN decoded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_url() {
        let lookup = VinLookup::new(&VinConfig {
            api_base: "https://vpic.example/api/vehicles/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            lookup.decode_url("1HGCM82633A004352"),
            "https://vpic.example/api/vehicles/DecodeVin/1HGCM82633A004352?format=json"
        );
    }
}
