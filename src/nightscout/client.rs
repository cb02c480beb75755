//! Nightscout REST API Client
//!
//! Read-only HTTP client for the Nightscout `/api/v1` endpoints.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use sha1::{Digest, Sha1};
use std::time::Duration;
use thiserror::Error;

use super::types::{ProfilePayload, Record};

/// Header carrying the hashed API secret
pub const API_SECRET_HEADER: &str = "api-secret";

/// Default number of glucose entries to fetch
pub const DEFAULT_ENTRY_COUNT: u32 = 10;

/// Default number of treatments to fetch
pub const DEFAULT_TREATMENT_COUNT: u32 = 10;

/// Default number of device status records to fetch
pub const DEFAULT_DEVICE_STATUS_COUNT: u32 = 1;

/// Nightscout REST API client
///
/// Holds only immutable configuration, so one instance can be shared across
/// concurrent tool invocations behind an `Arc`.
pub struct NightscoutClient {
    client: Client,
    base_url: String,
}

/// Configuration for the Nightscout client
#[derive(Debug, Clone, Default)]
pub struct NightscoutConfig {
    /// Base URL of the Nightscout site (e.g., "https://example.herokuapp.com")
    pub base_url: String,
    /// Plain-text API secret; only its SHA-1 digest is sent
    pub api_secret: Option<String>,
    /// Request timeout in seconds (transport default when unset)
    pub request_timeout_secs: Option<u64>,
}

impl NightscoutConfig {
    /// Create a config for the given site with no secret
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API secret
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }
}

/// Hash an API secret the way Nightscout expects it in the `api-secret` header
pub fn hash_api_secret(secret: &str) -> String {
    hex::encode(Sha1::digest(secret.as_bytes()))
}

impl NightscoutClient {
    /// Create a new client from the given configuration
    pub fn new(config: NightscoutConfig) -> Result<Self, NightscoutError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| NightscoutError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(secret) = config.api_secret.as_deref().filter(|s| !s.is_empty()) {
            let digest = HeaderValue::from_str(&hash_api_secret(secret))
                .map_err(|_| NightscoutError::InvalidHeader(API_SECRET_HEADER))?;
            headers.insert(API_SECRET_HEADER, digest);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the latest glucose entries
    pub async fn get_entries(&self, count: u32) -> Result<Vec<Record>, NightscoutError> {
        self.get_json("entries.json", Some(count)).await
    }

    /// Get the latest treatments (bolus, carbs, temp basal)
    pub async fn get_treatments(&self, count: u32) -> Result<Vec<Record>, NightscoutError> {
        self.get_json("treatments.json", Some(count)).await
    }

    /// Get the profile payload (usually a list with the active profile first)
    pub async fn get_profile(&self) -> Result<ProfilePayload, NightscoutError> {
        self.get_json("profile.json", None).await
    }

    /// Get device status records (pump battery, loop state)
    pub async fn get_device_status(&self, count: u32) -> Result<Vec<Record>, NightscoutError> {
        self.get_json("devicestatus.json", Some(count)).await
    }

    /// Check connectivity by fetching one entry and the profile
    ///
    /// Returns the number of entries received.
    pub async fn verify_connection(&self) -> Result<usize, NightscoutError> {
        let entries = self.get_entries(1).await?;
        self.get_profile().await?;

        tracing::info!(base_url = %self.base_url, "Nightscout connection verified");
        Ok(entries.len())
    }

    /// GET `/api/v1/{endpoint}` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        count: Option<u32>,
    ) -> Result<T, NightscoutError> {
        let url = format!("{}/api/v1/{}", self.base_url, endpoint);

        let mut request = self.client.get(&url);
        if let Some(count) = count {
            request = request.query(&[("count", count)]);
        }

        tracing::debug!(url = %url, count = ?count, "Fetching from Nightscout");

        let response = request.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Error fetching data from Nightscout");
            NightscoutError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                url = %url,
                status = status.as_u16(),
                "Error fetching data from Nightscout"
            );
            return Err(NightscoutError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Error reading Nightscout response");
            NightscoutError::Request(e)
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Error decoding Nightscout response");
            NightscoutError::Decode(e.to_string())
        })
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to Nightscout
#[derive(Error, Debug)]
pub enum NightscoutError {
    #[error("Invalid Nightscout URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Nightscout returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON from Nightscout: {0}")]
    Decode(String),
}
