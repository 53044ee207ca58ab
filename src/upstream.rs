//! Upstream weather provider access for the proxy
//!
//! Builds provider URLs from a resolved [`WeatherQuery`] and performs a single
//! best-effort GET. There is no retry, timeout or caching here: a failed call
//! is reported to the caller as-is.

use crate::config::UpstreamConfig;
use crate::models::{Locator, QueryKind, WeatherQuery};
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, instrument, warn};

const REDACTED: &str = "***";

/// What the provider answered
#[derive(Debug)]
pub enum UpstreamReply {
    /// 2xx with a JSON body
    Success(Value),
    /// Non-success status, body kept byte-for-byte
    Rejected {
        status: StatusCode,
        content_type: Option<String>,
        body: Bytes,
    },
}

/// The provider could not be asked or its answer could not be read
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned malformed JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// HTTP client for the upstream provider, holding the server-side credential
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(config: &UpstreamConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("SkyCast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            units: config.units.clone(),
        })
    }

    /// Full provider URL for `query`, credential included
    #[must_use]
    pub fn endpoint_url(&self, query: &WeatherQuery) -> String {
        self.build_url(query, &urlencoding::encode(&self.api_key))
    }

    /// Provider URL with the credential masked, for logs
    #[must_use]
    pub fn redacted_url(&self, query: &WeatherQuery) -> String {
        self.build_url(query, REDACTED)
    }

    /// `appid` is inserted as given; callers encode real keys
    fn build_url(&self, query: &WeatherQuery, appid: &str) -> String {
        let endpoint = match query.kind {
            QueryKind::Forecast => "forecast",
            QueryKind::Current => "weather",
        };

        let location = match &query.locator {
            Locator::City(name) => format!("q={}", urlencoding::encode(name)),
            Locator::Coordinates { lat, lon } => format!(
                "lat={}&lon={}",
                urlencoding::encode(lat),
                urlencoding::encode(lon)
            ),
        };

        format!(
            "{}/{endpoint}?{location}&appid={appid}&units={}",
            self.base_url, self.units
        )
    }

    /// Ask the provider once and classify the answer
    #[instrument(skip(self), fields(url = %self.redacted_url(query)))]
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<UpstreamReply, UpstreamError> {
        let start = Instant::now();
        let response = self.client.get(self.endpoint_url(query)).send().await?;
        let status = response.status();

        debug!(
            "Upstream answered {} in {:.3}s",
            status,
            start.elapsed().as_secs_f64()
        );

        if status.is_success() {
            let body = response.bytes().await?;
            let value: Value = serde_json::from_slice(&body)?;
            return Ok(UpstreamReply::Success(value));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        warn!("Upstream rejected request with HTTP {}", status.as_u16());

        Ok(UpstreamReply::Rejected {
            status,
            content_type,
            body,
        })
    }
}
