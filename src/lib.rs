//! `SkyCast` - current weather and short-term forecasts by city or position
//!
//! The crate has two halves: a thin HTTP proxy that forwards weather queries
//! to the upstream provider while keeping the API key server-side, and a
//! client that queries the proxy, merges current conditions with forecasts
//! and renders list and detail views.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use client::{ProxyClient, Session, UiEvent};
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use models::{Locator, QueryKind, WeatherRecord};
pub use upstream::UpstreamClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
