//! Data models for `SkyCast`
//!
//! This module contains the domain models organized by concern:
//! - Location: locators and query shapes
//! - Weather: current-conditions payload
//! - Forecast: forecast samples and the high/low reduction
//! - Record: the merged per-location record

pub mod forecast;
pub mod location;
pub mod record;
pub mod weather;

pub use forecast::{ForecastResponse, ForecastSample, HIGH_LOW_WINDOW, HighLow, calculate_high_low};
pub use location::{Locator, QueryKind, WeatherParams, WeatherQuery};
pub use record::{RecordId, WeatherRecord};
pub use weather::CurrentConditions;
