//! Locators and query shapes shared by the proxy and the client

use serde::{Deserialize, Serialize};
use std::fmt;

/// A place to query: a city name or a coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Locator {
    /// City name as typed by the user
    City(String),
    /// Latitude/longitude exactly as they will appear in the query string
    Coordinates { lat: String, lon: String },
}

impl Locator {
    /// Create a city locator
    #[must_use]
    pub fn city<S: Into<String>>(name: S) -> Self {
        Self::City(name.into())
    }

    /// Create a coordinate locator from a device position
    #[must_use]
    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::Coordinates {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    /// Create a coordinate locator from caller-supplied text, kept verbatim
    #[must_use]
    pub fn raw_coordinates<S: Into<String>>(lat: S, lon: S) -> Self {
        Self::Coordinates {
            lat: lat.into(),
            lon: lon.into(),
        }
    }

    /// Query-string fragment identifying this location, values URL-encoded
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Locator::City(name) => format!("city={}", urlencoding::encode(name)),
            Locator::Coordinates { lat, lon } => format!(
                "lat={}&lon={}",
                urlencoding::encode(lat),
                urlencoding::encode(lon)
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::City(name) => write!(f, "{name}"),
            Locator::Coordinates { lat, lon } => write!(f, "{lat}, {lon}"),
        }
    }
}

/// Which upstream dataset a query targets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    #[default]
    Current,
    Forecast,
}

impl QueryKind {
    /// Value of the `type` query parameter
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Current => "current",
            QueryKind::Forecast => "forecast",
        }
    }

    /// Anything other than `"forecast"` (including absence) means current
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("forecast") => QueryKind::Forecast,
            _ => QueryKind::Current,
        }
    }
}

/// A fully resolved weather query
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub locator: Locator,
    pub kind: QueryKind,
}

/// Raw query parameters accepted by `GET /api/weather`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl WeatherParams {
    /// Resolve the parameters into a query.
    ///
    /// A non-empty `city` wins over coordinates; coordinates need both `lat`
    /// and `lon` non-empty. Values are forwarded as given, so upstream decides
    /// whether they are valid. `None` means no location was supplied.
    #[must_use]
    pub fn resolve(&self) -> Option<WeatherQuery> {
        let kind = QueryKind::from_param(self.kind.as_deref());

        let locator = match non_empty(&self.city) {
            Some(city) => Locator::city(city),
            None => Locator::raw_coordinates(non_empty(&self.lat)?, non_empty(&self.lon)?),
        };

        Some(WeatherQuery { locator, kind })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
