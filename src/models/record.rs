//! Merged per-location record kept by the client

use super::forecast::{ForecastResponse, ForecastSample};
use super::weather::CurrentConditions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a record in a [`crate::client::WeatherList`].
///
/// Ids are assigned on insertion and never reused within a list, so a handle
/// taken before another insertion still points at the same record.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Current conditions with the forecast samples for the same place attached
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    pub id: RecordId,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastSample>,
}

impl WeatherRecord {
    /// Attach the forecast list to the current conditions.
    ///
    /// The id is a placeholder until the record is inserted into a list.
    #[must_use]
    pub fn merge(current: CurrentConditions, forecast: ForecastResponse) -> Self {
        Self {
            id: RecordId(0),
            current,
            forecast: forecast.list,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.current.name
    }

    /// Current temperature in Celsius
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.current.main.temp
    }
}
