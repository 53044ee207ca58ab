//! Forecast payload and the high/low reduction over it

use super::weather::Condition;
use serde::{Deserialize, Serialize};

/// Number of 3-hour samples treated as "the next day"
pub const HIGH_LOW_WINDOW: usize = 8;

/// Forecast list as returned by the upstream provider
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
}

/// One time-stamped forecast sample
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ForecastSample {
    /// Sample time, unix seconds
    pub dt: i64,
    pub main: SampleReadings,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SampleReadings {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Highest maximum and lowest minimum over a forecast window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HighLow {
    pub high: f64,
    pub low: f64,
}

/// Reduce the first `window` samples to a high/low pair.
///
/// An empty list yields `{ high: 0, low: 0 }`.
#[must_use]
pub fn calculate_high_low(samples: &[ForecastSample], window: usize) -> HighLow {
    let today = &samples[..samples.len().min(window)];
    if today.is_empty() {
        return HighLow::default();
    }

    today.iter().fold(
        HighLow {
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
        },
        |acc, sample| HighLow {
            high: acc.high.max(sample.main.temp_max),
            low: acc.low.min(sample.main.temp_min),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample(temp_min: f64, temp_max: f64) -> ForecastSample {
        ForecastSample {
            main: SampleReadings {
                temp: (temp_min + temp_max) / 2.0,
                temp_min,
                temp_max,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_list_is_zero() {
        assert_eq!(
            calculate_high_low(&[], HIGH_LOW_WINDOW),
            HighLow { high: 0.0, low: 0.0 }
        );
    }

    #[test]
    fn test_only_first_window_counts() {
        let mut samples: Vec<ForecastSample> = (0..8).map(|i| sample(10.0 + f64::from(i), 20.0)).collect();
        samples.push(sample(-40.0, 45.0));

        let result = calculate_high_low(&samples, HIGH_LOW_WINDOW);
        assert_eq!(result, HighLow { high: 20.0, low: 10.0 });
    }

    #[rstest]
    #[case(vec![sample(12.0, 14.0)], 14.0, 12.0)]
    #[case(vec![sample(12.0, 14.0), sample(8.5, 21.3), sample(9.0, 19.0)], 21.3, 8.5)]
    #[case(vec![sample(-5.0, -1.0), sample(-7.0, -3.0)], -1.0, -7.0)]
    fn test_short_lists(#[case] samples: Vec<ForecastSample>, #[case] high: f64, #[case] low: f64) {
        let result = calculate_high_low(&samples, HIGH_LOW_WINDOW);
        assert_eq!(result.high, high);
        assert_eq!(result.low, low);
        assert!(result.high >= result.low);
    }

    #[test]
    fn test_forecast_decodes_without_list() {
        let forecast: ForecastResponse = serde_json::from_str("{\"cod\":\"200\"}").unwrap();
        assert!(forecast.list.is_empty());
    }
}
