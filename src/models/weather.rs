//! Current-conditions payload as returned by the upstream provider

use serde::{Deserialize, Serialize};

/// Current conditions for one location.
///
/// Every field has a default so partial payloads still decode; the proxy
/// passes upstream JSON through untouched and the client only reads what it
/// displays.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CurrentConditions {
    /// Resolved place name
    pub name: String,
    /// Observation time, unix seconds
    pub dt: i64,
    /// Shift from UTC in seconds for the location
    pub timezone: i32,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    /// Visibility in metres
    pub visibility: Option<f64>,
    pub clouds: Clouds,
    pub sys: SunTimes,
}

/// Temperature, pressure and humidity block
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MainReadings {
    /// Temperature in Celsius
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

/// Condition summary
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Wind {
    /// Wind speed in m/s
    pub speed: f64,
    pub deg: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Clouds {
    /// Cloud cover percentage
    pub all: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SunTimes {
    /// Sunrise, unix seconds
    pub sunrise: i64,
    /// Sunset, unix seconds
    pub sunset: i64,
}

impl CurrentConditions {
    /// Description of the primary condition, empty when upstream sent none
    #[must_use]
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map_or("", |condition| condition.description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_payload_decodes() {
        let current: CurrentConditions =
            serde_json::from_value(json!({"name": "Paris", "main": {"temp": 18}})).unwrap();
        assert_eq!(current.name, "Paris");
        assert_eq!(current.main.temp, 18.0);
        assert_eq!(current.description(), "");
        assert!(current.visibility.is_none());
    }

    #[test]
    fn test_full_payload_decodes() {
        let current: CurrentConditions = serde_json::from_value(json!({
            "coord": {"lon": 25.57, "lat": -33.96},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {
                "temp": 17.4, "feels_like": 17.1, "temp_min": 16.0, "temp_max": 18.9,
                "pressure": 1016, "humidity": 77
            },
            "visibility": 10000,
            "wind": {"speed": 6.17, "deg": 250},
            "clouds": {"all": 75},
            "dt": 1760882400,
            "sys": {"country": "ZA", "sunrise": 1760845000, "sunset": 1760892000},
            "timezone": 7200,
            "name": "Port Elizabeth",
            "cod": 200
        }))
        .unwrap();

        assert_eq!(current.description(), "light rain");
        assert_eq!(current.main.pressure, 1016.0);
        assert_eq!(current.visibility, Some(10000.0));
        assert_eq!(current.timezone, 7200);
        assert_eq!(current.sys.sunset, 1_760_892_000);
    }
}
