//! Client-side access to the weather proxy

use crate::SkycastError;
use crate::models::{CurrentConditions, ForecastResponse, Locator, QueryKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Where a session gets its weather data from
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for `locator`
    async fn fetch_current(&self, locator: &Locator) -> Result<CurrentConditions, SkycastError>;

    /// Forecast samples for `locator`
    async fn fetch_forecast(&self, locator: &Locator) -> Result<ForecastResponse, SkycastError>;
}

/// Talks to `GET /api/weather` on a running proxy
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a client for the proxy at `base_url` (e.g. `http://localhost:3000`)
    pub fn new(base_url: &str) -> Result<Self, SkycastError> {
        let client = Client::builder()
            .user_agent(concat!("SkyCast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Proxy URL for a locator and dataset
    #[must_use]
    pub fn request_url(&self, locator: &Locator, kind: QueryKind) -> String {
        format!(
            "{}/api/weather?{}&type={}",
            self.base_url,
            locator.to_query(),
            kind.as_str()
        )
    }

    #[instrument(skip(self))]
    async fn get<T: DeserializeOwned>(
        &self,
        locator: &Locator,
        kind: QueryKind,
    ) -> Result<T, SkycastError> {
        let url = self.request_url(locator, kind);
        debug!("Requesting {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SkycastError::not_found(
                failure_message(locator, kind),
                status.as_u16(),
            ));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Short user-facing text for a non-success answer
#[must_use]
pub fn failure_message(locator: &Locator, kind: QueryKind) -> &'static str {
    match (kind, locator) {
        (QueryKind::Forecast, _) => "Forecast not available",
        (QueryKind::Current, Locator::City(_)) => "City not found",
        (QueryKind::Current, Locator::Coordinates { .. }) => "Weather data not available",
    }
}

#[async_trait]
impl WeatherSource for ProxyClient {
    async fn fetch_current(&self, locator: &Locator) -> Result<CurrentConditions, SkycastError> {
        self.get(locator, QueryKind::Current).await
    }

    async fn fetch_forecast(&self, locator: &Locator) -> Result<ForecastResponse, SkycastError> {
        self.get(locator, QueryKind::Forecast).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_urls() {
        let client = ProxyClient::new("http://localhost:3000/").unwrap();
        assert_eq!(
            client.request_url(&Locator::city("Port Elizabeth"), QueryKind::Current),
            "http://localhost:3000/api/weather?city=Port%20Elizabeth&type=current"
        );
        assert_eq!(
            client.request_url(&Locator::coordinates(51.5, -0.12), QueryKind::Forecast),
            "http://localhost:3000/api/weather?lat=51.5&lon=-0.12&type=forecast"
        );
    }

    #[test]
    fn test_failure_messages() {
        let city = Locator::city("Paris");
        let coords = Locator::coordinates(1.0, 2.0);
        assert_eq!(failure_message(&city, QueryKind::Current), "City not found");
        assert_eq!(
            failure_message(&coords, QueryKind::Current),
            "Weather data not available"
        );
        assert_eq!(failure_message(&city, QueryKind::Forecast), "Forecast not available");
        assert_eq!(failure_message(&coords, QueryKind::Forecast), "Forecast not available");
    }

    #[tokio::test]
    async fn test_fetch_current_by_city() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("city", "Paris"))
            .and(query_param("type", "current"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "Paris", "main": {"temp": 18}})),
            )
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri()).unwrap();
        let current = client.fetch_current(&Locator::city("Paris")).await.unwrap();

        assert_eq!(current.name, "Paris");
        assert_eq!(current.main.temp, 18.0);
    }

    #[tokio::test]
    async fn test_fetch_forecast_by_coordinates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("lat", "-33.96"))
            .and(query_param("lon", "25.6"))
            .and(query_param("type", "forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [{"dt": 1, "main": {"temp": 10, "temp_min": 9, "temp_max": 12}}]
            })))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri()).unwrap();
        let forecast = client
            .fetch_forecast(&Locator::coordinates(-33.96, 25.6))
            .await
            .unwrap();

        assert_eq!(forecast.list.len(), 1);
        assert_eq!(forecast.list[0].main.temp_max, 12.0);
    }

    #[tokio::test]
    async fn test_non_success_maps_to_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(&mock_server.uri()).unwrap();
        let err = client
            .fetch_current(&Locator::city("Atlantis"))
            .await
            .unwrap_err();

        assert!(matches!(err, SkycastError::NotFound { status: 404, .. }));
        assert_eq!(err.user_message(), "City not found");
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_transport_error() {
        let client = ProxyClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .fetch_forecast(&Locator::city("Paris"))
            .await
            .unwrap_err();

        assert!(matches!(err, SkycastError::Transport { .. }));
        assert_eq!(err.user_message(), "Failed to fetch weather data");
    }
}
