use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::{
    models::WeatherParams,
    upstream::{UpstreamClient, UpstreamReply},
};

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const FETCH_FAILED: &str = "Failed to fetch weather data";

/// Shared, read-only state of the proxy
#[derive(Clone)]
pub struct ProxyState {
    pub upstream: Arc<UpstreamClient>,
}

impl ProxyState {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Failure outcomes of a proxied request
#[derive(Debug)]
pub enum ProxyError {
    /// Neither a city nor a coordinate pair was supplied
    MissingParameters,
    /// Upstream refused; its status and body go back unchanged
    Relay {
        status: StatusCode,
        content_type: Option<String>,
        body: Bytes,
    },
    /// Upstream could not be reached or answered garbage
    Failed,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::MissingParameters => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": MISSING_PARAMETERS })),
            )
                .into_response(),
            ProxyError::Relay {
                status,
                content_type,
                body,
            } => {
                let content_type =
                    content_type.unwrap_or_else(|| "application/json".to_string());
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            ProxyError::Failed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": FETCH_FAILED })),
            )
                .into_response(),
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/health", get(health))
        .with_state(state)
}

#[instrument(skip(state))]
async fn get_weather(
    State(state): State<ProxyState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<Value>, ProxyError> {
    let query = params.resolve().ok_or(ProxyError::MissingParameters)?;

    match state.upstream.fetch(&query).await {
        Ok(UpstreamReply::Success(value)) => {
            info!(kind = query.kind.as_str(), location = %query.locator, "Relayed weather data");
            Ok(Json(value))
        }
        Ok(UpstreamReply::Rejected {
            status,
            content_type,
            body,
        }) => Err(ProxyError::Relay {
            status,
            content_type,
            body,
        }),
        Err(e) => {
            error!(location = %query.locator, "Failed to fetch weather data: {e}");
            Err(ProxyError::Failed)
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(base_url: &str) -> Router {
        let config = UpstreamConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        let upstream = UpstreamClient::new(&config, "test-key").unwrap();
        router(ProxyState::new(upstream))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_missing_parameters_never_reach_upstream() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), "/weather?type=current").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "Missing required parameters"}));
    }

    #[tokio::test]
    async fn test_non_numeric_coordinates_reach_upstream() {
        let mock_server = MockServer::start().await;
        let upstream_body = r#"{"cod":"400","message":"wrong latitude"}"#;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "abc"))
            .and(query_param("lon", "10"))
            .respond_with(
                ResponseTemplate::new(400).set_body_raw(upstream_body, "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), "/weather?lat=abc&lon=10").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, upstream_body.as_bytes());
    }

    #[tokio::test]
    async fn test_coordinates_are_not_reformatted() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "51.50000"))
            .and(query_param("lon", "1e1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "London"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (status, _) = call(app(&mock_server.uri()), "/weather?lat=51.50000&lon=1e1").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_lat_without_lon_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (status, _) = call(app(&mock_server.uri()), "/weather?lat=10&type=forecast").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_city_current_is_relayed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "Paris", "main": {"temp": 18}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), "/weather?city=Paris&type=current").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"name": "Paris", "main": {"temp": 18}}));
    }

    #[tokio::test]
    async fn test_coordinates_forecast_uses_forecast_endpoint() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "-33.96"))
            .and(query_param("lon", "25.6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (status, _) = call(
            app(&mock_server.uri()),
            "/weather?lat=-33.96&lon=25.6&type=forecast",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upstream_error_is_relayed_exactly() {
        let mock_server = MockServer::start().await;
        let upstream_body = r#"{"cod":"404","message":"city not found"}"#;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw(upstream_body, "application/json"),
            )
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), "/weather?city=Atlantis").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, upstream_body.as_bytes());
    }

    #[tokio::test]
    async fn test_rate_limit_status_is_relayed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_raw(
                r#"{"cod":429,"message":"rate limited"}"#,
                "application/json",
            ))
            .mount(&mock_server)
            .await;

        let (status, _) = call(app(&mock_server.uri()), "/weather?city=Paris").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_transport_failure_is_500() {
        // Nothing listens on port 9 of localhost.
        let (status, body) = call(app("http://127.0.0.1:9"), "/weather?city=Paris").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "Failed to fetch weather data"}));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(app("http://127.0.0.1:9"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
    }
}
