use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::cities::handlers as cities_handlers;
use crate::forecast::handlers as forecast_handlers;
use crate::openapi::swagger_ui;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the current weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather))
        .route("/weather/{city}", get(weather_handlers::get_weather))
}

/// Build the forecast routes, one pair per view
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(forecast_handlers::get_forecast))
        .route("/forecast/{city}", get(forecast_handlers::get_forecast))
        .route(
            "/forecast/3day",
            get(forecast_handlers::get_three_day_forecast),
        )
        .route(
            "/forecast/3day/{city}",
            get(forecast_handlers::get_three_day_forecast),
        )
        .route("/forecast/week", get(forecast_handlers::get_week_forecast))
        .route(
            "/forecast/week/{city}",
            get(forecast_handlers::get_week_forecast),
        )
        .route(
            "/forecast/weekend",
            get(forecast_handlers::get_weekend_forecast),
        )
        .route(
            "/forecast/weekend/{city}",
            get(forecast_handlers::get_weekend_forecast),
        )
}

/// Build the city list routes
fn cities_routes() -> Router<AppState> {
    Router::new()
        .route("/cities", get(cities_handlers::list_cities))
        .route("/cities/search", get(cities_handlers::search_cities))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(forecast_routes())
        .merge(cities_routes())
}

/// Prometheus text exposition
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Build the complete application router
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_v1_routes())
        .merge(swagger_ui())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::forecast::service::fixtures::payload;
    use crate::provider::stub::StubProvider;
    use crate::provider::ProviderError;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_json(provider: StubProvider, uri: &str) -> (StatusCode, serde_json::Value) {
        let state = AppState::for_tests(AppConfig::for_tests(), provider);
        let app = build_router().with_state(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("valid request"),
            )
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    const DATES: [&str; 5] = [
        "2024-10-24",
        "2024-10-25",
        "2024-10-26",
        "2024-10-27",
        "2024-10-28",
    ];

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(
            StubProvider::failing(ProviderError::NotConfigured),
            "/health",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["upstream_configured"], true);
    }

    #[tokio::test]
    async fn test_five_day_forecast_by_path() {
        let (status, body) = get_json(
            StubProvider::with_forecast(payload(&DATES)),
            "/api/v1/forecast/%D0%9C%D0%B8%D0%BD%D1%81%D0%BA",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Минск");
        assert_eq!(body["view"], "five_day");
        assert_eq!(body["days"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn test_three_day_forecast_uses_default_city() {
        let (status, body) =
            get_json(StubProvider::with_forecast(payload(&DATES)), "/api/v1/forecast/3day").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "three_day");
        assert_eq!(body["days"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["days"][0]["labels"]["humidity"], "75%");
    }

    #[tokio::test]
    async fn test_week_forecast_has_notice() {
        let (status, body) = get_json(
            StubProvider::with_forecast(payload(&DATES)),
            "/api/v1/forecast/week?city=Brest",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "week");
        assert!(body["notice"].is_string());
    }

    #[tokio::test]
    async fn test_weekend_route_is_not_a_city() {
        let (status, body) = get_json(
            StubProvider::with_forecast(payload(&DATES)),
            "/api/v1/forecast/weekend",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "weekend");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_service_unavailable() {
        let (status, body) = get_json(
            StubProvider::failing(ProviderError::NotConfigured),
            "/api/v1/forecast",
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "CONFIGURATION_MISSING");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_distinct_from_empty() {
        let corrupt = serde_json::json!({
            "cod": "200",
            "list": [{ "dt": 1729771200, "dt_txt": "2024-10-24 12:00:00", "weather": [] }],
            "city": { "name": "Минск" }
        })
        .to_string();
        let (status, body) =
            get_json(StubProvider::with_forecast(corrupt), "/api/v1/forecast").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "INVALID_FORECAST_DATA");

        let empty = serde_json::json!({ "cod": "200", "list": [], "city": { "name": "Минск" } })
            .to_string();
        let (status, body) = get_json(StubProvider::with_forecast(empty), "/api/v1/forecast").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_sample_missing_inner_field_is_invalid_data() {
        for (block, field) in [("main", "temp"), ("weather", "icon")] {
            let mut body: serde_json::Value =
                serde_json::from_str(&payload(&DATES)).expect("valid fixture");
            let target = match block {
                "weather" => &mut body["list"][0]["weather"][0],
                other => &mut body["list"][0][other],
            };
            target
                .as_object_mut()
                .expect("fixture block is an object")
                .remove(field);

            let (status, body) =
                get_json(StubProvider::with_forecast(body.to_string()), "/api/v1/forecast").await;
            assert_eq!(status, StatusCode::BAD_GATEWAY, "{block}.{field}");
            assert_eq!(body["code"], "INVALID_FORECAST_DATA", "{block}.{field}");
        }
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let (status, body) = get_json(
            StubProvider::failing(ProviderError::CityNotFound("Xyz".to_string())),
            "/api/v1/weather/Xyz",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "CITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_city_search() {
        let (status, body) = get_json(
            StubProvider::failing(ProviderError::NotConfigured),
            "/api/v1/cities/search?q=%D0%B3%D0%BE%D0%BC",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["Гомель"]));
    }

    #[tokio::test]
    async fn test_city_list() {
        let (status, body) = get_json(
            StubProvider::failing(ProviderError::NotConfigured),
            "/api/v1/cities",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["popular"].as_array().map(Vec::len), Some(6));
    }
}
