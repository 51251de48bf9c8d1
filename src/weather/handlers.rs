use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::CurrentWeather;
use super::service::WeatherError;
use crate::error::ErrorResponse;
use crate::extractors::CityParam;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// False when no OpenWeatherMap API key is set
    pub upstream_configured: bool,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream_configured: state.config.api_key().is_some(),
    })
}

/// Current weather for a city
///
/// GET /weather?city=Минск or /weather/{city}
#[utoipa::path(
    get,
    path = "/api/v1/weather/{city}",
    tag = "weather",
    params(("city" = String, Path, description = "City name, e.g. Минск")),
    responses(
        (status = 200, description = "Current conditions", body = CurrentWeather),
        (status = 404, description = "Unknown city", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 503, description = "API key not configured", body = ErrorResponse)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<CurrentWeather>, WeatherError> {
    let city = city.or_default(&state.config.default_city);
    let weather = state.weather_service.get_weather(&city).await?;
    Ok(Json(weather))
}
