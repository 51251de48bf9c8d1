use axum::{extract::State, Json};

use super::models::{ForecastResult, ForecastView};
use super::service::ForecastError;
use crate::error::ErrorResponse;
use crate::extractors::CityParam;
use crate::AppState;

async fn forecast_for(
    state: &AppState,
    city: CityParam,
    view: ForecastView,
) -> Result<Json<ForecastResult>, ForecastError> {
    let city = city.or_default(&state.config.default_city);
    let forecast = state.forecast_service.get_forecast(&city, view).await?;
    Ok(Json(forecast))
}

/// 5-day forecast
///
/// GET /forecast?city=Минск or /forecast/{city}
#[utoipa::path(
    get,
    path = "/api/v1/forecast/{city}",
    tag = "forecast",
    params(("city" = String, Path, description = "City name, e.g. Минск")),
    responses(
        (status = 200, description = "Daily summaries", body = ForecastResult),
        (status = 404, description = "Unknown city", body = ErrorResponse),
        (status = 502, description = "Upstream failure or corrupt payload", body = ErrorResponse),
        (status = 503, description = "API key not configured", body = ErrorResponse)
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<ForecastResult>, ForecastError> {
    forecast_for(&state, city, ForecastView::FiveDay).await
}

/// 3-day forecast
///
/// GET /forecast/3day?city=Минск or /forecast/3day/{city}
#[utoipa::path(
    get,
    path = "/api/v1/forecast/3day/{city}",
    tag = "forecast",
    params(("city" = String, Path, description = "City name")),
    responses(
        (status = 200, description = "Daily summaries", body = ForecastResult),
        (status = 404, description = "Unknown city", body = ErrorResponse)
    )
)]
pub async fn get_three_day_forecast(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<ForecastResult>, ForecastError> {
    forecast_for(&state, city, ForecastView::ThreeDay).await
}

/// Week forecast; the free API covers at most 5 days, the notice says so
///
/// GET /forecast/week?city=Минск or /forecast/week/{city}
#[utoipa::path(
    get,
    path = "/api/v1/forecast/week/{city}",
    tag = "forecast",
    params(("city" = String, Path, description = "City name")),
    responses(
        (status = 200, description = "Daily summaries", body = ForecastResult),
        (status = 404, description = "Unknown city", body = ErrorResponse)
    )
)]
pub async fn get_week_forecast(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<ForecastResult>, ForecastError> {
    forecast_for(&state, city, ForecastView::Week).await
}

/// Upcoming Saturday and Sunday
///
/// GET /forecast/weekend?city=Минск or /forecast/weekend/{city}
#[utoipa::path(
    get,
    path = "/api/v1/forecast/weekend/{city}",
    tag = "forecast",
    params(("city" = String, Path, description = "City name")),
    responses(
        (status = 200, description = "Weekend summaries, possibly empty", body = ForecastResult),
        (status = 404, description = "Unknown city", body = ErrorResponse)
    )
)]
pub async fn get_weekend_forecast(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<ForecastResult>, ForecastError> {
    forecast_for(&state, city, ForecastView::Weekend).await
}
