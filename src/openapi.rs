use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cities::handlers::CityList;
use crate::error::ErrorResponse;
use crate::forecast::models::{DayLabels, DaySummary, ForecastResult, ForecastView};
use crate::weather::handlers::HealthResponse;
use crate::weather::models::CurrentWeather;

/// OpenAPI documentation for the Belweather API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Belweather API",
        version = "1.0.0",
        description = "Current weather and daily forecasts for Belarusian cities, aggregated from OpenWeatherMap 3-hour data.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::weather::handlers::get_weather,
        crate::forecast::handlers::get_forecast,
        crate::forecast::handlers::get_three_day_forecast,
        crate::forecast::handlers::get_week_forecast,
        crate::forecast::handlers::get_weekend_forecast,
        crate::cities::handlers::list_cities,
        crate::cities::handlers::search_cities,
    ),
    tags(
        (name = "weather", description = "Current weather"),
        (name = "forecast", description = "Daily forecasts: 5-day, 3-day, week, weekend"),
        (name = "cities", description = "Known Belarusian cities and search suggestions")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CurrentWeather,
            ForecastResult,
            ForecastView,
            DaySummary,
            DayLabels,
            CityList,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
