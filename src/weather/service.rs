use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use super::models::{CurrentPayload, CurrentWeather};
use crate::error::HttpError;
use crate::format::{capitalize_first, round_half_up};
use crate::icons::glyph_for;
use crate::impl_into_response;
use crate::provider::{ProviderError, WeatherProvider};

/// Shown when the upstream sends no condition for the current hour
const NO_CONDITION_TEXT: &str = "Нет данных";

#[derive(Error, Debug, PartialEq)]
pub enum WeatherError {
    #[error("OpenWeatherMap API key is not configured")]
    NotConfigured,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather data unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid weather data: {0}")]
    DataShape(String),
}

impl From<ProviderError> for WeatherError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured => Self::NotConfigured,
            ProviderError::CityNotFound(city) => Self::CityNotFound(city),
            ProviderError::Unavailable(reason) => Self::Unavailable(reason),
            ProviderError::Malformed(reason) => Self::DataShape(reason),
        }
    }
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) | Self::DataShape(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::NotConfigured => Some("CONFIGURATION_MISSING"),
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::Unavailable(_) => Some("DATA_UNAVAILABLE"),
            Self::DataShape(_) => Some("INVALID_WEATHER_DATA"),
        }
    }

    fn user_message(&self) -> Option<String> {
        let message = match self {
            Self::NotConfigured => "Сервис погоды не настроен. Попробуйте позже.".to_string(),
            Self::CityNotFound(city) => format!(
                "Не удалось загрузить погоду для \"{city}\". Проверьте название или API ключ."
            ),
            Self::Unavailable(_) | Self::DataShape(_) => {
                "Не удалось загрузить погоду.".to_string()
            }
        };
        Some(message)
    }
}

impl_into_response!(WeatherError);

pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        tracing::debug!(city = %city, "Fetching current weather");

        let payload = self.provider.current(city).await?;
        let weather = to_current_weather(payload, city)?;

        tracing::info!(city = %weather.city, temp = weather.temperature, "Weather data fetched successfully");
        Ok(weather)
    }
}

fn to_current_weather(payload: CurrentPayload, requested: &str) -> Result<CurrentWeather, WeatherError> {
    let shape_error = |what: &str| WeatherError::DataShape(what.to_string());

    let main = payload.main.ok_or_else(|| shape_error("missing main block"))?;
    let temp = main.temp.ok_or_else(|| shape_error("missing main.temp"))?;
    let condition = payload.weather.first();
    let description = condition.and_then(|c| c.description.as_deref());
    let icon = condition.and_then(|c| c.icon.as_deref());

    Ok(CurrentWeather {
        city: payload.name.unwrap_or_else(|| requested.to_string()),
        country: payload.sys.and_then(|s| s.country).unwrap_or_default(),
        temperature: round_half_up(temp),
        feels_like: round_half_up(main.feels_like.unwrap_or(temp)),
        humidity: round_half_up(main.humidity.ok_or_else(|| shape_error("missing main.humidity"))?),
        wind_speed: payload.wind.and_then(|w| w.speed).unwrap_or_default(),
        conditions: description
            .map(capitalize_first)
            .unwrap_or_else(|| NO_CONDITION_TEXT.to_string()),
        icon: glyph_for(icon.unwrap_or_default()).to_string(),
    })
}
