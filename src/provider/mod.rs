//! Upstream weather data source.
//!
//! Services depend on [`WeatherProvider`] rather than on a concrete HTTP
//! client. Transport and parse failures are turned into [`ProviderError`]
//! here, so callers only ever see an absence signal, never a raw
//! `reqwest` error.

mod openweathermap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::forecast::models::ForecastPayload;
use crate::weather::models::CurrentPayload;

pub use openweathermap::OpenWeatherMapClient;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("OpenWeatherMap API key is not configured")]
    NotConfigured,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather data unavailable: {0}")]
    Unavailable(String),

    /// Valid JSON whose values do not fit the expected types
    #[error("Malformed weather data: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a city
    async fn current(&self, city: &str) -> Result<CurrentPayload, ProviderError>;

    /// 5 day forecast in 3-hour steps for a city
    async fn forecast(&self, city: &str) -> Result<ForecastPayload, ProviderError>;
}

/// Whether an OpenWeatherMap `cod` field signals success.
/// The current-weather endpoint sends a number, the forecast one a string.
pub(crate) fn cod_is_success(cod: Option<&serde_json::Value>) -> bool {
    match cod {
        None => true,
        Some(serde_json::Value::Number(n)) => n.as_u64() == Some(200),
        Some(serde_json::Value::String(s)) => s == "200",
        Some(_) => false,
    }
}

/// Decode an upstream body. Broken JSON means the upstream failed;
/// well-formed JSON of the wrong shape is a data-shape problem.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body).map_err(|e| {
        if e.is_data() {
            ProviderError::Malformed(e.to_string())
        } else {
            ProviderError::Unavailable(format!("unparsable response: {e}"))
        }
    })
}
