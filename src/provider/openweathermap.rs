use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{cod_is_success, decode, ProviderError, WeatherProvider};
use crate::forecast::models::ForecastPayload;
use crate::weather::models::CurrentPayload;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const UNITS: &str = "metric";

/// Error body OpenWeatherMap sends with non-success statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Client for the free OpenWeatherMap 2.5 endpoints
pub struct OpenWeatherMapClient {
    client: Client,
    api_key: Option<String>,
    country_code: String,
    language: String,
}

impl OpenWeatherMapClient {
    pub fn new(
        client: Client,
        api_key: Option<&str>,
        country_code: &str,
        language: &str,
    ) -> Self {
        Self {
            client,
            api_key: api_key.map(str::to_string),
            country_code: country_code.to_string(),
            language: language.to_string(),
        }
    }

    /// "Минск" becomes "Минск,BY" so lookups stay inside the country
    fn location_query(&self, city: &str) -> String {
        let city = city.trim();
        if self.country_code.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, self.country_code)
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        city: &str,
    ) -> Result<T, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!(endpoint, "OpenWeatherMap API key is not configured");
            return Err(ProviderError::NotConfigured);
        };

        let query = self.location_query(city);
        tracing::debug!(endpoint, city = %query, "Fetching from OpenWeatherMap");
        metrics::counter!("belweather_upstream_requests_total", "endpoint" => endpoint)
            .increment(1);

        let response = self
            .client
            .get(format!("{BASE_URL}/{endpoint}"))
            .query(&[
                ("q", query.as_str()),
                ("appid", api_key),
                ("units", UNITS),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint, city = %city, error = %e, "Network error");
                metrics::counter!("belweather_upstream_failures_total", "endpoint" => endpoint)
                    .increment(1);
                ProviderError::Unavailable(format!("request failed: {e}"))
            })?;

        let status = response.status();
        tracing::debug!(endpoint, status = %status, "Received OpenWeatherMap response");

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::CityNotFound(city.trim().to_string()));
        }

        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            tracing::error!(endpoint, city = %city, status = %status, error = %message, "Upstream error");
            metrics::counter!("belweather_upstream_failures_total", "endpoint" => endpoint)
                .increment(1);
            return Err(ProviderError::Unavailable(message));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(endpoint, city = %city, error = %e, "Failed to read response body");
            metrics::counter!("belweather_upstream_failures_total", "endpoint" => endpoint)
                .increment(1);
            ProviderError::Unavailable(format!("failed to read response: {e}"))
        })?;

        decode(&body).inspect_err(|e| {
            tracing::error!(endpoint, city = %city, error = %e, "Undecodable response body");
            metrics::counter!("belweather_upstream_failures_total", "endpoint" => endpoint)
                .increment(1);
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    async fn current(&self, city: &str) -> Result<CurrentPayload, ProviderError> {
        let payload: CurrentPayload = self.fetch("weather", city).await?;
        if !cod_is_success(payload.cod.as_ref()) {
            return Err(ProviderError::Unavailable(format!(
                "unexpected cod {:?}",
                payload.cod
            )));
        }
        Ok(payload)
    }

    async fn forecast(&self, city: &str) -> Result<ForecastPayload, ProviderError> {
        let payload: ForecastPayload = self.fetch("forecast", city).await?;
        if !cod_is_success(payload.cod.as_ref()) {
            return Err(ProviderError::Unavailable(format!(
                "unexpected cod {:?}",
                payload.cod
            )));
        }
        Ok(payload)
    }
}
