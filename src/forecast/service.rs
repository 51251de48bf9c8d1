use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use super::aggregator::{aggregate, AggregationPolicy, DaySelection, HourWindow};
use super::models::*;
use crate::error::HttpError;
use crate::impl_into_response;
use crate::provider::{ProviderError, WeatherProvider};

#[derive(Error, Debug, PartialEq)]
pub enum ForecastError {
    #[error("OpenWeatherMap API key is not configured")]
    NotConfigured,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Forecast unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid forecast data: {0}")]
    DataShape(String),
}

impl From<ProviderError> for ForecastError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured => Self::NotConfigured,
            ProviderError::CityNotFound(city) => Self::CityNotFound(city),
            ProviderError::Unavailable(reason) => Self::Unavailable(reason),
            ProviderError::Malformed(reason) => Self::DataShape(reason),
        }
    }
}

impl HttpError for ForecastError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
            Self::DataShape(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::NotConfigured => Some("CONFIGURATION_MISSING"),
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::Unavailable(_) => Some("DATA_UNAVAILABLE"),
            Self::DataShape(_) => Some("INVALID_FORECAST_DATA"),
        }
    }

    fn user_message(&self) -> Option<String> {
        let message = match self {
            Self::NotConfigured => "Сервис погоды не настроен. Попробуйте позже.".to_string(),
            Self::CityNotFound(city) => {
                format!("Не удалось загрузить прогноз для \"{city}\". Проверьте название.")
            }
            Self::Unavailable(_) => "Не удалось загрузить прогноз.".to_string(),
            Self::DataShape(_) => "Не удалось обработать данные прогноза.".to_string(),
        };
        Some(message)
    }
}

impl_into_response!(ForecastError);

impl TryFrom<(usize, RawForecastItem)> for ForecastSample {
    type Error = ForecastError;

    /// Validate one upstream item; `index` names it in error messages
    fn try_from((index, raw): (usize, RawForecastItem)) -> Result<Self, Self::Error> {
        let shape_error = |what: &str| ForecastError::DataShape(format!("sample {index}: {what}"));

        let main = raw.main.ok_or_else(|| shape_error("missing main block"))?;
        let wind = raw.wind.ok_or_else(|| shape_error("missing wind block"))?;
        let primary = raw
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| shape_error("missing weather condition"))?;
        let dt_txt = raw.dt_txt.ok_or_else(|| shape_error("missing dt_txt"))?;
        let dt = raw.dt.ok_or_else(|| shape_error("missing dt"))?;
        let observed_at = DateTime::<Utc>::from_timestamp(dt, 0)
            .ok_or_else(|| shape_error("timestamp out of range"))?;

        let date_part = dt_txt.split(' ').next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| shape_error(&format!("unparsable dt_txt {dt_txt:?}")))?;

        Ok(ForecastSample {
            observed_at,
            dt_txt,
            date,
            temp: main.temp.ok_or_else(|| shape_error("missing main.temp"))?,
            temp_min: main.temp_min.ok_or_else(|| shape_error("missing main.temp_min"))?,
            temp_max: main.temp_max.ok_or_else(|| shape_error("missing main.temp_max"))?,
            humidity: main.humidity.ok_or_else(|| shape_error("missing main.humidity"))?,
            wind_speed: wind.speed.ok_or_else(|| shape_error("missing wind.speed"))?,
            pop: raw.pop.unwrap_or(0.0),
            condition: Condition {
                description: primary
                    .description
                    .ok_or_else(|| shape_error("missing weather.description"))?,
                icon: primary.icon.ok_or_else(|| shape_error("missing weather.icon"))?,
            },
        })
    }
}

/// Settings the service needs to build aggregation policies
#[derive(Debug, Clone, Copy)]
pub struct ForecastSettings {
    pub day_window: HourWindow,
    pub midday_window: HourWindow,
    /// Zone whose calendar decides "today" for the weekend view
    pub timezone: chrono_tz::Tz,
}

pub struct ForecastService {
    provider: Arc<dyn WeatherProvider>,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(provider: Arc<dyn WeatherProvider>, settings: ForecastSettings) -> Self {
        Self { provider, settings }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.settings.timezone).date_naive()
    }

    fn policy(&self, view: ForecastView, today: NaiveDate) -> AggregationPolicy {
        let selection = match view {
            ForecastView::Weekend => DaySelection::WeekendFrom(today),
            other => DaySelection::First(other.requested_days()),
        };
        AggregationPolicy {
            selection,
            day_window: self.settings.day_window,
            midday_window: self.settings.midday_window,
        }
    }

    /// Fetch the 3-hour forecast for `city` and reduce it for `view`
    pub async fn get_forecast(
        &self,
        city: &str,
        view: ForecastView,
    ) -> Result<ForecastResult, ForecastError> {
        tracing::debug!(city = %city, view = ?view, "Fetching forecast");

        let payload = self.provider.forecast(city).await?;
        let result = self.summarize(payload, view, self.today())?;

        metrics::counter!("belweather_forecast_days_total").increment(result.days.len() as u64);
        tracing::info!(
            city = %result.city,
            view = ?view,
            days = result.days.len(),
            "Forecast aggregated"
        );

        Ok(result)
    }

    fn summarize(
        &self,
        payload: ForecastPayload,
        view: ForecastView,
        today: NaiveDate,
    ) -> Result<ForecastResult, ForecastError> {
        let city = payload
            .city
            .ok_or_else(|| ForecastError::DataShape("missing city block".to_string()))?
            .name
            .ok_or_else(|| ForecastError::DataShape("missing city name".to_string()))?;
        let list = payload
            .list
            .ok_or_else(|| ForecastError::DataShape("missing sample list".to_string()))?;

        let samples = list
            .into_iter()
            .enumerate()
            .map(ForecastSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let days = aggregate(&samples, &self.policy(view, today));
        let notice = notice_for(view, days.len());

        Ok(ForecastResult {
            city,
            view,
            days,
            notice,
        })
    }
}

fn notice_for(view: ForecastView, available: usize) -> Option<String> {
    match view {
        ForecastView::Weekend if available == 0 => Some(
            "Данные о погоде на ближайшие выходные пока недоступны в 5-дневном прогнозе."
                .to_string(),
        ),
        ForecastView::Week if available > 0 && available < view.requested_days() => Some(
            format!(
                "Бесплатный API предоставляет детальный прогноз только на {available} дн."
            ),
        ),
        _ => None,
    }
}
