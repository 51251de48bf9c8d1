use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::aggregator::WEEKEND_DAY_LIMIT;

// ============================================================================
// 5 day / 3 hour Forecast API Response (Internal)
// Every block and field is optional so a payload with missing pieces still
// parses; validation into ForecastSample decides what is required.
// ============================================================================

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    /// "200" on success; the forecast endpoint sends it as a string
    pub cod: Option<serde_json::Value>,
    pub message: Option<serde_json::Value>,
    pub cnt: Option<u32>,
    pub list: Option<Vec<RawForecastItem>>,
    pub city: Option<RawCity>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct RawCity {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct RawForecastItem {
    pub dt: Option<i64>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
    pub dt_txt: Option<String>,
    /// Probability of precipitation, 0.0 - 1.0
    pub pop: Option<f64>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub feels_like: Option<f64>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize, Clone)]
pub struct RawCondition {
    pub id: Option<u32>,
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}

// ============================================================================
// Validated domain types
// ============================================================================

/// Primary weather condition of a sample
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

/// One validated 3-hour forecast observation
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub observed_at: DateTime<Utc>,
    /// "YYYY-MM-DD HH:MM:SS", UTC
    pub dt_txt: String,
    pub date: NaiveDate,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pop: f64,
    pub condition: Condition,
}

impl ForecastSample {
    /// Bucket key: the calendar-date part of `dt_txt`
    pub fn date_key(&self) -> &str {
        self.dt_txt.split(' ').next().unwrap_or(&self.dt_txt)
    }
}

/// The forecast pages this service can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForecastView {
    FiveDay,
    ThreeDay,
    Week,
    Weekend,
}

impl ForecastView {
    /// Number of days the view asks for
    pub fn requested_days(self) -> usize {
        match self {
            Self::FiveDay => 5,
            Self::ThreeDay => 3,
            Self::Week => 7,
            Self::Weekend => WEEKEND_DAY_LIMIT,
        }
    }
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

/// Aggregated forecast for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DaySummary {
    /// Calendar date, "YYYY-MM-DD"
    pub date: String,
    /// Mean daytime temperature, °C
    pub temp_day: i64,
    /// Mean nighttime temperature, °C
    pub temp_night: i64,
    /// Mean relative humidity, %
    pub humidity: i64,
    /// Mean wind speed, m/s, one decimal
    pub wind_speed: f64,
    /// Most frequent condition, capitalized
    pub conditions: String,
    pub icon: String,
    pub icon_code: String,
    /// Mean probability of precipitation, %
    pub precipitation_probability: i64,
    pub labels: DayLabels,
}

/// Unit-suffixed strings ready for display
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayLabels {
    pub temp_day: String,
    pub temp_night: String,
    pub humidity: String,
    pub wind_speed: String,
    pub precipitation_probability: String,
}

impl DayLabels {
    pub fn new(
        temp_day: i64,
        temp_night: i64,
        humidity: i64,
        wind_speed: f64,
        precipitation_probability: i64,
    ) -> Self {
        Self {
            temp_day: format!("{temp_day}°C"),
            temp_night: format!("{temp_night}°C"),
            humidity: format!("{humidity}%"),
            wind_speed: format!("{wind_speed:.1} м/с"),
            precipitation_probability: format!("{precipitation_probability}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastResult {
    pub city: String,
    pub view: ForecastView,
    pub days: Vec<DaySummary>,
    /// Explains a short or empty result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}
