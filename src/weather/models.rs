use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Current Weather API Response (Internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentPayload {
    /// 200 on success; the current-weather endpoint sends it as a number
    pub cod: Option<serde_json::Value>,
    pub name: Option<String>,
    pub main: Option<CurrentMain>,
    #[serde(default)]
    pub weather: Vec<CurrentCondition>,
    pub wind: Option<CurrentWind>,
    pub sys: Option<CurrentSys>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentCondition {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentSys {
    pub country: Option<String>,
}

// ============================================================================
// API Response Models (External)
// ============================================================================

/// Current conditions, rounded and ready for display
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    /// °C, rounded
    pub temperature: i64,
    /// °C, rounded
    pub feels_like: i64,
    /// %
    pub humidity: i64,
    /// m/s
    pub wind_speed: f64,
    pub conditions: String,
    pub icon: String,
}
