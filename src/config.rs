use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::forecast::aggregator::HourWindow;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key. Without it every upstream call fails with
    /// a configuration error, but the server still starts.
    #[serde(default)]
    pub openweathermap_api_key: Option<String>,

    /// City used when a request names none
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Country code appended to every city query
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Language for condition descriptions
    #[serde(default = "default_language")]
    pub language: String,

    /// IANA time zone that decides what "today" is for the weekend view
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Daily aggregation settings
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Hour windows used when reducing 3-hour samples into days.
/// All hours are UTC, matching the upstream `dt_txt` clock.
#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,

    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,

    #[serde(default = "default_midday_start_hour")]
    pub midday_start_hour: u32,

    #[serde(default = "default_midday_end_hour")]
    pub midday_end_hour: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            midday_start_hour: default_midday_start_hour(),
            midday_end_hour: default_midday_end_hour(),
        }
    }
}

impl ForecastConfig {
    pub fn day_window(&self) -> HourWindow {
        HourWindow::new(self.day_start_hour, self.day_end_hour)
    }

    pub fn midday_window(&self) -> HourWindow {
        HourWindow::new(self.midday_start_hour, self.midday_end_hour)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_city() -> String {
    "Минск".to_string()
}

fn default_country_code() -> String {
    "BY".to_string()
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_timezone() -> String {
    "Europe/Minsk".to_string()
}

fn default_day_start_hour() -> u32 {
    6
}

fn default_day_end_hour() -> u32 {
    18
}

fn default_midday_start_hour() -> u32 {
    12
}

fn default_midday_end_hour() -> u32 {
    15
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_city", default_city())?
            .set_default("country_code", default_country_code())?
            .set_default("language", default_language())?
            .set_default("timezone", default_timezone())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // BELWEATHER_OPENWEATHERMAP_API_KEY, BELWEATHER_FORECAST__DAY_END_HOUR, ...
            .add_source(
                Environment::with_prefix("BELWEATHER")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the aggregator or the weekend view cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("forecast.day", self.forecast.day_window()),
            ("forecast.midday", self.forecast.midday_window()),
        ];
        for (name, window) in windows {
            if !window.is_valid() {
                return Err(ConfigError::Message(format!(
                    "{name} window must satisfy start < end <= 24, got [{}, {})",
                    window.start, window.end
                )));
            }
        }

        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Message(format!(
                "Unknown timezone: {}",
                self.timezone
            )));
        }

        Ok(())
    }

    /// The API key, treating a blank value the same as an absent one
    pub fn api_key(&self) -> Option<&str> {
        self.openweathermap_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openweathermap_api_key: Some("test_api_key".to_string()),
            default_city: default_city(),
            country_code: default_country_code(),
            language: default_language(),
            timezone: default_timezone(),
            forecast: ForecastConfig::default(),
        }
    }
}
