mod cities;
mod config;
mod error;
mod extractors;
mod forecast;
mod format;
mod icons;
mod openapi;
mod provider;
mod routes;
mod weather;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{error_handling::HandleErrorLayer, http::Method, http::StatusCode, BoxError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use reqwest::Client;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::forecast::{ForecastService, ForecastSettings};
use crate::provider::{OpenWeatherMapClient, WeatherProvider};
use crate::routes::build_router;
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Whole-request budget, upstream call included
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub forecast_service: Arc<ForecastService>,
    pub config: Arc<AppConfig>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    fn new(
        config: AppConfig,
        provider: Arc<dyn WeatherProvider>,
        metrics: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let timezone: chrono_tz::Tz = config
            .timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid timezone {}: {e}", config.timezone))?;

        let settings = ForecastSettings {
            day_window: config.forecast.day_window(),
            midday_window: config.forecast.midday_window(),
            timezone,
        };

        Ok(Self {
            weather_service: Arc::new(WeatherService::new(Arc::clone(&provider))),
            forecast_service: Arc::new(ForecastService::new(provider, settings)),
            config: Arc::new(config),
            metrics,
        })
    }

    #[cfg(test)]
    pub fn for_tests(config: AppConfig, provider: provider::stub::StubProvider) -> Self {
        Self::new(config, Arc::new(provider), None).expect("test config is valid")
    }
}

/// Create shared HTTP client with connection pooling
fn create_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "belweather=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(
        default_city = %config.default_city,
        timezone = %config.timezone,
        "Configuration loaded successfully"
    );

    if config.api_key().is_none() {
        tracing::warn!(
            "BELWEATHER_OPENWEATHERMAP_API_KEY is not set; weather endpoints will answer 503"
        );
    }

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    let http_client = create_http_client().context("failed to create HTTP client")?;
    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherMapClient::new(
        http_client,
        config.api_key(),
        &config.country_code,
        &config.language,
    ));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, provider, metrics)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let app = build_router()
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
