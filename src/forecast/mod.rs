pub mod aggregator;
pub mod handlers;
pub mod models;
pub mod service;

pub use service::{ForecastService, ForecastSettings};
