//! Core library for the `forecast` weather dashboard.
//!
//! This crate defines:
//! - Forecast windowing: the rolling next-24-hours strip, "current hour" and "today"
//! - Shared domain models (locations, current conditions, daily and hourly forecasts)
//! - Chart series and weather map layers derived from a forecast
//! - Configuration & credentials handling
//! - Abstraction over the forecast data provider
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod chart;
pub mod config;
pub mod map;
pub mod model;
pub mod provider;
pub mod window;

pub use config::{Config, Service, ServiceConfig};
pub use map::{MapLayer, MapView};
pub use model::{ForecastDay, HourRecord, Location, WeatherReport};
pub use provider::{FetchError, ForecastProvider, LocationQuery};
pub use window::{is_current_hour, is_today, next_24_hour_window};
