use crate::{
    config::{Config, Service},
    model::WeatherReport,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::{self, Debug};
use thiserror::Error;

pub mod weatherapi;

/// Errors raised while fetching forecast data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send request to WeatherAPI.com: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Failed to read WeatherAPI.com response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("WeatherAPI.com request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    /// Error payload returned by the API itself, e.g. an unknown city.
    #[error("WeatherAPI.com error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Failed to parse WeatherAPI.com response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    #[error("Location query is empty")]
    EmptyQuery,
}

/// Where to fetch the forecast for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Interprets `"lat,lon"` as coordinates and anything else as a city name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if let Some((lat, lon)) = trimmed.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
                return LocationQuery::Coordinates { lat, lon };
            }
        }

        LocationQuery::City(trimmed.to_string())
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        match self {
            LocationQuery::City(name) if name.trim().is_empty() => Err(FetchError::EmptyQuery),
            LocationQuery::City(_) => Ok(()),
            LocationQuery::Coordinates { lat, lon } => {
                if (-90.0..=90.0).contains(lat) && (-180.0..=180.0).contains(lon) {
                    Ok(())
                } else {
                    Err(FetchError::InvalidCoordinates)
                }
            }
        }
    }

    /// Value for the API's `q` parameter.
    pub fn as_query(&self) -> String {
        match self {
            LocationQuery::City(name) => name.trim().to_string(),
            LocationQuery::Coordinates { lat, lon } => format!("{lat},{lon}"),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query())
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Current conditions plus the multi-day hourly forecast, days in ascending order.
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherReport, FetchError>;
}

/// Construct the forecast provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = config.require_api_key(Service::WeatherApi)?;

    let mut provider =
        WeatherApiProvider::new(api_key.to_owned()).with_days(config.forecast_days());
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(Box::new(provider))
}
