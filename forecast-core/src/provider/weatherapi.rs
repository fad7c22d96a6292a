use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::DEFAULT_FORECAST_DAYS,
    model::WeatherReport,
    provider::{FetchError, LocationQuery},
};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// WeatherAPI.com `forecast.json` client.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    days: u8,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            days: DEFAULT_FORECAST_DAYS,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days.max(1);
        self
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorBody,
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    #[instrument(skip(self, query), fields(q = %query, days = self.days))]
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherReport, FetchError> {
        query.validate()?;

        let url = format!("{}/forecast.json", self.base_url);
        let q = query.as_query();
        let days = self.days.to_string();

        debug!(url = %url, "Fetching forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", q.as_str()),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Body)?;

        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<WaErrorResponse>(&body) {
                warn!(%status, code = parsed.error.code, "WeatherAPI rejected request");
                return Err(FetchError::Api {
                    code: parsed.error.code,
                    message: parsed.error.message,
                });
            }

            warn!(%status, "WeatherAPI request failed");
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let mut report: WeatherReport = serde_json::from_str(&body).map_err(FetchError::Parse)?;

        if !report.forecast.is_chronological() {
            warn!("forecast days or hours out of order, sorting");
            report.forecast.sort_chronologically();
        }

        debug!(
            location = %report.location.name,
            days = report.days().len(),
            "Forecast received"
        );

        Ok(report)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
