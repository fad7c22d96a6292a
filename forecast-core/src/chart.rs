//! Chart-ready series derived from a forecast.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{model::ForecastDay, window::next_24_hour_window};

/// Number of points in the hourly temperature chart.
pub const HOURLY_CHART_POINTS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub max_temp: i64,
    pub min_temp: i64,
    /// Rounded to one decimal place.
    pub rainfall_mm: f64,
    pub chance_of_rain: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub time: NaiveDateTime,
    pub temp: i64,
    pub feels_like: i64,
}

pub fn daily_series(days: &[ForecastDay]) -> Vec<DailyPoint> {
    days.iter()
        .map(|d| DailyPoint {
            date: d.date,
            max_temp: d.day.maxtemp_c.round() as i64,
            min_temp: d.day.mintemp_c.round() as i64,
            rainfall_mm: (d.day.totalprecip_mm * 10.0).round() / 10.0,
            chance_of_rain: d.day.daily_chance_of_rain,
        })
        .collect()
}

/// Temperatures for the first [`HOURLY_CHART_POINTS`] hours of the 24-hour window.
pub fn hourly_series(days: &[ForecastDay], now: NaiveDateTime) -> Vec<HourlyPoint> {
    next_24_hour_window(days, now)
        .take(HOURLY_CHART_POINTS)
        .map(|h| HourlyPoint {
            time: h.time,
            temp: h.temp_c.round() as i64,
            feels_like: h.feelslike_c.round() as i64,
        })
        .collect()
}
