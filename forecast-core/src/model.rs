use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::window;

/// Full response of a forecast lookup: where, what it's like now, and what's coming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

impl WeatherReport {
    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.forecastday
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tz_id: String,
    pub localtime_epoch: i64,
    #[serde(with = "local_time")]
    pub localtime: NaiveDateTime,
}

impl Location {
    /// Offset between the location's wall clock and UTC, as implied by the
    /// `localtime` / `localtime_epoch` pair.
    ///
    /// `localtime` only carries minutes, so the raw difference is snapped to the
    /// nearest quarter hour (the granularity of every real zone offset).
    pub fn utc_offset(&self) -> TimeDelta {
        let Some(utc) = DateTime::<Utc>::from_timestamp(self.localtime_epoch, 0) else {
            return TimeDelta::zero();
        };

        let raw = (self.localtime - utc.naive_utc()).num_seconds();
        let snapped = (raw + 450).div_euclid(900) * 900;

        TimeDelta::seconds(snapped)
    }

    /// Converts a UTC instant into this location's wall clock.
    pub fn local_now(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        let naive = utc.naive_utc();
        naive.checked_add_signed(self.utc_offset()).unwrap_or(naive)
    }

    /// "Name, Region, Country", skipping an empty region.
    pub fn display_name(&self) -> String {
        if self.region.is_empty() {
            format!("{}, {}", self.name, self.country)
        } else {
            format!("{}, {}, {}", self.name, self.region, self.country)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub code: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub last_updated_epoch: i64,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub pressure_mb: f64,
    #[serde(default)]
    pub precip_mm: f64,
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub vis_km: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

impl Forecast {
    /// Orders days by date and each day's hours by time.
    ///
    /// The windowing functions flatten days in the order given, so this must
    /// hold before they are called.
    pub fn sort_chronologically(&mut self) {
        self.forecastday.sort_by_key(|d| d.date);
        for day in &mut self.forecastday {
            day.hour.sort_by_key(|h| h.time);
        }
    }

    pub fn is_chronological(&self) -> bool {
        self.forecastday.windows(2).all(|w| w[0].date <= w[1].date)
            && self
                .forecastday
                .iter()
                .all(|d| d.hour.windows(2).all(|w| w[0].time <= w[1].time))
    }
}

/// One calendar day of forecast: the day-level aggregates plus its hourly records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
    pub hour: Vec<HourRecord>,
}

impl ForecastDay {
    pub fn is_today(&self, now: NaiveDateTime) -> bool {
        window::is_today(self.date, now)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub uv: f64,
    pub condition: Condition,
}

/// A single hourly data point. `time` is the location's wall clock, without offset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourRecord {
    #[serde(with = "local_time")]
    pub time: NaiveDateTime,
    pub temp_c: f64,
    #[serde(default)]
    pub feelslike_c: f64,
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub chance_of_rain: u8,
}

impl HourRecord {
    pub fn is_current_hour(&self, now: NaiveDateTime) -> bool {
        window::is_current_hour(self, now)
    }
}

/// `"YYYY-MM-DD HH:MM"` timestamps as sent by WeatherAPI.com. Single-digit hours
/// (`"2024-01-15 9:05"`) are accepted on input.
pub mod local_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid local time '{raw}': {e}")))
    }
}
