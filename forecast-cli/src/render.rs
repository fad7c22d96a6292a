//! Human-readable output for the dashboard sections.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use forecast_core::{
    ForecastDay, MapLayer, MapView, WeatherReport,
    chart::{daily_series, hourly_series},
    map::{MAX_ZOOM, OVERLAY_OPACITY},
    next_24_hour_window,
};

const BAR_WIDTH: i64 = 30;

pub fn current<W: Write>(out: &mut W, report: &WeatherReport, now: NaiveDateTime) -> io::Result<()> {
    let c = &report.current;

    writeln!(out, "{}", report.location.display_name())?;
    writeln!(out, "{}", now.format("%A, %b %-d  %H:%M"))?;
    writeln!(
        out,
        "{:.0}°C  feels like {:.0}°C  {}",
        c.temp_c, c.feelslike_c, c.condition.text
    )?;
    writeln!(
        out,
        "Humidity {}%  Wind {:.0} km/h {}  UV {}  Pressure {:.0} mb  Visibility {:.0} km",
        c.humidity, c.wind_kph, c.wind_dir, c.uv, c.pressure_mb, c.vis_km
    )?;
    writeln!(out)
}

/// The next-24-hours strip; the hour in progress is labelled "Now".
pub fn hourly<W: Write>(out: &mut W, days: &[ForecastDay], now: NaiveDateTime) -> io::Result<()> {
    writeln!(out, "Next 24 Hours")?;

    let mut any = false;
    for hour in next_24_hour_window(days, now) {
        any = true;
        let label = if hour.is_current_hour(now) {
            "Now".to_string()
        } else {
            hour.time.format("%a %I:%M %p").to_string()
        };
        let marker = if hour.is_current_hour(now) { '*' } else { ' ' };

        writeln!(
            out,
            "{marker} {label:<15} {:>4.0}°  {:<24} {:>3}% rain  {:>5.1} km/h",
            hour.temp_c, hour.condition.text, hour.chance_of_rain, hour.wind_kph
        )?;
    }

    if !any {
        writeln!(out, "  no hourly data ahead")?;
    }
    writeln!(out)
}

/// Daily overview; today's row is labelled "Today".
pub fn daily<W: Write>(out: &mut W, days: &[ForecastDay], now: NaiveDateTime) -> io::Result<()> {
    writeln!(out, "{}-Day Forecast", days.len())?;

    for day in days {
        let label = if day.is_today(now) {
            "Today".to_string()
        } else {
            day.date.format("%a, %b %-d").to_string()
        };
        let marker = if day.is_today(now) { '*' } else { ' ' };
        let s = &day.day;

        writeln!(
            out,
            "{marker} {label:<12} {:>4.0}° / {:>3.0}°  {:<24} rain {:>3}%  wind {:>3.0} km/h  humidity {:>3.0}%  UV {}",
            s.maxtemp_c,
            s.mintemp_c,
            s.condition.text,
            s.daily_chance_of_rain,
            s.maxwind_kph,
            s.avghumidity,
            s.uv
        )?;
    }

    writeln!(out)
}

pub fn charts<W: Write>(out: &mut W, days: &[ForecastDay], now: NaiveDateTime) -> io::Result<()> {
    let hourly = hourly_series(days, now);
    writeln!(out, "Hourly temperature (°C)")?;
    let floor = hourly.iter().map(|p| p.temp.min(p.feels_like)).min().unwrap_or(0);
    for point in &hourly {
        writeln!(
            out,
            "  {}  {:>4} {:>4}  {}",
            point.time.format("%H:%M"),
            point.temp,
            point.feels_like,
            bar(point.temp - floor)
        )?;
    }

    let daily = daily_series(days);
    writeln!(out)?;
    writeln!(out, "Daily temperature (°C)")?;
    for point in &daily {
        writeln!(
            out,
            "  {}  max {:>4}  min {:>4}",
            point.date.format("%a %d"),
            point.max_temp,
            point.min_temp
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Precipitation")?;
    for point in &daily {
        writeln!(
            out,
            "  {}  {:>5.1} mm  {:>3}%  {}",
            point.date.format("%a %d"),
            point.rainfall_mm,
            point.chance_of_rain,
            bar(i64::from(point.chance_of_rain) * BAR_WIDTH / 100)
        )?;
    }

    Ok(())
}

pub fn layers<W: Write>(out: &mut W) -> io::Result<()> {
    for layer in MapLayer::all() {
        writeln!(out, "{:<18} {}", layer.as_str(), layer.label())?;
    }
    Ok(())
}

pub fn map<W: Write>(out: &mut W, view: &MapView, api_key: &str) -> io::Result<()> {
    writeln!(out, "Location   {}", view.marker_label())?;
    writeln!(out, "Zoom       {} (max {MAX_ZOOM})", view.zoom)?;
    writeln!(out, "Base       {}", view.base_url())?;
    writeln!(
        out,
        "{:<10} {} (opacity {OVERLAY_OPACITY})",
        view.layer.label(),
        view.overlay_url(api_key)
    )
}

fn bar(len: i64) -> String {
    "█".repeat(len.clamp(0, BAR_WIDTH) as usize)
}
