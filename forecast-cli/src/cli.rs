use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use forecast_core::{
    Config, LocationQuery, MapLayer, MapView, Service, WeatherReport, map::DEFAULT_ZOOM,
    provider::provider_from_config,
};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{debug, info};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Increase log output (-v, -vv, -vvv). `RUST_LOG` overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to look. Coordinates win over a city; with neither, the configured
/// default location is used.
#[derive(Debug, Clone, Args)]
pub struct LocationArgs {
    /// City name, or "lat,lon".
    pub location: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    pub fn resolve(&self, config: &Config) -> Result<LocationQuery> {
        let query = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => LocationQuery::Coordinates { lat, lon },
            _ => LocationQuery::parse(self.given_or_default(config)?),
        };

        query.validate()?;
        Ok(query)
    }

    fn given_or_default<'a>(&'a self, config: &'a Config) -> Result<&'a str> {
        self
            .location
            .as_deref()
            .or(config.default_location.as_deref())
            .ok_or_else(|| {
                anyhow!(
                    "No location given.\n\
                     Hint: pass a city (`forecast show London`), coordinates \
                     (`--lat 51.5 --lon -0.12`), or set a default with `forecast configure weatherapi`."
                )
            })
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a service.
    Configure {
        /// Service short name: "weatherapi" (forecast data) or "openweathermap" (map tiles).
        service: String,
    },

    /// Show current conditions, the next 24 hours and the daily forecast.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Forecast length in days; defaults to the configured value.
        #[arg(long)]
        days: Option<u8>,
    },

    /// Print chart series: hourly temperature, daily temperature and precipitation.
    Charts {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Print weather map tile layers centred on a location.
    Map {
        #[command(flatten)]
        location: LocationArgs,

        /// Overlay layer: temp_new, clouds_new, precipitation_new, pressure_new or wind_new.
        #[arg(long, default_value = "temp_new")]
        layer: String,

        /// Zoom level, 0 to 18.
        #[arg(long, default_value_t = DEFAULT_ZOOM)]
        zoom: u8,

        /// List available layers and exit.
        #[arg(long)]
        list: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        let mut stdout = std::io::stdout();

        match self.command {
            Command::Configure { service } => {
                let service = Service::try_from(service.as_str())?;
                configure(&mut config, service)?;
            }
            Command::Show { location, days } => {
                if let Some(days) = days {
                    config.forecast_days = days;
                }
                let report = fetch(&config, &location).await?;
                let now = report.location.local_now(Utc::now());

                render::current(&mut stdout, &report, now)?;
                render::hourly(&mut stdout, report.days(), now)?;
                render::daily(&mut stdout, report.days(), now)?;
            }
            Command::Charts { location } => {
                let report = fetch(&config, &location).await?;
                let now = report.location.local_now(Utc::now());

                render::charts(&mut stdout, report.days(), now)?;
            }
            Command::Map { location, layer, zoom, list } => {
                if list {
                    render::layers(&mut stdout)?;
                    return Ok(());
                }

                let layer = MapLayer::try_from(layer.as_str())?;
                let api_key = config.require_api_key(Service::OpenWeatherMap)?;

                let (lat, lon) = match location.resolve(&config)? {
                    LocationQuery::Coordinates { lat, lon } => (lat, lon),
                    LocationQuery::City(_) => {
                        let report = fetch(&config, &location).await?;
                        (report.location.lat, report.location.lon)
                    }
                };

                let view = MapView::new(lat, lon, layer).with_zoom(zoom);
                render::map(&mut stdout, &view, api_key)?;
            }
        }

        Ok(())
    }
}

async fn fetch(config: &Config, location: &LocationArgs) -> Result<WeatherReport> {
    let query = location.resolve(config)?;
    let provider = provider_from_config(config)?;

    debug!(?provider, %query, "resolved provider");

    let report = provider
        .fetch(&query)
        .await
        .with_context(|| format!("Failed to get weather for '{query}'"))?;

    info!(location = %report.location.display_name(), "weather loaded");
    Ok(report)
}

fn configure(config: &mut Config, service: Service) -> Result<()> {
    let api_key = Password::new(&format!("{service} API key:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.upsert_api_key(service, api_key);

    if service == Service::WeatherApi {
        let mut prompt = Text::new("Default location (city or lat,lon, blank to skip):");
        if let Some(current) = config.default_location.as_deref() {
            prompt = prompt.with_default(current);
        }

        let location = prompt.prompt().context("Failed to read default location")?;
        let location = location.trim();
        if !location.is_empty() {
            LocationQuery::parse(location).validate()?;
            config.set_default_location(location);
        }
    }

    config.save()?;
    println!(
        "Saved {service} credentials to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
