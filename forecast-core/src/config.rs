use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, fs, path::PathBuf};

pub const DEFAULT_FORECAST_DAYS: u8 = 3;
pub const MAX_FORECAST_DAYS: u8 = 14;

/// External services the dashboard needs credentials for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Forecast data (WeatherAPI.com).
    WeatherApi,
    /// Map tile overlays (OpenWeatherMap).
    OpenWeatherMap,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::WeatherApi => "weatherapi",
            Service::OpenWeatherMap => "openweathermap",
        }
    }

    pub const fn all() -> &'static [Service] {
        &[Service::WeatherApi, Service::OpenWeatherMap]
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Service {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "weatherapi" => Ok(Service::WeatherApi),
            "openweathermap" | "openweather" => Ok(Service::OpenWeatherMap),
            _ => Err(anyhow!(
                "Unknown service '{value}'. Supported services: weatherapi, openweathermap."
            )),
        }
    }
}

/// Credentials for a single service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_location = "Oslo"
/// forecast_days = 3
///
/// [services.weatherapi]
/// api_key = "..."
///
/// [services.openweathermap]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// City name or `"lat,lon"` used when none is given on the command line.
    #[serde(default)]
    pub default_location: Option<String>,

    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Overrides the forecast API root, mostly for testing against a local server.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

const fn default_forecast_days() -> u8 {
    DEFAULT_FORECAST_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: None,
            forecast_days: default_forecast_days(),
            base_url: None,
            services: HashMap::new(),
        }
    }
}

impl Config {
    /// Forecast length in days, clamped to what the API serves.
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.clamp(1, MAX_FORECAST_DAYS)
    }

    pub fn set_default_location(&mut self, location: impl Into<String>) {
        self.default_location = Some(location.into());
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace a service API key.
    pub fn upsert_api_key(&mut self, service: Service, api_key: String) {
        self.services.insert(service.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Returns the API key for a service, if present.
    pub fn api_key(&self, service: Service) -> Option<&str> {
        self.services.get(service.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    /// Like [`Config::api_key`], but with an actionable error when missing.
    pub fn require_api_key(&self, service: Service) -> Result<&str> {
        self.api_key(service).ok_or_else(|| {
            anyhow!(
                "No API key configured for service '{service}'.\n\
                 Hint: run `forecast configure {service}` and enter your API key."
            )
        })
    }

    pub fn is_configured(&self, service: Service) -> bool {
        self.api_key(service).is_some()
    }
}
