//! Tile layers for the weather map.
//!
//! Only URL templates are produced here; tile math and rendering belong to
//! whatever map widget consumes them.

use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

pub const BASE_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ZOOM: u8 = 8;
pub const MAX_ZOOM: u8 = 18;
pub const OVERLAY_OPACITY: f32 = 0.7;

/// OpenWeatherMap overlay layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapLayer {
    #[default]
    #[serde(rename = "temp_new")]
    Temperature,
    #[serde(rename = "clouds_new")]
    Clouds,
    #[serde(rename = "precipitation_new")]
    Precipitation,
    #[serde(rename = "pressure_new")]
    Pressure,
    #[serde(rename = "wind_new")]
    Wind,
}

impl MapLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapLayer::Temperature => "temp_new",
            MapLayer::Clouds => "clouds_new",
            MapLayer::Precipitation => "precipitation_new",
            MapLayer::Pressure => "pressure_new",
            MapLayer::Wind => "wind_new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapLayer::Temperature => "Temperature",
            MapLayer::Clouds => "Clouds",
            MapLayer::Precipitation => "Precipitation",
            MapLayer::Pressure => "Pressure",
            MapLayer::Wind => "Wind Speed",
        }
    }

    pub const fn all() -> &'static [MapLayer] {
        &[
            MapLayer::Temperature,
            MapLayer::Clouds,
            MapLayer::Precipitation,
            MapLayer::Pressure,
            MapLayer::Wind,
        ]
    }
}

impl fmt::Display for MapLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MapLayer {
    type Error = anyhow::Error;

    /// Accepts the tile id (`temp_new`) or its short form (`temp`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();
        let short = lower.strip_suffix("_new").unwrap_or(&lower);

        match short {
            "temp" | "temperature" => Ok(MapLayer::Temperature),
            "clouds" => Ok(MapLayer::Clouds),
            "precipitation" => Ok(MapLayer::Precipitation),
            "pressure" => Ok(MapLayer::Pressure),
            "wind" => Ok(MapLayer::Wind),
            _ => Err(anyhow::anyhow!(
                "Unknown map layer '{value}'. Supported layers: temp_new, clouds_new, \
                 precipitation_new, pressure_new, wind_new."
            )),
        }
    }
}

/// A map centred on a location with one weather overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    pub layer: MapLayer,
}

impl MapView {
    pub fn new(lat: f64, lon: f64, layer: MapLayer) -> Self {
        Self { lat, lon, zoom: DEFAULT_ZOOM, layer }
    }

    /// Zoom level, capped at [`MAX_ZOOM`].
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom.min(MAX_ZOOM);
        self
    }

    pub fn base_url(&self) -> &'static str {
        BASE_TILE_URL
    }

    pub fn overlay_url(&self, api_key: &str) -> String {
        format!(
            "https://tile.openweathermap.org/map/{}/{{z}}/{{x}}/{{y}}.png?appid={}",
            self.layer.as_str(),
            api_key
        )
    }

    /// Marker popup text: coordinates to four decimals.
    pub fn marker_label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }
}
