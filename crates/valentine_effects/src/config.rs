//! TOML configuration for both effects.
//!
//! ```toml
//! seed = 1402
//!
//! [hearts]
//! area_per_heart = 15000.0
//! color = "#ff1744"
//!
//! [fireworks]
//! intensity = "high"
//! device = "mobile"      # optional; detected from the user agent otherwise
//! show_for_ms = 10000
//! ```
//!
//! Every field is optional. Missing fields take the defaults above.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use valentine_core::{Color, Seed};

use crate::error::{ConfigError, ConfigResult};
use crate::hearts::AREA_PER_HEART;
use crate::presets::{BurstPreset, DeviceClass, Intensity};

/// Floating-hearts settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartsConfig {
    /// Viewport area (px²) per heart.
    pub area_per_heart: f32,
    /// Fill colour as `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub color: String,
}

impl HeartsConfig {
    /// Parsed fill colour.
    pub fn color(&self) -> ConfigResult<Color> {
        Ok(self.color.parse::<Color>()?)
    }
}

impl Default for HeartsConfig {
    fn default() -> Self {
        Self {
            area_per_heart: AREA_PER_HEART,
            color: "#ff1744".to_owned(),
        }
    }
}

/// Fireworks settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// Intensity preset.
    pub intensity: Intensity,
    /// Pinned device class. Detected from the user agent when absent.
    pub device: Option<DeviceClass>,
    /// How long the show spawns bursts before winding down.
    pub show_for_ms: u64,
}

impl FireworksConfig {
    /// Effective device class.
    #[must_use]
    pub fn device_class(&self, user_agent: Option<&str>) -> DeviceClass {
        self.device
            .or_else(|| user_agent.map(DeviceClass::from_user_agent))
            .unwrap_or_default()
    }

    /// Spawn window of the show.
    #[must_use]
    pub fn show_duration(&self) -> Duration {
        Duration::from_millis(self.show_for_ms)
    }

    /// Resolved spawn knobs.
    #[must_use]
    pub fn preset(&self, user_agent: Option<&str>) -> BurstPreset {
        BurstPreset::resolve(self.intensity, self.device_class(user_agent))
    }
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            intensity: Intensity::Normal,
            device: None,
            show_for_ms: 10_000,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Random seed. A fixed default is used when absent.
    pub seed: Option<u64>,
    /// Background settings.
    pub hearts: HeartsConfig,
    /// Overlay settings.
    pub fireworks: FireworksConfig,
}

impl EffectsConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.hearts.area_per_heart.is_finite() && self.hearts.area_per_heart > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hearts.area_per_heart must be positive, got {}",
                self.hearts.area_per_heart
            )));
        }
        self.hearts.color()?;
        if self.fireworks.show_for_ms == 0 {
            return Err(ConfigError::Invalid(
                "fireworks.show_for_ms must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Session seed.
    #[must_use]
    pub fn seed(&self) -> Seed {
        self.seed.map(Seed::new).unwrap_or_default()
    }
}
