//! # Valentine Effects
//!
//! The two animations of the Valentine page, built on `valentine_core`:
//!
//! - [`FloatingHearts`]: translucent hearts drifting upwards forever,
//!   full clear every frame, wrap at the top edge.
//! - [`Fireworks`]: radial bursts with gravity and drag, trail fade,
//!   additive blending, dropped bursts above the particle ceiling.
//!
//! Both are configured from TOML through [`EffectsConfig`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod fireworks;
pub mod hearts;
pub mod presets;

pub use config::{EffectsConfig, FireworksConfig, HeartsConfig};
pub use error::{ConfigError, ConfigResult};
pub use fireworks::{BurstTask, Fireworks, FireworksStats, PALETTE};
pub use hearts::{heart_count, heart_path, FloatingHearts};
pub use presets::{BurstPreset, DeviceClass, Intensity};
