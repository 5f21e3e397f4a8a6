//! Intensity presets and device-class scaling for the fireworks overlay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scale (percent) applied to count knobs on mobile-class devices.
pub const MOBILE_SCALE_PERCENT: usize = 70;

/// User-agent tokens that mark a mobile-class device.
const MOBILE_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Fireworks intensity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Moderate bursts.
    #[default]
    Normal,
    /// Denser, faster bursts for the celebration.
    High,
}

/// Rendering cost class of the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Desktop-class: full preset values.
    #[default]
    Desktop,
    /// Mobile-class: count knobs scaled by [`MOBILE_SCALE_PERCENT`].
    Mobile,
}

impl DeviceClass {
    /// Classifies a browser user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_TOKENS.iter().any(|token| ua.contains(token)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Multiplier for count knobs, in percent.
    #[must_use]
    pub const fn scale_percent(self) -> usize {
        match self {
            Self::Desktop => 100,
            Self::Mobile => MOBILE_SCALE_PERCENT,
        }
    }
}

/// Resolved spawn knobs for one fireworks session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstPreset {
    /// Particles created by one burst.
    pub particles_per_burst: usize,
    /// Bursts fired in the opening salvo.
    pub initial_bursts: usize,
    /// Period of the recurring burst timer.
    pub burst_interval: Duration,
    /// Admission ceiling: bursts are dropped while more particles are live.
    pub max_particles: usize,
    /// Probability that a burst request becomes a multi-burst.
    pub multi_burst_chance: f32,
}

impl BurstPreset {
    /// Returns the preset for an intensity on a device class.
    #[must_use]
    pub fn resolve(intensity: Intensity, device: DeviceClass) -> Self {
        let base = match intensity {
            Intensity::Normal => Self {
                particles_per_burst: 50,
                initial_bursts: 8,
                burst_interval: Duration::from_millis(400),
                max_particles: 1_000,
                multi_burst_chance: 0.2,
            },
            Intensity::High => Self {
                particles_per_burst: 80,
                initial_bursts: 12,
                burst_interval: Duration::from_millis(250),
                max_particles: 1_500,
                multi_burst_chance: 0.4,
            },
        };
        base.scaled(device.scale_percent())
    }

    /// Applies a count scale given in percent, rounding down.
    #[must_use]
    pub fn scaled(self, percent: usize) -> Self {
        let floor = |n: usize| n * percent / 100;
        Self {
            particles_per_burst: floor(self.particles_per_burst),
            initial_bursts: floor(self.initial_bursts),
            max_particles: floor(self.max_particles),
            ..self
        }
    }

    /// Hard capacity of the particle set: a burst admitted right at the
    /// ceiling must still fit completely.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max_particles + self.particles_per_burst
    }
}
