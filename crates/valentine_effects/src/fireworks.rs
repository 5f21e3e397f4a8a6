//! Fireworks overlay.
//!
//! Radial bursts of short-lived sparks at random points in the upper part of
//! the screen. Spawning is driven by host timers:
//!
//! ```text
//! start ─┬─ After(0ms),  After(150ms), … (initial salvo) ──► Random
//!        └─ Every(burst_interval) ─────────────────────────► Random
//!
//! Random ─┬─ (1 - chance) ─► burst at (x, y)
//!         └─ chance ───────► multi-burst: 2–3 × After(i·100ms) ─► At(x+dx, y+dy)
//! ```
//!
//! A burst is dropped whole while more than `max_particles` sparks are live.
//! That is the only backpressure.

use std::f32::consts::TAU;
use std::time::Duration;

use tracing::trace;
use valentine_core::{
    tail_fade, BlendMode, Color, DrawCommand, Effect, ExpiryPolicy, Extent, FadePolicy, Particle,
    SpawnContext, Surface, Timing, Vec2,
};

use crate::config::FireworksConfig;
use crate::presets::{BurstPreset, DeviceClass, Intensity};

/// Spark colours.
pub const PALETTE: [Color; 9] = [
    Color::hex(0xff17_44ff),
    Color::hex(0xff40_81ff),
    Color::hex(0xf500_57ff),
    Color::hex(0xff60_90ff),
    Color::hex(0xffc1_e3ff),
    Color::hex(0xffeb_3bff),
    Color::hex(0xff98_00ff),
    Color::hex(0xe91e_63ff),
    Color::hex(0xff57_22ff),
];

/// Downward acceleration, px/frame².
pub const GRAVITY: f32 = 0.06;
/// Horizontal velocity retained per frame.
pub const AIR_DRAG: f32 = 0.99;
/// Overlay painted each frame to leave trails.
pub const TRAIL_OVERLAY: Color = Color::rgba(0.0, 0.0, 0.0, 0.05);
/// Glow radius around each spark.
pub const GLOW: f32 = 15.0;
/// Fraction of the lifetime spent at full opacity.
pub const FADE_HOLD: f32 = 0.7;

/// Delay between bursts of the opening salvo.
pub const INITIAL_STAGGER: Duration = Duration::from_millis(150);
/// Delay between sub-bursts of a multi-burst.
pub const MULTI_BURST_STAGGER: Duration = Duration::from_millis(100);
/// Width of the square around a multi-burst origin in which sub-bursts land.
pub const MULTI_BURST_SPREAD: f32 = 150.0;

const SPEED_RANGE: (f32, f32) = (2.5, 6.5);
const SIZE_RANGE: (f32, f32) = (3.5, 7.5);
const LIFE_BASE: u32 = 70;
const LIFE_SPREAD: f32 = 70.0;
/// Vertical band for random origins, as fractions of the height.
const ORIGIN_BAND: (f32, f32) = (0.1, 0.7);

/// Deferred spawn work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BurstTask {
    /// Burst (or multi-burst) at a random origin.
    Random,
    /// Single burst at a fixed origin.
    At(Vec2),
}

/// Counters for one fireworks session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireworksStats {
    /// Bursts that spawned particles.
    pub bursts: u64,
    /// Bursts dropped by the admission ceiling.
    pub dropped: u64,
    /// Multi-bursts started.
    pub multi_bursts: u64,
    /// Particles spawned in total.
    pub particles_spawned: u64,
}

/// The fireworks effect.
#[derive(Debug, Clone)]
pub struct Fireworks {
    preset: BurstPreset,
    stats: FireworksStats,
}

impl Fireworks {
    /// Creates the effect for an intensity on a device class.
    #[must_use]
    pub fn new(intensity: Intensity, device: DeviceClass) -> Self {
        Self::with_preset(BurstPreset::resolve(intensity, device))
    }

    /// Creates the effect from explicit knobs.
    #[must_use]
    pub fn with_preset(preset: BurstPreset) -> Self {
        Self {
            preset,
            stats: FireworksStats::default(),
        }
    }

    /// Creates the effect from configuration. `user_agent` is only consulted
    /// when the configuration does not pin a device class.
    #[must_use]
    pub fn from_config(config: &FireworksConfig, user_agent: Option<&str>) -> Self {
        Self::with_preset(config.preset(user_agent))
    }

    /// The resolved spawn knobs.
    #[must_use]
    pub fn preset(&self) -> &BurstPreset {
        &self.preset
    }

    /// Spawn counters so far.
    #[must_use]
    pub fn stats(&self) -> FireworksStats {
        self.stats
    }

    /// Spawns one radial burst at `origin`. Returns the number of particles
    /// created: either `particles_per_burst` or 0 if the burst was dropped.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn burst(&mut self, origin: Vec2, cx: &mut SpawnContext<'_, BurstTask>) -> usize {
        if cx.live_count() > self.preset.max_particles {
            self.stats.dropped += 1;
            trace!("burst dropped: {} live", cx.live_count());
            return 0;
        }

        let count = self.preset.particles_per_burst;
        let mut spawned = 0;
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let rng = cx.rng();
            let speed = rng.range(SPEED_RANGE.0, SPEED_RANGE.1);
            let max_life = LIFE_BASE + (rng.next_unit() * LIFE_SPREAD) as u32;
            let color = PALETTE[rng.index(PALETTE.len())];
            let size = rng.range(SIZE_RANGE.0, SIZE_RANGE.1);

            let spark = Particle::new(origin, Vec2::from_polar(angle, speed), max_life, color, size);
            if cx.spawn(spark) {
                spawned += 1;
            }
        }

        self.stats.bursts += 1;
        self.stats.particles_spawned += spawned as u64;
        spawned
    }

    /// Schedules 2–3 bursts around `base`, one every
    /// [`MULTI_BURST_STAGGER`]. Returns the number scheduled.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn multi_burst(&mut self, base: Vec2, cx: &mut SpawnContext<'_, BurstTask>) -> usize {
        let rng = cx.rng();
        let count = 2 + (rng.next_unit() * 2.0) as usize;
        let mut delay = Duration::ZERO;
        for _ in 0..count {
            let rng = cx.rng();
            let dx = (rng.next_unit() - 0.5) * MULTI_BURST_SPREAD;
            let dy = (rng.next_unit() - 0.5) * MULTI_BURST_SPREAD;
            cx.schedule(Timing::After(delay), BurstTask::At(base + Vec2::new(dx, dy)));
            delay += MULTI_BURST_STAGGER;
        }
        self.stats.multi_bursts += 1;
        count
    }

    /// Picks a random origin and fires a burst or a multi-burst there.
    pub fn random_burst(&mut self, cx: &mut SpawnContext<'_, BurstTask>) {
        let Extent { width, height } = cx.extent();
        let rng = cx.rng();
        let x = rng.range(0.0, width);
        let y = rng.range(height * ORIGIN_BAND.0, height * ORIGIN_BAND.1);
        let multi = rng.chance(self.preset.multi_burst_chance);

        if multi {
            self.multi_burst(Vec2::new(x, y), cx);
        } else {
            self.burst(Vec2::new(x, y), cx);
        }
    }
}

impl Effect for Fireworks {
    type Task = BurstTask;

    fn fade_policy(&self) -> FadePolicy {
        FadePolicy::Trail(TRAIL_OVERLAY)
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::Remove
    }

    fn blend_mode(&self) -> BlendMode {
        BlendMode::Lighter
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.preset.capacity())
    }

    fn populate(&mut self, cx: &mut SpawnContext<'_, BurstTask>) {
        let mut delay = Duration::ZERO;
        for _ in 0..self.preset.initial_bursts {
            cx.schedule(Timing::After(delay), BurstTask::Random);
            delay += INITIAL_STAGGER;
        }
        cx.schedule(Timing::Every(self.preset.burst_interval), BurstTask::Random);
    }

    fn run_task(&mut self, task: BurstTask, cx: &mut SpawnContext<'_, BurstTask>) {
        match task {
            BurstTask::Random => self.random_burst(cx),
            BurstTask::At(origin) => {
                self.burst(origin, cx);
            }
        }
    }

    fn apply_environment(&self, p: &mut Particle, _extent: Extent) {
        p.velocity.y += GRAVITY;
        p.velocity.x *= AIR_DRAG;
    }

    fn alpha(&self, p: &Particle) -> f32 {
        tail_fade(p.life_ratio(), FADE_HOLD)
    }

    fn paint(&self, p: &Particle, alpha: f32, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Circle {
            center: p.position,
            radius: p.size,
            color: p.color,
            alpha,
            glow: GLOW,
        });
    }
}
