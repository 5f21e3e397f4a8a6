//! Effect definition: the policies that turn the generic loop into a concrete
//! animation.
//!
//! An [`Effect`] decides:
//! - how the previous frame is faded ([`FadePolicy`])
//! - which forces act on a particle after it moves
//! - what happens to expired particles ([`ExpiryPolicy`])
//! - when and where particles enter the set (spawn hooks + [`SpawnContext`])

use std::time::Duration;

use crate::color::Color;
use crate::host::{BlendMode, Surface};
use crate::math::Extent;
use crate::particle::{Particle, ParticleSet};
use crate::random::RandomSource;

/// How the previous frame is removed before painting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadePolicy {
    /// Full clear every frame.
    Clear,
    /// Translucent overlay, leaving motion trails.
    Trail(Color),
}

/// What happens to a particle at the end of its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Removed from the set in the frame its age reaches `max_life`.
    Remove,
    /// Repositioned by [`Effect::recycle`]; never removed.
    Wrap,
}

/// When a scheduled spawn task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Once, after the delay.
    After(Duration),
    /// Repeatedly, every period.
    Every(Duration),
}

/// Alpha that holds at 1.0 until `hold` of the lifetime, then falls linearly
/// to 0.0 at the end of life.
#[must_use]
pub fn tail_fade(life_ratio: f32, hold: f32) -> f32 {
    if life_ratio < hold {
        1.0
    } else {
        (1.0 - (life_ratio - hold) / (1.0 - hold)).clamp(0.0, 1.0)
    }
}

/// Mutable view handed to spawn hooks.
pub struct SpawnContext<'a, T> {
    particles: &'a mut ParticleSet,
    extent: Extent,
    rng: &'a mut dyn RandomSource,
    orders: &'a mut Vec<(Timing, T)>,
}

impl<'a, T> SpawnContext<'a, T> {
    /// Creates a context over a particle set.
    pub fn new(
        particles: &'a mut ParticleSet,
        extent: Extent,
        rng: &'a mut dyn RandomSource,
        orders: &'a mut Vec<(Timing, T)>,
    ) -> Self {
        Self {
            particles,
            extent,
            rng,
            orders,
        }
    }

    /// Surface dimensions at spawn time.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Number of live particles.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    /// The session's random source.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    /// Adds a particle. Returns false if the set is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        self.particles.insert(particle)
    }

    /// Schedules `task` to run later through the host's timers.
    pub fn schedule(&mut self, timing: Timing, task: T) {
        self.orders.push((timing, task));
    }
}

/// A particle animation: the policy bundle driven by the shared loop.
pub trait Effect {
    /// Deferred spawn work, carried by host timers.
    type Task: Clone;

    /// How the previous frame is faded.
    fn fade_policy(&self) -> FadePolicy;

    /// What happens to expired particles.
    fn expiry_policy(&self) -> ExpiryPolicy;

    /// Blend mode used while painting particles.
    fn blend_mode(&self) -> BlendMode {
        BlendMode::SourceOver
    }

    /// Hard capacity of the particle set, if bounded.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// Called once when the session starts.
    fn populate(&mut self, cx: &mut SpawnContext<'_, Self::Task>);

    /// Called when a scheduled task fires.
    fn run_task(&mut self, task: Self::Task, cx: &mut SpawnContext<'_, Self::Task>) {
        let _ = (task, cx);
    }

    /// Forces and edge handling after `position += velocity`.
    fn apply_environment(&self, particle: &mut Particle, extent: Extent) {
        let _ = (particle, extent);
    }

    /// Whether a particle under [`ExpiryPolicy::Wrap`] must be recycled.
    fn needs_recycle(&self, particle: &Particle, extent: Extent) -> bool {
        let _ = extent;
        !particle.is_live()
    }

    /// Repositions a particle under [`ExpiryPolicy::Wrap`].
    fn recycle(&self, particle: &mut Particle, extent: Extent, rng: &mut dyn RandomSource) {
        let _ = (extent, rng);
        particle.age = 0;
    }

    /// Paint opacity for the particle this frame.
    fn alpha(&self, particle: &Particle) -> f32 {
        particle.opacity
    }

    /// Paints one particle.
    fn paint(&self, particle: &Particle, alpha: f32, surface: &mut dyn Surface);
}
