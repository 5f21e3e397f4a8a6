//! Particles and the bounded live set.
//!
//! A particle is owned by exactly one [`ParticleSet`], which in turn is owned
//! by exactly one session. There is no identity beyond membership: iteration
//! order only decides paint order.

use crate::color::Color;
use crate::math::Vec2;

/// A single ephemeral particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in surface pixels.
    pub position: Vec2,
    /// Velocity in pixels per frame.
    pub velocity: Vec2,
    /// Frames lived so far.
    pub age: u32,
    /// Frames until expiry.
    pub max_life: u32,
    /// Fill colour.
    pub color: Color,
    /// Radius (bursts) or edge length (hearts).
    pub size: f32,
    /// Fixed paint opacity. Bursts ignore it and fade by age instead.
    pub opacity: f32,
}

impl Particle {
    /// Lifetime value for particles that never expire on their own.
    pub const UNBOUNDED_LIFE: u32 = u32::MAX;

    /// Creates a fresh particle with `age = 0` and full opacity.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2, max_life: u32, color: Color, size: f32) -> Self {
        Self {
            position,
            velocity,
            age: 0,
            max_life,
            color,
            size,
            opacity: 1.0,
        }
    }

    /// Sets the fixed paint opacity.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Is this particle still alive?
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.age < self.max_life
    }

    /// Normalised lifetime in `[0, 1]`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life == 0 {
            1.0
        } else {
            (self.age as f32 / self.max_life as f32).min(1.0)
        }
    }

    /// Advances the age by one frame, never past `max_life`.
    #[inline]
    pub fn tick(&mut self) {
        if self.age < self.max_life {
            self.age += 1;
        }
    }
}

/// An unordered particle collection with an optional hard capacity.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    capacity: Option<usize>,
}

impl ParticleSet {
    /// Creates an unbounded set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set that rejects insertion once `capacity` particles are live.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Hard capacity, if any.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if no particle is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Returns true if the next insertion would be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.particles.len() >= cap)
    }

    /// Inserts a particle. Returns false (and drops it) when full.
    pub fn insert(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Read-only view of the live particles.
    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterates over the live particles.
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Mutable iteration over the live particles.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    /// Visits every particle, keeping those for which `f` returns true.
    /// Returns the number removed.
    pub fn sweep(&mut self, f: impl FnMut(&mut Particle) -> bool) -> usize {
        let before = self.particles.len();
        self.particles.retain_mut(f);
        before - self.particles.len()
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
