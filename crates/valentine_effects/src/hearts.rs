//! Floating hearts background.
//!
//! A fixed population of translucent hearts drifts upwards forever. Hearts
//! are never destroyed: one that leaves the top edge re-enters from below at
//! a fresh horizontal position.

use std::convert::Infallible;

use valentine_core::{
    Color, DrawCommand, Effect, ExpiryPolicy, Extent, FadePolicy, Particle, PathSegment,
    RandomSource, SpawnContext, Surface, Vec2,
};

use crate::config::HeartsConfig;
use crate::error::ConfigResult;

/// Default heart colour.
pub const HEART_COLOR: Color = Color::hex(0xff17_44ff);
/// Viewport area (px²) per heart.
pub const AREA_PER_HEART: f32 = 15_000.0;
/// Horizontal drift is scaled by this factor per frame.
pub const DRIFT_FACTOR: f32 = 0.3;

const SIZE_RANGE: (f32, f32) = (10.0, 30.0);
const SPEED_RANGE: (f32, f32) = (0.2, 0.7);
const OPACITY_RANGE: (f32, f32) = (0.2, 0.5);
const DRIFT_RANGE: (f32, f32) = (-1.0, 1.0);

/// Number of hearts for a viewport.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn heart_count(extent: Extent, area_per_heart: f32) -> usize {
    if extent.is_empty() || area_per_heart <= 0.0 {
        return 0;
    }
    (extent.area() / area_per_heart).floor() as usize
}

/// Outline of a heart whose top-centre notch sits at `origin`.
#[must_use]
pub fn heart_path(origin: Vec2, size: f32) -> Vec<PathSegment> {
    let Vec2 { x, y } = origin;
    let top = size * 0.3;
    let half = size / 2.0;
    let waist = y + (size + top) / 2.0;
    let tip_ctrl = y + (size + top) / 1.2;

    vec![
        PathSegment::MoveTo(Vec2::new(x, y + top)),
        PathSegment::CubicTo {
            c1: Vec2::new(x, y),
            c2: Vec2::new(x - half, y),
            to: Vec2::new(x - half, y + top),
        },
        PathSegment::CubicTo {
            c1: Vec2::new(x - half, waist),
            c2: Vec2::new(x, tip_ctrl),
            to: Vec2::new(x, y + size),
        },
        PathSegment::CubicTo {
            c1: Vec2::new(x, tip_ctrl),
            c2: Vec2::new(x + half, waist),
            to: Vec2::new(x + half, y + top),
        },
        PathSegment::CubicTo {
            c1: Vec2::new(x + half, y),
            c2: Vec2::new(x, y),
            to: Vec2::new(x, y + top),
        },
        PathSegment::Close,
    ]
}

/// The floating-hearts effect.
#[derive(Debug, Clone)]
pub struct FloatingHearts {
    area_per_heart: f32,
    color: Color,
}

impl FloatingHearts {
    /// Creates the effect with default density and colour.
    #[must_use]
    pub fn new() -> Self {
        Self {
            area_per_heart: AREA_PER_HEART,
            color: HEART_COLOR,
        }
    }

    /// Creates the effect from configuration.
    pub fn from_config(config: &HeartsConfig) -> ConfigResult<Self> {
        Ok(Self {
            area_per_heart: config.area_per_heart,
            color: config.color()?,
        })
    }

    /// Heart fill colour.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Creates one heart at a random position on the surface.
    pub fn spawn_heart(&self, extent: Extent, rng: &mut dyn RandomSource) -> Particle {
        let x = rng.range(0.0, extent.width);
        let y = rng.range(0.0, extent.height);
        let size = rng.range(SIZE_RANGE.0, SIZE_RANGE.1);
        let speed = rng.range(SPEED_RANGE.0, SPEED_RANGE.1);
        let opacity = rng.range(OPACITY_RANGE.0, OPACITY_RANGE.1);
        let drift = rng.range(DRIFT_RANGE.0, DRIFT_RANGE.1);

        Particle::new(
            Vec2::new(x, y),
            Vec2::new(drift * DRIFT_FACTOR, -speed),
            Particle::UNBOUNDED_LIFE,
            self.color,
            size,
        )
        .with_opacity(opacity)
    }
}

impl Default for FloatingHearts {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for FloatingHearts {
    type Task = Infallible;

    fn fade_policy(&self) -> FadePolicy {
        FadePolicy::Clear
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::Wrap
    }

    fn populate(&mut self, cx: &mut SpawnContext<'_, Infallible>) {
        let extent = cx.extent();
        for _ in 0..heart_count(extent, self.area_per_heart) {
            let heart = self.spawn_heart(extent, cx.rng());
            cx.spawn(heart);
        }
    }

    fn apply_environment(&self, p: &mut Particle, extent: Extent) {
        if p.position.x < -p.size {
            p.position.x = extent.width + p.size;
        } else if p.position.x > extent.width + p.size {
            p.position.x = -p.size;
        }
    }

    fn needs_recycle(&self, p: &Particle, _extent: Extent) -> bool {
        p.position.y < -p.size || !p.is_live()
    }

    fn recycle(&self, p: &mut Particle, extent: Extent, rng: &mut dyn RandomSource) {
        p.position.y = extent.height + p.size;
        p.position.x = rng.range(0.0, extent.width);
        p.age = 0;
    }

    fn paint(&self, p: &Particle, alpha: f32, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Path {
            segments: heart_path(p.position, p.size),
            color: p.color,
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use valentine_core::{
        advance_frame, pump, ManualScheduler, ParticleSet, RecordingSurface, ScriptedRandom, Seed,
        SeededRandom, Session,
    };

    #[test]
    fn test_heart_count_from_area() {
        assert_eq!(heart_count(Extent::new(1920.0, 1080.0), AREA_PER_HEART), 138);
        assert_eq!(heart_count(Extent::new(390.0, 844.0), AREA_PER_HEART), 21);
        assert_eq!(heart_count(Extent::new(100.0, 100.0), AREA_PER_HEART), 0);
        assert_eq!(heart_count(Extent::new(0.0, 1080.0), AREA_PER_HEART), 0);
    }

    #[test]
    fn test_spawn_heart_ranges() {
        let hearts = FloatingHearts::new();
        let extent = Extent::new(800.0, 600.0);
        let mut rng = SeededRandom::new(Seed::new(3));
        for _ in 0..1_000 {
            let h = hearts.spawn_heart(extent, &mut rng);
            assert!((0.0..800.0).contains(&h.position.x));
            assert!((0.0..600.0).contains(&h.position.y));
            assert!((10.0..30.0).contains(&h.size));
            assert!((0.2..0.5).contains(&h.opacity));
            assert!(h.velocity.y <= -0.2 && h.velocity.y > -0.7);
            assert!(h.velocity.x >= -DRIFT_FACTOR && h.velocity.x < DRIFT_FACTOR);
        }
    }

    #[test]
    fn test_heart_path_is_closed_and_symmetric() {
        let path = heart_path(Vec2::new(50.0, 10.0), 20.0);
        let Some(PathSegment::MoveTo(start)) = path.first().copied() else {
            panic!("path must start with a move");
        };
        assert!(start.distance(Vec2::new(50.0, 16.0)) < 1e-4);
        assert_eq!(path.last(), Some(&PathSegment::Close));
        assert_eq!(path[4], PathSegment::CubicTo {
            c1: Vec2::new(60.0, 10.0),
            c2: Vec2::new(50.0, 10.0),
            to: start,
        });
        let PathSegment::CubicTo { to: tip, .. } = path[2] else {
            panic!("expected curve to the tip");
        };
        assert_eq!(tip, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_offscreen_heart_wraps_to_bottom() {
        let hearts = FloatingHearts::new();
        let mut surface = RecordingSurface::new(300.0, 200.0);
        let mut rng = ScriptedRandom::constant(0.25);
        let mut set = ParticleSet::new();
        let heart = Particle::new(
            Vec2::new(40.0, -21.0),
            Vec2::new(0.1, -0.5),
            Particle::UNBOUNDED_LIFE,
            HEART_COLOR,
            20.0,
        );
        set.insert(heart);

        let stats = advance_frame(&hearts, &mut set, &mut surface, &mut rng);
        assert_eq!(stats.recycled, 1);
        assert_eq!(stats.removed, 0);
        assert_eq!(set.len(), 1);
        let wrapped = set.as_slice()[0];
        assert_eq!(wrapped.position.y, 220.0);
        assert_eq!(wrapped.position.x, 75.0);
        assert_eq!(surface.last_frame().first(), Some(&DrawCommand::Clear));
    }

    #[test]
    fn test_horizontal_wrap() {
        let hearts = FloatingHearts::new();
        let extent = Extent::new(300.0, 200.0);
        let mut left = Particle::new(Vec2::new(-11.0, 50.0), Vec2::ZERO, 1, HEART_COLOR, 10.0);
        hearts.apply_environment(&mut left, extent);
        assert_eq!(left.position.x, 310.0);

        let mut right = Particle::new(Vec2::new(311.0, 50.0), Vec2::ZERO, 1, HEART_COLOR, 10.0);
        hearts.apply_environment(&mut right, extent);
        assert_eq!(right.position.x, -10.0);
    }

    #[test]
    fn test_session_populates_and_never_removes() {
        let mut sched = ManualScheduler::new();
        let mut session = Session::new(
            FloatingHearts::new(),
            Some(RecordingSurface::new(300.0, 200.0)),
            SeededRandom::new(Seed::new(11)),
        );
        assert!(session.start(&mut sched));
        assert_eq!(session.live_count(), 4);
        assert_eq!(sched.pending_timers(), 0);

        pump(&mut session, &mut sched, Duration::from_secs(30), Duration::from_millis(16));
        assert_eq!(session.live_count(), 4);
        assert!(session.frames_rendered() > 1_800);
        for p in session.particles() {
            assert!(p.position.y >= -p.size - 0.7);
            assert!(p.position.y <= 200.0 + p.size);
        }
    }
}
