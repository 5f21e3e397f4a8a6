//! The shared per-frame particle loop.
//!
//! One invocation advances the simulation by exactly one step:
//!
//! ```text
//! fade ─► for each particle: move ─► environment ─► (wrap) ─► paint ─► age
//!                                                                   │
//!                                       Remove policy: drop if expired
//! ```
//!
//! State mutation and paint for a frame happen inside one call, so the host
//! never sees a half-updated frame.

use crate::effect::{Effect, ExpiryPolicy, FadePolicy};
use crate::host::{BlendMode, DrawCommand, Surface};
use crate::particle::ParticleSet;
use crate::random::RandomSource;

/// Statistics for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Particles painted this frame.
    pub painted: usize,
    /// Particles removed at expiry this frame.
    pub removed: usize,
    /// Particles recycled (wrapped) this frame.
    pub recycled: usize,
    /// Particles live after the sweep.
    pub live: usize,
}

/// Runs one frame of `effect` over `particles`.
pub fn advance_frame<E>(
    effect: &E,
    particles: &mut ParticleSet,
    surface: &mut dyn Surface,
    rng: &mut dyn RandomSource,
) -> FrameStats
where
    E: Effect + ?Sized,
{
    let extent = surface.extent();

    match effect.fade_policy() {
        FadePolicy::Clear => surface.draw(DrawCommand::Clear),
        FadePolicy::Trail(color) => surface.draw(DrawCommand::Fill { color }),
    }

    let blend = effect.blend_mode();
    if blend != BlendMode::SourceOver {
        surface.draw(DrawCommand::Blend(blend));
    }

    let policy = effect.expiry_policy();
    let mut painted = 0;
    let mut recycled = 0;

    let removed = particles.sweep(|p| {
        p.position += p.velocity;
        effect.apply_environment(p, extent);

        if policy == ExpiryPolicy::Wrap && effect.needs_recycle(p, extent) {
            effect.recycle(p, extent, rng);
            recycled += 1;
        }

        effect.paint(p, effect.alpha(p), surface);
        painted += 1;
        p.tick();

        match policy {
            ExpiryPolicy::Remove => p.is_live(),
            ExpiryPolicy::Wrap => true,
        }
    });

    if blend != BlendMode::SourceOver {
        surface.draw(DrawCommand::Blend(BlendMode::SourceOver));
    }
    surface.present();

    FrameStats {
        painted,
        removed,
        recycled,
        live: particles.len(),
    }
}
