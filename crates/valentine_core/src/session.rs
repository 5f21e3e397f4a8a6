//! Animation session: one effect, one surface, one particle set, and every
//! host handle the animation holds.
//!
//! ## Lifecycle
//!
//! ```text
//!  Idle ──start──► Running ──stop──► Stopping ──(set empty)──► Parked
//!   │                 │                  │                        │
//!   └──────────── teardown (from any state, idempotent) ──► TornDown
//! ```
//!
//! - `stop` disarms spawn timers but lets live particles finish their life.
//! - `teardown` cancels every timer and the frame request and clears the set.

use std::collections::HashMap;

use tracing::{debug, info, trace};

use crate::effect::{Effect, SpawnContext, Timing};
use crate::engine::{advance_frame, FrameStats};
use crate::error::{EngineError, EngineResult};
use crate::host::{FrameHandle, Scheduler, Surface, TimerHandle};
use crate::math::Extent;
use crate::particle::ParticleSet;
use crate::random::{RandomSource, SeededRandom};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Constructed, not started.
    #[default]
    Idle,
    /// Spawning and animating.
    Running,
    /// No more spawning; animating until the set drains.
    Stopping,
    /// Stopped and drained; no frame requested.
    Parked,
    /// Torn down; every handle released.
    TornDown,
}

/// What a timer does when it fires.
#[derive(Debug, Clone)]
enum TimerAction<T> {
    Spawn(T),
    Halt,
}

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    action: TimerAction<T>,
    repeating: bool,
}

/// A running particle animation bound to a host.
pub struct Session<E: Effect, S: Surface, R: RandomSource = SeededRandom> {
    effect: E,
    surface: Option<S>,
    particles: ParticleSet,
    rng: R,
    state: SessionState,
    frame: Option<FrameHandle>,
    timers: HashMap<TimerHandle, TimerEntry<E::Task>>,
    orders: Vec<(Timing, E::Task)>,
    frames_rendered: u64,
    last_stats: FrameStats,
}

impl<E: Effect, S: Surface, R: RandomSource> Session<E, S, R> {
    /// Creates a session. `surface` is `None` when the host has no drawing
    /// surface (yet); such a session never animates.
    pub fn new(effect: E, surface: Option<S>, rng: R) -> Self {
        let particles = match effect.capacity() {
            Some(cap) => ParticleSet::bounded(cap),
            None => ParticleSet::new(),
        };
        Self {
            effect,
            surface,
            particles,
            rng,
            state: SessionState::Idle,
            frame: None,
            timers: HashMap::new(),
            orders: Vec::new(),
            frames_rendered: 0,
            last_stats: FrameStats::default(),
        }
    }

    /// Attaches a surface to a session that was created without one.
    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    /// Starts the animation. A missing surface, or a session that is not
    /// idle, makes this a silent no-op. Returns true if the session started.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        match self.try_start(scheduler) {
            Ok(started) => started,
            Err(err) => {
                debug!("session not started: {}", err);
                false
            }
        }
    }

    /// Starts the animation, reporting a missing surface as an error.
    ///
    /// Returns `Ok(false)` if the session is not idle.
    pub fn try_start(&mut self, scheduler: &mut dyn Scheduler) -> EngineResult<bool> {
        if self.state != SessionState::Idle {
            return Ok(false);
        }
        let extent = self
            .surface
            .as_ref()
            .map(Surface::extent)
            .ok_or(EngineError::SurfaceUnavailable)?;

        {
            let mut cx =
                SpawnContext::new(&mut self.particles, extent, &mut self.rng, &mut self.orders);
            self.effect.populate(&mut cx);
        }
        self.state = SessionState::Running;
        self.flush_orders(scheduler);
        self.frame = Some(scheduler.request_frame());

        info!(
            "session started: {}x{}, {} particles, {} timers",
            extent.width,
            extent.height,
            self.particles.len(),
            self.timers.len()
        );
        Ok(true)
    }

    /// Stops spawning. Live particles keep animating until they expire.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state != SessionState::Running {
            return;
        }
        self.cancel_timers(scheduler);
        self.state = SessionState::Stopping;
        debug!("session stopping with {} live particles", self.particles.len());
        if self.frame.is_none() {
            self.frame = Some(scheduler.request_frame());
        }
    }

    /// Arms a one-shot timer that calls [`Session::stop`] after `delay`.
    pub fn stop_after(&mut self, scheduler: &mut dyn Scheduler, delay: std::time::Duration) {
        if self.state != SessionState::Running {
            return;
        }
        let handle = scheduler.set_timeout(delay);
        self.timers.insert(
            handle,
            TimerEntry {
                action: TimerAction::Halt,
                repeating: false,
            },
        );
    }

    /// Releases everything: spawn timers, the frame request and the particle
    /// set. Safe to call any number of times, from any state.
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.cancel_timers(scheduler);
        if let Some(frame) = self.frame.take() {
            scheduler.cancel_frame(frame);
        }
        self.orders.clear();
        self.particles.clear();
        if self.state != SessionState::TornDown {
            debug!("session torn down after {} frames", self.frames_rendered);
        }
        self.state = SessionState::TornDown;
    }

    /// Resizes the surface to the new viewport. Particle positions are left
    /// as they are.
    pub fn on_resize(&mut self, width: f32, height: f32) -> EngineResult<()> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(EngineError::InvalidExtent { width, height });
        }
        if self.state == SessionState::TornDown {
            return Ok(());
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.set_extent(Extent::new(width, height));
            trace!("surface resized to {}x{}", width, height);
        }
        Ok(())
    }

    /// Host callback for a frame request. Returns `None` for stale handles.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut dyn Scheduler,
    ) -> Option<FrameStats> {
        if self.frame != Some(handle) {
            return None;
        }
        self.frame = None;
        let surface = self.surface.as_mut()?;

        let stats = advance_frame(&self.effect, &mut self.particles, surface, &mut self.rng);
        self.frames_rendered += 1;
        self.last_stats = stats;

        if self.state == SessionState::Stopping
            && self.particles.is_empty()
            && self.timers.is_empty()
        {
            self.state = SessionState::Parked;
            debug!("session parked after {} frames", self.frames_rendered);
        } else {
            self.frame = Some(scheduler.request_frame());
        }
        Some(stats)
    }

    /// Host callback for a timer. Unknown handles are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle, scheduler: &mut dyn Scheduler) {
        let Some(entry) = self.timers.get(&handle) else {
            return;
        };
        let action = entry.action.clone();
        if !entry.repeating {
            self.timers.remove(&handle);
        }

        match action {
            TimerAction::Halt => self.stop(scheduler),
            TimerAction::Spawn(task) => {
                let Some(extent) = self.surface.as_ref().map(Surface::extent) else {
                    return;
                };
                {
                    let mut cx = SpawnContext::new(
                        &mut self.particles,
                        extent,
                        &mut self.rng,
                        &mut self.orders,
                    );
                    self.effect.run_task(task, &mut cx);
                }
                self.flush_orders(scheduler);
            }
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The effect driving this session.
    #[must_use]
    pub fn effect(&self) -> &E {
        &self.effect
    }

    /// The drawing surface, if attached.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// The live particle set.
    #[must_use]
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of armed timers owned by this session.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if a frame request is outstanding.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Statistics of the most recent frame.
    #[must_use]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Registers queued spawn orders with the host. Orders produced after
    /// spawning has stopped are dropped.
    fn flush_orders(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state != SessionState::Running {
            self.orders.clear();
            return;
        }
        for (timing, task) in self.orders.drain(..) {
            let (handle, repeating) = match timing {
                Timing::After(delay) => (scheduler.set_timeout(delay), false),
                Timing::Every(period) => (scheduler.set_interval(period), true),
            };
            self.timers.insert(
                handle,
                TimerEntry {
                    action: TimerAction::Spawn(task),
                    repeating,
                },
            );
        }
    }

    fn cancel_timers(&mut self, scheduler: &mut dyn Scheduler) {
        for (handle, _) in self.timers.drain() {
            scheduler.clear_timer(handle);
        }
    }
}
