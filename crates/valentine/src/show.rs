//! # Celebration Show
//!
//! The accepted view of the page, run on the headless host:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ background  FloatingHearts   runs until teardown             │
//! │ overlay     Fireworks        spawns for `show_for_ms`, then  │
//! │                              drains and parks                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each effect owns its own scheduler. The two never share state.

use std::time::Duration;

use tracing::info;
use valentine_core::{
    pump, EngineResult, Extent, ManualScheduler, PumpReport, RecordingSurface, SeededRandom,
    Session, SessionState,
};
use valentine_effects::{
    ConfigResult, EffectsConfig, Fireworks, FireworksStats, FloatingHearts,
};

/// Frame period of a 60 Hz display.
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_666);

const HEARTS_STREAM: u64 = 1;
const FIREWORKS_STREAM: u64 = 2;

/// Outcome of [`CelebrationShow::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowReport {
    /// Background frames and timers.
    pub hearts: PumpReport,
    /// Overlay frames and timers.
    pub fireworks: PumpReport,
    /// Overlay spawn counters.
    pub bursts: FireworksStats,
    /// Overlay lifecycle state at the end of the run.
    pub fireworks_state: SessionState,
    /// Hearts alive at the end of the run.
    pub hearts_live: usize,
    /// Sparks alive at the end of the run.
    pub sparks_live: usize,
}

/// Hearts background plus fireworks overlay.
pub struct CelebrationShow {
    hearts: Session<FloatingHearts, RecordingSurface>,
    fireworks: Session<Fireworks, RecordingSurface>,
    hearts_clock: ManualScheduler,
    fireworks_clock: ManualScheduler,
    window: Duration,
}

impl CelebrationShow {
    /// Builds both sessions on surfaces of `extent`.
    ///
    /// The device class comes from the configuration or, failing that, from
    /// `user_agent`.
    pub fn new(
        config: &EffectsConfig,
        extent: Extent,
        user_agent: Option<&str>,
    ) -> ConfigResult<Self> {
        let seed = config.seed();
        let hearts = Session::new(
            FloatingHearts::from_config(&config.hearts)?,
            Some(RecordingSurface::new(extent.width, extent.height)),
            SeededRandom::new(seed.derive(HEARTS_STREAM)),
        );
        let fireworks = Session::new(
            Fireworks::from_config(&config.fireworks, user_agent),
            Some(RecordingSurface::new(extent.width, extent.height)),
            SeededRandom::new(seed.derive(FIREWORKS_STREAM)),
        );

        Ok(Self {
            hearts,
            fireworks,
            hearts_clock: ManualScheduler::new(),
            fireworks_clock: ManualScheduler::new(),
            window: config.fireworks.show_duration(),
        })
    }

    /// Starts both effects and arms the fireworks window.
    pub fn start(&mut self) -> bool {
        let hearts = self.hearts.start(&mut self.hearts_clock);
        let fireworks = self.fireworks.start(&mut self.fireworks_clock);
        if fireworks {
            self.fireworks.stop_after(&mut self.fireworks_clock, self.window);
        }
        info!(
            "show started: {} hearts, {:?} fireworks window",
            self.hearts.live_count(),
            self.window
        );
        hearts && fireworks
    }

    /// Advances both effects by `duration` of virtual time.
    pub fn run(&mut self, duration: Duration, frame_interval: Duration) -> ShowReport {
        let hearts = pump(&mut self.hearts, &mut self.hearts_clock, duration, frame_interval);
        let fireworks = pump(
            &mut self.fireworks,
            &mut self.fireworks_clock,
            duration,
            frame_interval,
        );

        ShowReport {
            hearts,
            fireworks,
            bursts: self.fireworks.effect().stats(),
            fireworks_state: self.fireworks.state(),
            hearts_live: self.hearts.live_count(),
            sparks_live: self.fireworks.live_count(),
        }
    }

    /// Resizes both surfaces.
    pub fn resize(&mut self, width: f32, height: f32) -> EngineResult<()> {
        self.hearts.on_resize(width, height)?;
        self.fireworks.on_resize(width, height)
    }

    /// Tears both effects down.
    pub fn teardown(&mut self) {
        self.hearts.teardown(&mut self.hearts_clock);
        self.fireworks.teardown(&mut self.fireworks_clock);
    }

    /// Armed timers across both schedulers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.hearts_clock.pending_timers() + self.fireworks_clock.pending_timers()
    }

    /// The background session.
    #[must_use]
    pub fn hearts(&self) -> &Session<FloatingHearts, RecordingSurface> {
        &self.hearts
    }

    /// The overlay session.
    #[must_use]
    pub fn fireworks(&self) -> &Session<Fireworks, RecordingSurface> {
        &self.fireworks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_effects::Intensity;

    fn high_show(window_ms: u64) -> CelebrationShow {
        let mut config = EffectsConfig::default();
        config.fireworks.intensity = Intensity::High;
        config.fireworks.show_for_ms = window_ms;
        CelebrationShow::new(&config, Extent::new(1280.0, 720.0), None).unwrap()
    }

    #[test]
    fn test_show_runs_window_then_parks() {
        let mut show = high_show(3_000);
        assert!(show.start());
        assert_eq!(show.hearts().live_count(), 61);

        let report = show.run(Duration::from_secs(3), FRAME_INTERVAL);
        assert!(report.bursts.bursts > 0);
        assert_eq!(report.fireworks_state, SessionState::Stopping);

        let report = show.run(Duration::from_secs(4), FRAME_INTERVAL);
        assert_eq!(report.fireworks_state, SessionState::Parked);
        assert_eq!(report.sparks_live, 0);
        assert_eq!(report.hearts_live, 61);
        assert!(report.hearts.frames > report.fireworks.frames);
    }

    #[test]
    fn test_teardown_clears_everything() {
        let mut show = high_show(10_000);
        show.start();
        show.run(Duration::from_secs(1), FRAME_INTERVAL);
        assert!(show.pending_timers() > 0);

        show.teardown();
        show.teardown();
        assert_eq!(show.pending_timers(), 0);
        assert_eq!(show.hearts().live_count(), 0);
        assert_eq!(show.fireworks().live_count(), 0);
    }

    #[test]
    fn test_resize_rejects_negative() {
        let mut show = high_show(1_000);
        assert!(show.resize(-5.0, 10.0).is_err());
        assert!(show.resize(640.0, 480.0).is_ok());
    }
}
