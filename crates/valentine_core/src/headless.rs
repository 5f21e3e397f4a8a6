//! Headless host: a recording surface, a virtual-clock scheduler and a
//! scripted random source.
//!
//! Used by the integration tests and the `fireworks_show` binary to run
//! sessions without a browser. Time only moves when the caller says so.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::effect::Effect;
use crate::host::{DrawCommand, FrameHandle, Scheduler, Surface, TimerHandle};
use crate::math::Extent;
use crate::random::RandomSource;
use crate::session::Session;

/// Surface that records draw commands instead of rasterising them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    extent: Extent,
    current: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    presented: u64,
}

impl RecordingSurface {
    /// Creates a surface of the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            extent: Extent::new(width, height),
            ..Self::default()
        }
    }

    /// Commands of the most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of presented frames.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Number of circles in the last presented frame.
    #[must_use]
    pub fn circles_in_last_frame(&self) -> usize {
        self.last_frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.current.push(command);
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.current);
        self.presented += 1;
    }
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    due: Duration,
    period: Option<Duration>,
}

/// Scheduler driven by a virtual clock.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    frame: Option<FrameHandle>,
    timers: BTreeMap<TimerHandle, ArmedTimer>,
}

impl ManualScheduler {
    /// Creates a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if a frame has been requested and not yet delivered.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Hands out the pending frame request, if any.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.frame.take()
    }

    /// Fires the earliest timer due at or before `until`, moving the clock to
    /// its due time. Repeating timers are re-armed.
    pub fn fire_next(&mut self, until: Duration) -> Option<TimerHandle> {
        let (&handle, &timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(h, t)| (t.due, **h))?;

        self.now = self.now.max(timer.due);
        match timer.period {
            Some(period) => {
                let period = period.max(Duration::from_millis(1));
                self.timers.insert(
                    handle,
                    ArmedTimer {
                        due: timer.due + period,
                        period: Some(period),
                    },
                );
            }
            None => {
                self.timers.remove(&handle);
            }
        }
        Some(handle)
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn arm(&mut self, delay: Duration, period: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.insert(
            handle,
            ArmedTimer {
                due: self.now + delay,
                period,
            },
        );
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        self.arm(delay, None)
    }

    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let period = period.max(Duration::from_millis(1));
        self.arm(period, Some(period))
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}

/// Random source replaying a fixed sequence, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Creates a source over `values` (each in `[0, 1)`).
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always returns `value`.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Summary of a [`pump`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Frames delivered.
    pub frames: u64,
    /// Timer firings delivered.
    pub timers_fired: u64,
    /// Highest live particle count seen after a frame.
    pub peak_live: usize,
}

/// Runs a session for `duration` of virtual time, delivering timers in due
/// order and one frame every `frame_interval`.
pub fn pump<E, S, R>(
    session: &mut Session<E, S, R>,
    scheduler: &mut ManualScheduler,
    duration: Duration,
    frame_interval: Duration,
) -> PumpReport
where
    E: Effect,
    S: Surface,
    R: RandomSource,
{
    let frame_interval = frame_interval.max(Duration::from_millis(1));
    let end = scheduler.now() + duration;
    let mut report = PumpReport::default();

    while scheduler.now() < end {
        let tick = (scheduler.now() + frame_interval).min(end);
        while let Some(timer) = scheduler.fire_next(tick) {
            session.on_timer(timer, scheduler);
            report.timers_fired += 1;
        }
        scheduler.advance_to(tick);

        if let Some(frame) = scheduler.take_frame() {
            if let Some(stats) = session.on_frame(frame, scheduler) {
                report.frames += 1;
                report.peak_live = report.peak_live.max(stats.live);
            }
        }
    }

    report
}
