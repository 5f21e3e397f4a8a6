//! # Fireworks Show Integration Test
//!
//! Runs full sessions on the headless host: timers, frames, stop windows,
//! teardown and configuration.

use std::f32::consts::TAU;
use std::time::Duration;

use valentine_core::{
    pump, BlendMode, DrawCommand, ManualScheduler, RecordingSurface, Seed, SeededRandom, Session,
    SessionState,
};
use valentine_effects::fireworks::{GLOW, TRAIL_OVERLAY};
use valentine_effects::{
    BurstPreset, DeviceClass, EffectsConfig, Fireworks, FloatingHearts, Intensity, PALETTE,
};

const FRAME: Duration = Duration::from_millis(16);
const NEVER: Duration = Duration::from_secs(3_600);

type Show = Session<Fireworks, RecordingSurface, SeededRandom>;

fn show_with(preset: BurstPreset, seed: u64) -> Show {
    Session::new(
        Fireworks::with_preset(preset),
        Some(RecordingSurface::new(800.0, 600.0)),
        SeededRandom::new(Seed::new(seed)),
    )
}

/// One burst, no multi-bursts, no recurring timer.
fn single_burst(intensity: Intensity, device: DeviceClass) -> BurstPreset {
    BurstPreset {
        initial_bursts: 1,
        burst_interval: NEVER,
        multi_burst_chance: 0.0,
        ..BurstPreset::resolve(intensity, device)
    }
}

fn fire_due(session: &mut Show, sched: &mut ManualScheduler, until: Duration) -> usize {
    let mut fired = 0;
    while let Some(timer) = sched.fire_next(until) {
        session.on_timer(timer, sched);
        fired += 1;
    }
    fired
}

/// Test: a normal burst spawns 50 sparks evenly spread around the circle.
#[test]
fn test_burst_is_evenly_spread() {
    let mut sched = ManualScheduler::new();
    let mut show = show_with(single_burst(Intensity::Normal, DeviceClass::Desktop), 1);
    assert!(show.start(&mut sched));
    assert_eq!(show.live_count(), 0);

    assert_eq!(fire_due(&mut show, &mut sched, Duration::ZERO), 1);
    assert_eq!(show.live_count(), 50);

    let particles = show.particles().as_slice();
    let origin = particles[0].position;
    assert!((0.0..800.0).contains(&origin.x));
    assert!((60.0..420.0).contains(&origin.y), "origin y {}", origin.y);

    for (i, p) in particles.iter().enumerate() {
        assert_eq!(p.position, origin);
        let speed = p.velocity.length();
        assert!(speed > 2.5 - 1e-4 && speed < 6.5, "speed {speed}");

        #[allow(clippy::cast_precision_loss)]
        let expected = TAU * i as f32 / 50.0;
        let diff = (p.velocity.angle() - expected).abs();
        assert!(diff < 1e-3 || (TAU - diff).abs() < 1e-3, "spark {i} off by {diff}");
    }
}

/// Test: bursts requested above the ceiling add nothing.
#[test]
fn test_admission_ceiling_drops_whole_bursts() {
    let preset = BurstPreset {
        initial_bursts: 4,
        max_particles: 60,
        burst_interval: NEVER,
        multi_burst_chance: 0.0,
        ..BurstPreset::resolve(Intensity::Normal, DeviceClass::Desktop)
    };
    let mut sched = ManualScheduler::new();
    let mut show = show_with(preset, 2);
    show.start(&mut sched);

    // 0ms: 0 live, 150ms: 50 live. Both admitted.
    fire_due(&mut show, &mut sched, Duration::from_millis(150));
    assert_eq!(show.live_count(), 100);

    // 300ms and 450ms: 100 > 60, dropped. No frames ran, so nothing expired.
    fire_due(&mut show, &mut sched, Duration::from_millis(450));
    assert_eq!(show.live_count(), 100);

    let stats = show.effect().stats();
    assert_eq!(stats.bursts, 2);
    assert_eq!(stats.dropped, 2);
    assert_eq!(stats.particles_spawned, 100);
}

/// Test: the live count never exceeds the hard capacity during a long show.
#[test]
fn test_live_count_bounded_during_show() {
    let preset = BurstPreset {
        max_particles: 300,
        ..BurstPreset::resolve(Intensity::High, DeviceClass::Desktop)
    };
    let mut sched = ManualScheduler::new();
    let mut show = show_with(preset, 3);
    show.start(&mut sched);

    let report = pump(&mut show, &mut sched, Duration::from_secs(20), FRAME);
    assert!(report.peak_live > 0);
    assert!(report.peak_live <= preset.capacity());
    assert!(show.effect().stats().dropped > 0, "a low ceiling must drop bursts");
}

/// Test: a multi-burst lands 2–3 sub-bursts inside a 150px square.
#[test]
fn test_multi_burst_fan_out() {
    let preset = BurstPreset {
        initial_bursts: 1,
        burst_interval: NEVER,
        multi_burst_chance: 1.0,
        ..BurstPreset::resolve(Intensity::Normal, DeviceClass::Desktop)
    };
    let mut sched = ManualScheduler::new();
    let mut show = show_with(preset, 4);
    show.start(&mut sched);

    // Random at 0ms, then sub-bursts at 0, 100 and possibly 200ms.
    let fired = fire_due(&mut show, &mut sched, Duration::from_millis(500));
    let stats = show.effect().stats();
    assert_eq!(stats.multi_bursts, 1);
    assert!((2..=3).contains(&stats.bursts), "bursts {}", stats.bursts);
    assert_eq!(fired as u64, 1 + stats.bursts);
    assert_eq!(show.live_count() as u64, 50 * stats.bursts);
    assert_eq!(show.pending_timers(), 1, "only the recurring timer remains");

    // No frame ran, so every spark still sits on its sub-burst origin.
    let origins: Vec<_> = show
        .particles()
        .as_slice()
        .chunks(50)
        .map(|chunk| chunk[0].position)
        .collect();
    for a in &origins {
        for b in &origins {
            assert!((a.x - b.x).abs() <= 150.0);
            assert!((a.y - b.y).abs() <= 150.0);
        }
    }
}

/// Test: frames fade with a trail overlay and paint sparks additively.
#[test]
fn test_frame_commands() {
    let mut sched = ManualScheduler::new();
    let mut show = show_with(single_burst(Intensity::Normal, DeviceClass::Desktop), 5);
    show.start(&mut sched);
    pump(&mut show, &mut sched, FRAME, FRAME);

    let frame = show.surface().map(RecordingSurface::last_frame).unwrap_or_default();
    assert_eq!(frame.len(), 50 + 3);
    assert_eq!(frame[0], DrawCommand::Fill { color: TRAIL_OVERLAY });
    assert_eq!(frame[1], DrawCommand::Blend(BlendMode::Lighter));
    assert_eq!(frame[52], DrawCommand::Blend(BlendMode::SourceOver));
    for command in &frame[2..52] {
        let DrawCommand::Circle { color, alpha, glow, .. } = command else {
            panic!("expected a spark, got {command:?}");
        };
        assert!(PALETTE.contains(color));
        assert_eq!(*alpha, 1.0, "fresh sparks are opaque");
        assert_eq!(*glow, GLOW);
    }
}

/// Test: sparks fade out over the last 30% of their life and then vanish.
#[test]
fn test_sparks_fade_then_expire() {
    let mut sched = ManualScheduler::new();
    let mut show = show_with(single_burst(Intensity::Normal, DeviceClass::Desktop), 6);
    show.start(&mut sched);

    let mut saw_fading = false;
    for _ in 0..200 {
        pump(&mut show, &mut sched, FRAME, FRAME);
        let frame = show.surface().map(RecordingSurface::last_frame).unwrap_or_default();
        for command in frame {
            if let DrawCommand::Circle { alpha, .. } = command {
                assert!((0.0..=1.0).contains(alpha));
                saw_fading |= *alpha < 1.0;
            }
        }
    }
    assert!(saw_fading);
    assert_eq!(show.live_count(), 0, "max life is below 140 frames");
    assert_eq!(show.state(), SessionState::Running);
}

/// Test: a 10 second show stops spawning, drains, then parks the loop.
#[test]
fn test_show_window_drains_and_parks() {
    let preset = BurstPreset::resolve(Intensity::Normal, DeviceClass::Desktop);
    let mut sched = ManualScheduler::new();
    let mut show = show_with(preset, 7);
    show.start(&mut sched);
    show.stop_after(&mut sched, Duration::from_secs(10));

    pump(&mut show, &mut sched, Duration::from_secs(10), FRAME);
    assert_eq!(show.state(), SessionState::Stopping);
    assert_eq!(show.pending_timers(), 0);
    assert_eq!(sched.pending_timers(), 0);
    let bursts_at_stop = show.effect().stats().bursts;

    pump(&mut show, &mut sched, Duration::from_secs(5), FRAME);
    assert_eq!(show.state(), SessionState::Parked);
    assert_eq!(show.live_count(), 0);
    assert!(!sched.frame_pending());
    assert_eq!(show.effect().stats().bursts, bursts_at_stop);

    let frames = show.frames_rendered();
    pump(&mut show, &mut sched, Duration::from_secs(1), FRAME);
    assert_eq!(show.frames_rendered(), frames, "parked loop renders nothing");
}

/// Test: teardown twice leaves nothing behind.
#[test]
fn test_teardown_is_idempotent() {
    let mut sched = ManualScheduler::new();
    let mut show = show_with(BurstPreset::resolve(Intensity::High, DeviceClass::Desktop), 8);
    show.start(&mut sched);
    pump(&mut show, &mut sched, Duration::from_secs(1), FRAME);
    assert!(show.live_count() > 0);

    show.teardown(&mut sched);
    show.teardown(&mut sched);
    assert_eq!(show.state(), SessionState::TornDown);
    assert_eq!(show.live_count(), 0);
    assert_eq!(show.pending_timers(), 0);
    assert_eq!(sched.pending_timers(), 0);
    assert!(!sched.frame_pending());

    let report = pump(&mut show, &mut sched, Duration::from_secs(1), FRAME);
    assert_eq!(report.frames, 0);
    assert_eq!(report.timers_fired, 0);
    assert!(!show.start(&mut sched));
}

/// Test: mobile devices get 70% of the count knobs.
#[test]
fn test_mobile_burst_size() {
    let mut sched = ManualScheduler::new();
    let mut show = show_with(single_burst(Intensity::High, DeviceClass::Mobile), 9);
    show.start(&mut sched);
    pump(&mut show, &mut sched, FRAME, FRAME);

    let circles = show.surface().map_or(0, RecordingSurface::circles_in_last_frame);
    assert_eq!(circles, 56);
    assert_eq!(show.effect().preset().max_particles, 1_050);
}

/// Test: the same seed replays the same show.
#[test]
fn test_seeded_show_is_reproducible() {
    let preset = BurstPreset::resolve(Intensity::High, DeviceClass::Desktop);
    let run = || {
        let mut sched = ManualScheduler::new();
        let mut show = show_with(preset, 10);
        show.start(&mut sched);
        pump(&mut show, &mut sched, Duration::from_secs(3), FRAME);
        (show.particles().as_slice().to_vec(), show.effect().stats())
    };
    assert_eq!(run(), run());
}

/// Test: a missing surface makes the show a no-op, a bad resize is rejected.
#[test]
fn test_surface_edge_cases() {
    let mut sched = ManualScheduler::new();
    let mut show: Show = Session::new(
        Fireworks::new(Intensity::Normal, DeviceClass::Desktop),
        None,
        SeededRandom::default(),
    );
    assert!(!show.start(&mut sched));
    assert_eq!(sched.pending_timers(), 0);
    assert!(!sched.frame_pending());

    show.attach_surface(RecordingSurface::new(400.0, 300.0));
    assert!(show.on_resize(f32::NAN, 300.0).is_err());
    assert!(show.on_resize(-1.0, 300.0).is_err());
    assert!(show.on_resize(200.0, 100.0).is_ok());
    assert!(show.start(&mut sched));

    fire_due(&mut show, &mut sched, Duration::ZERO);
    for p in show.particles() {
        assert!((0.0..200.0).contains(&p.position.x));
    }
}

/// Test: both effects come up from a TOML document and share a seed.
#[test]
fn test_config_drives_both_effects() {
    let config = EffectsConfig::from_toml_str(
        r##"
        seed = 2026

        [hearts]
        area_per_heart = 10000.0
        color = "#ff4081"

        [fireworks]
        intensity = "high"
        show_for_ms = 2000
        "##,
    )
    .unwrap();

    let ua = Some("Mozilla/5.0 (Linux; Android 14; Pixel 8)");
    let fireworks = Fireworks::from_config(&config.fireworks, ua);
    assert_eq!(fireworks.preset().particles_per_burst, 56);

    let mut sched = ManualScheduler::new();
    let mut show = Session::new(
        fireworks,
        Some(RecordingSurface::new(390.0, 844.0)),
        SeededRandom::new(config.seed().derive(1)),
    );
    show.start(&mut sched);
    show.stop_after(&mut sched, config.fireworks.show_duration());
    pump(&mut show, &mut sched, Duration::from_secs(6), FRAME);
    assert_eq!(show.state(), SessionState::Parked);

    let hearts = FloatingHearts::from_config(&config.hearts).unwrap();
    let mut bg_sched = ManualScheduler::new();
    let mut background = Session::new(
        hearts,
        Some(RecordingSurface::new(390.0, 844.0)),
        SeededRandom::new(config.seed().derive(2)),
    );
    background.start(&mut bg_sched);
    assert_eq!(background.live_count(), 32);
    pump(&mut background, &mut bg_sched, Duration::from_secs(2), FRAME);
    assert_eq!(background.live_count(), 32);

    let frame = background
        .surface()
        .map(RecordingSurface::last_frame)
        .unwrap_or_default();
    assert_eq!(frame.first(), Some(&DrawCommand::Clear));
    assert_eq!(frame.len(), 33);
}
