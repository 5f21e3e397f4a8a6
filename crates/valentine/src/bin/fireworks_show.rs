//! # Fireworks Show
//!
//! Runs the accepted view of the page headlessly:
//!
//! YES clicked → hearts keep floating → fireworks for the show window →
//! sparks drain → overlay loop parks.
//!
//! Everything runs on a virtual clock, so a 14 second show finishes in
//! milliseconds and the same seed always prints the same report.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing::{error, Level};
use valentine::core::Extent;
use valentine::effects::{DeviceClass, EffectsConfig, Intensity};
use valentine::{CelebrationShow, ShowReport, FRAME_INTERVAL};

/// Time after the window closes for the last sparks to burn out.
const DRAIN_ALLOWANCE: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntensityArg {
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeviceArg {
    Desktop,
    Mobile,
}

/// Headless run of the Valentine fireworks show.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured intensity.
    #[arg(short, long, value_enum)]
    intensity: Option<IntensityArg>,

    /// Overrides the configured or detected device class.
    #[arg(short, long, value_enum)]
    device: Option<DeviceArg>,

    /// Browser user agent used for device detection.
    #[arg(long)]
    user_agent: Option<String>,

    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Log session events.
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<EffectsConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EffectsConfig::from_toml_file(path)?,
        None => EffectsConfig {
            fireworks: valentine::effects::FireworksConfig {
                intensity: Intensity::High,
                ..Default::default()
            },
            ..Default::default()
        },
    };

    if let Some(intensity) = args.intensity {
        config.fireworks.intensity = match intensity {
            IntensityArg::Normal => Intensity::Normal,
            IntensityArg::High => Intensity::High,
        };
    }
    if let Some(device) = args.device {
        config.fireworks.device = Some(match device {
            DeviceArg::Desktop => DeviceClass::Desktop,
            DeviceArg::Mobile => DeviceClass::Mobile,
        });
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn print_report(label: &str, report: &ShowReport) {
    println!("── {label} ──");
    println!("  hearts:    {} live, {} frames", report.hearts_live, report.hearts.frames);
    println!(
        "  fireworks: {} live (peak {}), {} frames, {} timer firings, {:?}",
        report.sparks_live,
        report.fireworks.peak_live,
        report.fireworks.frames,
        report.fireworks.timers_fired,
        report.fireworks_state
    );
    println!(
        "  bursts:    {} fired, {} dropped, {} multi, {} sparks",
        report.bursts.bursts,
        report.bursts.dropped,
        report.bursts.multi_bursts,
        report.bursts.particles_spawned
    );
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let window = config.fireworks.show_duration();
    let mut show = CelebrationShow::new(
        &config,
        Extent::new(args.width, args.height),
        args.user_agent.as_deref(),
    )?;

    println!("╔══════════════════════════════════════════╗");
    println!("║          VALENTINE FIREWORKS SHOW        ║");
    println!("╚══════════════════════════════════════════╝");
    println!(
        "  {}x{}, {:?} intensity, {:?} window, seed {:#x}",
        args.width,
        args.height,
        config.fireworks.intensity,
        window,
        config.seed().value()
    );

    if !show.start() {
        return Err("no drawing surface".into());
    }

    let started = Instant::now();
    let during = show.run(window, FRAME_INTERVAL);
    print_report("show window", &during);
    let after = show.run(DRAIN_ALLOWANCE, FRAME_INTERVAL);
    print_report("after drain", &after);

    show.teardown();
    println!("  teardown:  {} timers left", show.pending_timers());
    println!("  simulated in {:?}", started.elapsed());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fireworks show failed: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
