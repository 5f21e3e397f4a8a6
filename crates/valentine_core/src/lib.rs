//! # Valentine Core
//!
//! Host-agnostic particle animation engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        FRAME PIPELINE                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Host timer ─► Session::on_timer ─► Effect::run_task (spawn) │
//! │  Host frame ─► Session::on_frame ─► advance_frame            │
//! │                                     fade → move → paint → age│
//! │                                     → remove | wrap          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns no threads and blocks on nothing. The host supplies a
//! [`Surface`] and a [`Scheduler`]; an [`Effect`] supplies the policies.
//! Randomness is injected through [`RandomSource`] so runs are reproducible.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod effect;
pub mod engine;
pub mod error;
pub mod headless;
pub mod host;
pub mod math;
pub mod particle;
pub mod random;
pub mod session;

pub use color::Color;
pub use effect::{tail_fade, Effect, ExpiryPolicy, FadePolicy, SpawnContext, Timing};
pub use engine::{advance_frame, FrameStats};
pub use error::{EngineError, EngineResult};
pub use headless::{pump, ManualScheduler, PumpReport, RecordingSurface, ScriptedRandom};
pub use host::{BlendMode, DrawCommand, FrameHandle, PathSegment, Scheduler, Surface, TimerHandle};
pub use math::{Extent, Vec2};
pub use particle::{Particle, ParticleSet};
pub use random::{RandomSource, Seed, SeededRandom};
pub use session::{Session, SessionState};
