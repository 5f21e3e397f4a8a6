//! # Valentine
//!
//! Floating hearts and fireworks for the Valentine page.
//!
//! ## Crates
//!
//! - [`core`]: particle loop, session lifecycle, host traits, headless host
//! - [`effects`]: floating-hearts background, fireworks overlay, configuration
//!
//! ## Modules
//!
//! - `show`: the accepted view (hearts + a bounded fireworks window)

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod show;

// Re-export the crates
pub use valentine_core as core;
pub use valentine_effects as effects;

pub use show::{CelebrationShow, ShowReport, FRAME_INTERVAL};
