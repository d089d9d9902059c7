//! Hard-disk gas in a circular container, simulated event by event.
//!
//! The engine (`core::Simulation`) jumps from one predicted collision to the
//! next, moving particles ballistically in between. Frames are handed to a
//! `output::FrameSink` after every resolved event.

pub mod config;
pub mod core;
pub mod error;
pub mod output;

#[cfg(feature = "python")]
mod python;

pub use crate::config::SimConfig;
pub use crate::core::Simulation;
pub use crate::error::{Error, Result};
