//! Run configuration.
//!
//! A `SimConfig` fully determines one engine run. Several configs that differ
//! only in `speed` are independent and may run concurrently.

use crate::core::container::Container;
use crate::core::sampler::Placement;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of particles (> 0).
    pub particle_count: usize,

    /// Initial speed of every particle (>= 0); directions are random.
    pub speed: f64,

    /// Radius of every particle (> 0, must fit between obstacle and wall).
    pub radius: f64,

    /// Mass of every particle (> 0).
    pub mass: f64,

    /// Simulation time budget (> 0).
    pub max_time: f64,

    /// Whether the central obstacle is present.
    pub obstacle: bool,

    /// RNG seed for placement; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 210,
            speed: 1.0,
            radius: 5e-4,
            mass: 1.0,
            max_time: 0.05,
            obstacle: true,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Check ranges and geometric feasibility of a single disk.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::InvalidParam("particle_count must be > 0".into()));
        }
        if self.particle_count > u32::MAX as usize {
            return Err(Error::InvalidParam("particle_count is too large".into()));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !self.max_time.is_finite() || self.max_time <= 0.0 {
            return Err(Error::InvalidParam("max_time must be finite and > 0".into()));
        }
        if !self.container().fits(self.radius) {
            return Err(Error::InvalidParam(format!(
                "radius {} does not fit between obstacle and wall",
                self.radius
            )));
        }
        Ok(())
    }

    pub fn container(&self) -> Container {
        Container::standard(self.obstacle)
    }

    pub fn placement(&self) -> Placement {
        Placement {
            count: self.particle_count,
            speed: self.speed,
            radius: self.radius,
            mass: self.mass,
        }
    }

    /// Same configuration with a different initial speed.
    pub fn with_speed(&self, speed: f64) -> Self {
        Self {
            speed,
            ..self.clone()
        }
    }
}
