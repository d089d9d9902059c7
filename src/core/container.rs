//! Circular container geometry with an optional fixed obstacle at its center.
//!
//! The coordinate origin is the container center, which is also the obstacle center.

use crate::core::particle::Particle;
use crate::core::vector::{self, Vec2};
use crate::error::{Error, Result};
use std::f64::consts::PI;

/// Inner diameter of the standard container.
pub const CONTAINER_DIAMETER: f64 = 0.1;

/// Radius of the standard central obstacle.
pub const OBSTACLE_RADIUS: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    /// Inner radius of the enclosing wall.
    pub radius: f64,
    /// Radius of the central obstacle, if one is configured.
    pub obstacle_radius: Option<f64>,
}

impl Container {
    /// The standard container (`CONTAINER_DIAMETER`), with or without the standard obstacle.
    pub fn standard(obstacle_present: bool) -> Self {
        Self {
            radius: CONTAINER_DIAMETER / 2.0,
            obstacle_radius: obstacle_present.then_some(OBSTACLE_RADIUS),
        }
    }

    /// Custom geometry.
    ///
    /// Errors: `Error::InvalidParam` unless `0 < obstacle_radius < radius`.
    pub fn new(radius: f64, obstacle_radius: Option<f64>) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam(
                "container radius must be finite and > 0".into(),
            ));
        }
        if let Some(ro) = obstacle_radius {
            if !ro.is_finite() || ro <= 0.0 || ro >= radius {
                return Err(Error::InvalidParam(
                    "obstacle radius must be finite, > 0 and smaller than the container radius"
                        .into(),
                ));
            }
        }
        Ok(Self {
            radius,
            obstacle_radius,
        })
    }

    #[inline]
    pub fn has_obstacle(&self) -> bool {
        self.obstacle_radius.is_some()
    }

    #[inline]
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Center distance at which a disk of `particle_radius` touches the wall.
    #[inline]
    pub fn wall_contact_radius(&self, particle_radius: f64) -> f64 {
        self.radius - particle_radius
    }

    /// Center distance at which a disk of `particle_radius` touches the obstacle.
    #[inline]
    pub fn obstacle_contact_radius(&self, particle_radius: f64) -> Option<f64> {
        self.obstacle_radius.map(|ro| ro + particle_radius)
    }

    /// Length of the container wall.
    #[inline]
    pub fn wall_perimeter(&self) -> f64 {
        PI * self.diameter()
    }

    /// Length of the obstacle boundary, zero when no obstacle is configured.
    #[inline]
    pub fn obstacle_perimeter(&self) -> f64 {
        self.obstacle_radius.map_or(0.0, |ro| 2.0 * PI * ro)
    }

    /// Whether a single disk of `particle_radius` fits between obstacle and wall.
    pub fn fits(&self, particle_radius: f64) -> bool {
        if particle_radius <= 0.0 {
            return false;
        }
        match self.obstacle_radius {
            Some(ro) => ro + particle_radius < self.radius - particle_radius,
            None => particle_radius < self.radius,
        }
    }

    /// Whether a disk centered at `r` lies fully inside the container and outside the obstacle.
    pub fn contains(&self, r: &Vec2, particle_radius: f64) -> bool {
        let dist = vector::norm(r);
        if dist + particle_radius > self.radius {
            return false;
        }
        match self.obstacle_radius {
            Some(ro) => dist >= ro + particle_radius,
            None => true,
        }
    }

    /// Placement predicate used by the sampler: inside the container, outside
    /// the obstacle and not overlapping any already placed particle.
    pub fn is_valid_position(&self, candidate: &Particle, placed: &[Particle]) -> bool {
        self.contains(&candidate.r, candidate.radius)
            && !placed.iter().any(|p| candidate.overlaps(p))
    }
}
