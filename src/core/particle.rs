use crate::core::vector::{self, Vec2};
use crate::error::{Error, Result};

/// A hard disk of the gas.
///
/// Fields:
/// - `id`: stable identifier, equal to the particle's index in the engine's arena
/// - `r`: position [x, y], measured from the container center
/// - `v`: velocity [vx, vy]
/// - `radius`: disk radius (> 0)
/// - `mass`: particle mass (> 0)
/// - `collision_count`: incremented each time the particle takes part in a resolved event
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Position (x, y).
    pub r: Vec2,
    /// Velocity (vx, vy).
    pub v: Vec2,
    /// Disk radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Collision participation counter (for event invalidation).
    pub collision_count: u64,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any component is NaN/inf.
    pub fn new(id: u32, r: Vec2, v: Vec2, radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            collision_count: 0,
        })
    }

    /// Ballistic motion over `dt`.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.r[0] += self.v[0] * dt;
        self.r[1] += self.v[1] * dt;
    }

    /// Increment the collision counter (used for event invalidation).
    #[inline]
    pub fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * vector::dot(&self.v, &self.v)
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        vector::norm(&self.v)
    }

    /// True when the two disks intersect (touching is not overlapping).
    pub fn overlaps(&self, other: &Particle) -> bool {
        let d = vector::sub(&self.r, &other.r);
        let min_dist = self.radius + other.radius;
        vector::dot(&d, &d) < min_dist * min_dist
    }

    /// Set velocity (validated as finite).
    pub fn set_velocity(&mut self, v: Vec2) -> Result<()> {
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.v = v;
        Ok(())
    }
}
