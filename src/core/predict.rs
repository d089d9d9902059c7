//! Closed-form collision-time prediction.
//!
//! All functions return times relative to the particles' current state; the
//! engine adds its current time before scheduling.

use crate::core::particle::Particle;
use crate::core::vector;

/// Boundary roots at or below this value are discarded so that a particle
/// resting on a boundary after reflection does not hit it again immediately.
pub const ROOT_EPS: f64 = 1e-10;

/// Time until disks `p1` and `p2` touch, if they are approaching and their
/// paths intersect.
///
/// Accepts `dt >= 0`: separating pairs are already excluded by `dvdr >= 0`,
/// so a pair that has just been resolved is never predicted again at `dt = 0`.
pub fn pair_collision_time(p1: &Particle, p2: &Particle) -> Option<f64> {
    let dr = vector::sub(&p2.r, &p1.r);
    let dv = vector::sub(&p2.v, &p1.v);
    let dvdr = vector::dot(&dr, &dv);
    if dvdr >= 0.0 {
        return None;
    }
    let dvdv = vector::dot(&dv, &dv);
    if dvdv <= 0.0 {
        return None;
    }
    let sigma = p1.radius + p2.radius;
    let d = dvdr * dvdr - dvdv * (vector::dot(&dr, &dr) - sigma * sigma);
    if d < 0.0 {
        return None;
    }
    let dt = -(dvdr + d.sqrt()) / dvdv;
    (dt >= 0.0 && dt.is_finite()).then_some(dt)
}

/// Time until the center of `p` reaches distance `contact_radius` from the origin.
///
/// Solves `a t^2 + b t + c = 0` with `a = |v|^2`, `b = 2 r.v`,
/// `c = |r|^2 - contact_radius^2` and returns the smallest root above `ROOT_EPS`.
pub fn boundary_collision_time(p: &Particle, contact_radius: f64) -> Option<f64> {
    let a = vector::dot(&p.v, &p.v);
    if a <= 0.0 {
        return None;
    }
    let b = 2.0 * vector::dot(&p.r, &p.v);
    let c = vector::dot(&p.r, &p.r) - contact_radius * contact_radius;
    let delta = b * b - 4.0 * a * c;
    if delta < 0.0 {
        return None;
    }
    let sqrt_delta = delta.sqrt();
    let t1 = (-b - sqrt_delta) / (2.0 * a);
    let t2 = (-b + sqrt_delta) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t > ROOT_EPS && t.is_finite())
        .reduce(f64::min)
}
