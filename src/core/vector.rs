//! Small helpers over 2-component vectors.

/// Spatial dimension of the simulation.
pub const DIM: usize = 2;

/// A 2-component vector (x, y).
pub type Vec2 = [f64; DIM];

#[inline]
pub fn dot(a: &Vec2, b: &Vec2) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub fn sub(a: &Vec2, b: &Vec2) -> Vec2 {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub fn add(a: &Vec2, b: &Vec2) -> Vec2 {
    [a[0] + b[0], a[1] + b[1]]
}

#[inline]
pub fn scale(a: &Vec2, s: f64) -> Vec2 {
    [a[0] * s, a[1] * s]
}

#[inline]
pub fn norm(a: &Vec2) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`, or `None` when `a` has (numerically) zero length.
#[inline]
pub fn normalize(a: &Vec2) -> Option<Vec2> {
    let n = norm(a);
    if n <= f64::MIN_POSITIVE || !n.is_finite() {
        return None;
    }
    Some(scale(a, 1.0 / n))
}
