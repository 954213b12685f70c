//! Primitive operations on the hyperboloid model of the hyperbolic plane
//!
//! Points live on the upper sheet of `x² + y² − z² = −1` and tangent vectors
//! are ordinary 3-vectors that are Lorentz-orthogonal to their base point.
//! Everything here is a pure function over `Vec3`.

use nalgebra::Vector3;

/// A point on the hyperboloid or a tangent vector, depending on context
pub type Vec3 = Vector3<f64>;

/// Below this distance two points are treated as coincident
pub const DIRECTION_EPSILON: f64 = 1e-7;

/// Below this distance a point reflection is treated as the identity
pub const REFLECTION_EPSILON: f64 = 1e-5;

/// The bottom of the hyperboloid, `(0, 0, 1)`
pub fn origin() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// Lorentz (Minkowski) inner product `u.x·v.x + u.y·v.y − u.z·v.z`
pub fn lorentz_dot(u: &Vec3, v: &Vec3) -> f64 {
    u.x * v.x + u.y * v.y - u.z * v.z
}

/// Geodesic distance between two points on the hyperboloid.
///
/// Round-off can push `−⟨p,q⟩` slightly below 1 for nearly equal points,
/// which is outside the domain of `acosh`; those cases return 0.
pub fn distance(p: &Vec3, q: &Vec3) -> f64 {
    let operand = -lorentz_dot(p, q);
    if operand > 1.0 { operand.acosh() } else { 0.0 }
}

/// Lorentz norm of a space-like vector, 0 for null or time-like vectors
pub fn lorentz_norm(v: &Vec3) -> f64 {
    let operand = lorentz_dot(v, v);
    if operand > 0.0 { operand.sqrt() } else { 0.0 }
}

/// Unit tangent vector at `p` pointing along the geodesic toward `q`.
///
/// Returns the zero vector when the points (numerically) coincide.
pub fn direction(p: &Vec3, q: &Vec3) -> Vec3 {
    let d = distance(p, q);
    if d > DIRECTION_EPSILON {
        (q - p * d.cosh()) / d.sinh()
    } else {
        Vec3::zeros()
    }
}

/// Re-derive `z` from `x` and `y` so the point lies on the hyperboloid
pub fn correct_z(v: &mut Vec3) {
    v.z = (v.x * v.x + v.y * v.y + 1.0).sqrt();
}

/// Hyperboloid point above the plane coordinates `(x, y)`
pub fn lift(x: f64, y: f64) -> Vec3 {
    let mut p = Vec3::new(x, y, 0.0);
    correct_z(&mut p);
    p
}

/// Map a normalized screen coordinate inside the unit disk to the hyperboloid.
///
/// Outside the unit disk the result has non-finite coordinates.
pub fn deproject(x: f64, y: f64) -> Vec3 {
    Vec3::new(x, y, 1.0) / (1.0 - x * x - y * y).sqrt()
}

/// Screen-space disk coordinate of a hyperboloid point (inverse of [`deproject`])
pub fn project(p: &Vec3) -> (f64, f64) {
    (p.x / p.z, p.y / p.z)
}

/// True when every coordinate is finite
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// How far `p` is from satisfying `x² + y² − z² = −1`
pub fn hyperboloid_residual(p: &Vec3) -> f64 {
    lorentz_dot(p, p) + 1.0
}

/// Point reflection of `pos` through `center`.
///
/// Walks twice the distance to `center` along the geodesic through it, so
/// `center` ends up halfway between the old and new position.
pub fn reflect_through(pos: &Vec3, center: &Vec3) -> Vec3 {
    let d = distance(pos, center);
    if d <= REFLECTION_EPSILON {
        return *pos;
    }
    let dir = direction(pos, center);
    let mut reflected = pos * (2.0 * d).cosh() + dir * (2.0 * d).sinh();
    correct_z(&mut reflected);
    reflected
}
