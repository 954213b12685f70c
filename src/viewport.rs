//! Screen mapping and hyperbolic panning
//!
//! Panning is an isometry of the plane, not a shift of screen coordinates: a
//! drag from `a` to `b` becomes the hyperbolic translation carrying the point
//! under `a` to the point under `b`, built as two point reflections whose
//! centers sit on the geodesic from `a` to `b`, half the drag length apart.

use crate::geometry::{self, Vec3};
use crate::state::SimulationState;

/// Pointer moves shorter than this (in normalized units) are ignored
pub const MIN_DRAG: f64 = 0.001;

/// Pixel size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface width in pixels
    pub width: f64,
    /// Surface height in pixels
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Create a viewport with the given dimensions
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert pixel coordinates (origin top-left, y down) to normalized
    /// coordinates in `[-1, 1]²` (origin centered, y up)
    pub fn normalize(&self, px: f64, py: f64) -> (f64, f64) {
        (2.0 * px / self.width - 1.0, 1.0 - 2.0 * py / self.height)
    }

    /// Convert normalized coordinates back to pixels
    pub fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        ((x + 1.0) * self.width / 2.0, (1.0 - y) * self.height / 2.0)
    }

    /// Resize the surface
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

/// The two reflection centers of the translation taking `from` to `to`
pub fn reflection_centers(from: (f64, f64), to: (f64, f64)) -> (Vec3, Vec3) {
    let p = geometry::deproject(from.0, from.1);
    let q = geometry::deproject(to.0, to.1);

    let dir = geometry::direction(&p, &q);
    let half = geometry::distance(&p, &q) / 2.0;
    let midpoint = p * half.cosh() + dir * half.sinh();
    (p, midpoint)
}

/// Apply the translation with the given reflection centers to one point
pub fn translate_point(position: &Vec3, centers: &(Vec3, Vec3)) -> Vec3 {
    let once = geometry::reflect_through(position, &centers.0);
    geometry::reflect_through(&once, &centers.1)
}

/// Pan the whole layout, anchor included, by the drag from `from` to `to`.
///
/// Nodes whose new position would not be finite keep their old one. Every
/// velocity is zeroed. Returns the number of nodes (anchor included) moved.
pub fn translate(state: &mut SimulationState, from: (f64, f64), to: (f64, f64)) -> usize {
    let centers = reflection_centers(from, to);

    let mut moved = 0;
    for node in state.nodes.iter_mut().chain(std::iter::once(&mut state.anchor)) {
        let next = translate_point(&node.position, &centers);
        if geometry::is_finite(&next) {
            node.position = next;
            moved += 1;
        }
    }
    state.stop();
    moved
}
