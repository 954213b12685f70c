//! Force model
//!
//! All forces are tangent vectors at the node they act on, built from
//! [`geometry::direction`] so they share one tangent frame and can be summed.
//!
//! - **Centering**: quadratic in the distance to the anchor, keeps the layout
//!   from drifting off.
//! - **Friction**: opposes velocity, quadratic in speed.
//! - **Edges**: cubic spring toward `optimal_distance`.
//! - **Non-edges**: inverse-square repulsion.

use crate::config::PhysicsConfig;
use crate::geometry::{self, DIRECTION_EPSILON, Vec3};
use crate::state::SimulationState;

/// Pull of a node at `position` toward the anchor
pub fn centering_force(state: &SimulationState, position: &Vec3, physics: &PhysicsConfig) -> Vec3 {
    let anchor = &state.anchor.position;
    let d = geometry::distance(position, anchor);
    geometry::direction(position, anchor) * (physics.base_force * physics.centering * d * d)
}

/// Drag opposing `velocity`
pub fn friction_force(velocity: &Vec3, physics: &PhysicsConfig) -> Vec3 {
    let speed = geometry::lorentz_norm(velocity);
    velocity * (-physics.base_force * physics.friction * speed)
}

/// Sum of edge springs and non-edge repulsion acting on node `i` as if it sat at `position`
pub fn pairwise_force(
    state: &SimulationState,
    i: usize,
    position: &Vec3,
    physics: &PhysicsConfig,
) -> Vec3 {
    let mut total = Vec3::zeros();
    for (j, other) in state.nodes.iter().enumerate() {
        if j == i {
            continue;
        }
        let d = geometry::distance(position, &other.position);
        if d <= DIRECTION_EPSILON {
            continue;
        }
        let dir = geometry::direction(position, &other.position);
        let magnitude = if state.adjacency.has_edge(i, j) {
            let deviation = d - physics.optimal_distance;
            physics.base_force * physics.pull * deviation.powi(3) / d
        } else {
            -physics.base_force * physics.push / (d * d)
        };
        total += dir * magnitude;
    }
    total
}

/// Position-only force on node `i` at `position`: centering plus pairwise
pub fn layout_force(
    state: &SimulationState,
    i: usize,
    position: &Vec3,
    physics: &PhysicsConfig,
) -> Vec3 {
    centering_force(state, position, physics) + pairwise_force(state, i, position, physics)
}

/// Full force on node `i` at its current position and velocity
pub fn net_force(state: &SimulationState, i: usize, physics: &PhysicsConfig) -> Vec3 {
    let node = &state.nodes[i];
    layout_force(state, i, &node.position, physics) + friction_force(&node.velocity, physics)
}
