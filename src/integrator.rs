//! Explicit integration of the force model along geodesics
//!
//! One step has two phases. First every velocity absorbs its net force (unit
//! mass, unit time step), all computed from the same snapshot of positions.
//! Then every node moves along the geodesic its velocity points along, and
//! the velocity is carried to the new position.

use crate::config::PhysicsConfig;
use crate::forces;
use crate::geometry::{self, Vec3};
use crate::state::SimulationState;

/// Speeds at or below this leave the node where it is for the step
pub const MIN_SPEED: f64 = 1e-5;

/// Outcome counters for one or more steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Node updates committed
    pub moved: usize,
    /// Nodes that were too slow to move
    pub stationary: usize,
    /// Updates dropped because the velocity or new position was not finite
    pub rejected: usize,
}

impl StepStats {
    fn absorb(&mut self, other: StepStats) {
        self.moved += other.moved;
        self.stationary += other.stationary;
        self.rejected += other.rejected;
    }
}

/// Advance every ordinary node by one step; the anchor is left alone
pub fn step(state: &mut SimulationState, physics: &PhysicsConfig) -> StepStats {
    let frozen: &SimulationState = state;
    let net: Vec<Vec3> = (0..frozen.len())
        .map(|i| forces::net_force(frozen, i, physics))
        .collect();
    for (node, force) in state.nodes.iter_mut().zip(net) {
        node.velocity += force;
    }

    let mut stats = StepStats::default();
    for node in &mut state.nodes {
        if !geometry::is_finite(&node.velocity) {
            node.velocity = Vec3::zeros();
            stats.rejected += 1;
            continue;
        }
        let speed = geometry::lorentz_norm(&node.velocity);
        if speed <= MIN_SPEED {
            stats.stationary += 1;
            continue;
        }

        let old = node.position;
        let mut moved = old * speed.cosh() + node.velocity / speed.sqrt() * speed.sinh();
        geometry::correct_z(&mut moved);

        if geometry::is_finite(&moved) {
            node.position = moved;
            node.velocity = -geometry::direction(&moved, &old) * speed;
            stats.moved += 1;
        } else {
            stats.rejected += 1;
        }
    }
    stats
}

/// Run `steps` consecutive steps
pub fn run(state: &mut SimulationState, physics: &PhysicsConfig, steps: usize) -> StepStats {
    let mut total = StepStats::default();
    for _ in 0..steps {
        total.absorb(step(state, physics));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::lorentz_dot;
    use crate::graph::Adjacency;

    fn free_physics() -> PhysicsConfig {
        PhysicsConfig {
            centering: 0.0,
            pull: 0.0,
            push: 0.0,
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn resting_node_without_force_stays_put() {
        let mut state = SimulationState::with_positions(Adjacency::empty(1), &[(0.4, -0.2)]);
        let before = state.nodes[0];

        let stats = step(&mut state, &free_physics());

        assert_eq!(state.nodes[0], before);
        assert_eq!(stats.stationary, 1);
        assert_eq!(stats.moved, 0);
    }

    #[test]
    fn lone_node_at_anchor_stays_put() {
        let mut state = SimulationState::with_positions(Adjacency::empty(1), &[(0.0, 0.0)]);
        run(&mut state, &PhysicsConfig::default(), 10);
        assert_eq!(state.nodes[0].position, geometry::origin());
        assert_eq!(state.nodes[0].velocity, Vec3::zeros());
    }

    #[test]
    fn moving_node_keeps_speed_and_constraint() {
        let mut state = SimulationState::with_positions(Adjacency::empty(1), &[(0.0, 0.0)]);
        state.nodes[0].velocity = Vec3::new(0.01, 0.0, 0.0);

        let stats = step(&mut state, &free_physics());
        let node = state.nodes[0];

        assert_eq!(stats.moved, 1);
        assert!(node.position.x > 0.0);
        assert!(geometry::hyperboloid_residual(&node.position).abs() < 1e-12);
        assert!(lorentz_dot(&node.velocity, &node.position).abs() < 1e-9);
        assert!(node.velocity.x > 0.0, "velocity keeps pointing forward");
    }

    #[test]
    fn anchor_is_never_integrated() {
        let mut state =
            SimulationState::with_positions(Adjacency::empty(2), &[(1.0, 0.0), (0.0, 1.0)]);
        state.anchor.velocity = Vec3::new(0.5, 0.0, 0.0);
        let anchor = state.anchor;

        run(&mut state, &PhysicsConfig::default(), 5);

        assert_eq!(state.anchor, anchor);
    }

    #[test]
    fn non_finite_velocity_is_reset() {
        let mut state = SimulationState::with_positions(Adjacency::empty(1), &[(0.2, 0.2)]);
        let position = state.nodes[0].position;
        // Friction on this speed overflows during the velocity update
        state.nodes[0].velocity = Vec3::new(1e300, 0.0, 0.0);

        let stats = step(&mut state, &free_physics());

        assert_eq!(stats.rejected, 1);
        assert_eq!(state.nodes[0].position, position);
        assert_eq!(state.nodes[0].velocity, Vec3::zeros());
    }

    #[test]
    fn overflowing_move_keeps_position_and_velocity() {
        let physics = PhysicsConfig {
            friction: 0.0,
            ..free_physics()
        };
        let mut state = SimulationState::with_positions(Adjacency::empty(1), &[(0.2, 0.2)]);
        let position = state.nodes[0].position;
        let velocity = Vec3::new(1000.0, 0.0, 0.0);
        state.nodes[0].velocity = velocity;

        let stats = step(&mut state, &physics);

        assert_eq!(
            stats,
            StepStats {
                moved: 0,
                stationary: 0,
                rejected: 1
            }
        );
        assert_eq!(state.nodes[0].position, position);
        assert_eq!(state.nodes[0].velocity, velocity);
    }

    #[test]
    fn connected_pair_settles_on_hyperboloid() {
        let adjacency = Adjacency::from_edges(2, &[(0, 1)]).unwrap();
        let mut state = SimulationState::with_positions(adjacency, &[(-1.0, 0.0), (1.0, 0.0)]);
        let start = geometry::distance(&state.nodes[0].position, &state.nodes[1].position);

        run(&mut state, &PhysicsConfig::default(), 400);

        let end = geometry::distance(&state.nodes[0].position, &state.nodes[1].position);
        assert!(end < start, "edge spring should shorten the edge");
        assert!(state.max_residual() < 1e-9);
        assert!(state.nodes.iter().all(|n| geometry::is_finite(&n.position)));
    }

    #[test]
    fn run_accumulates_stats() {
        let mut state =
            SimulationState::with_positions(Adjacency::empty(2), &[(0.0, 0.0), (0.0, 0.0)]);
        let stats = run(&mut state, &free_physics(), 3);
        assert_eq!(stats.stationary, 6);
    }
}
