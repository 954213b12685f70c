//! Randomized reseeding of the layout
//!
//! Scatters every node over a square around the origin, then runs greedy
//! passes: each node draws a fresh random candidate and keeps it only if the
//! position-only force there is weaker than where it currently sits. Nodes
//! are visited in index order and see the moves made earlier in the pass.

use rand::Rng;

use crate::config::{HeuristicConfig, PhysicsConfig};
use crate::forces;
use crate::geometry::{self, Vec3};
use crate::state::{Node, SimulationState};

/// Summary of a reseed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReseedReport {
    /// Greedy passes run
    pub passes: usize,
    /// Candidates accepted over all passes
    pub accepted: usize,
}

/// Uniform random point over the square `[-extent/2, extent/2]²`, lifted
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> Vec3 {
    let half = extent / 2.0;
    geometry::lift(rng.gen_range(-half..=half), rng.gen_range(-half..=half))
}

/// Move node `i` to `candidate` if the layout force there is strictly weaker.
///
/// Returns whether the candidate was accepted.
pub fn try_candidate(
    state: &mut SimulationState,
    i: usize,
    candidate: Vec3,
    physics: &PhysicsConfig,
) -> bool {
    let current = state.nodes[i].position;
    let current_force = geometry::lorentz_norm(&forces::layout_force(state, i, &current, physics));
    let candidate_force =
        geometry::lorentz_norm(&forces::layout_force(state, i, &candidate, physics));

    if candidate_force < current_force {
        state.nodes[i].position = candidate;
        true
    } else {
        false
    }
}

/// Scatter all nodes, reset the anchor, then improve greedily
pub fn reseed<R: Rng + ?Sized>(
    state: &mut SimulationState,
    heuristic: &HeuristicConfig,
    physics: &PhysicsConfig,
    rng: &mut R,
) -> ReseedReport {
    for node in &mut state.nodes {
        *node = Node::at(random_position(rng, heuristic.extent));
    }
    state.anchor = Node::default();

    let mut report = ReseedReport::default();
    for _ in 0..heuristic.tries {
        for i in 0..state.len() {
            let candidate = random_position(rng, heuristic.extent);
            if try_candidate(state, i, candidate, physics) {
                report.accepted += 1;
            }
        }
        report.passes += 1;
    }
    report
}
