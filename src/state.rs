//! Simulation state: node arena, anchor, and adjacency

use std::f64::consts::PI;

use crate::geometry::{self, Vec3};
use crate::graph::Adjacency;

/// A node on the hyperboloid with its tangent velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Position on the hyperboloid
    pub position: Vec3,
    /// Tangent vector at `position`
    pub velocity: Vec3,
}

impl Node {
    /// A stationary node at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
        }
    }

    /// Lorentz speed of the node
    pub fn speed(&self) -> f64 {
        geometry::lorentz_norm(&self.velocity)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::at(geometry::origin())
    }
}

/// Everything the physics reads and writes.
///
/// Ordinary nodes are addressed by their index in `nodes`, which is also the
/// index space of `adjacency`. The anchor is the centering target; the
/// integrator never moves it but a pan does.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub nodes: Vec<Node>,
    pub anchor: Node,
    pub adjacency: Adjacency,
}

impl SimulationState {
    /// Place one node per adjacency entry on a circle of `radius`, at rest
    pub fn on_circle(adjacency: Adjacency, radius: f64) -> Self {
        let n = adjacency.node_count();
        let nodes = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * (i as f64) / (n as f64);
                Node::at(geometry::lift(radius * angle.cos(), radius * angle.sin()))
            })
            .collect();

        Self {
            nodes,
            anchor: Node::default(),
            adjacency,
        }
    }

    /// Use explicit positions (each is lifted onto the hyperboloid)
    pub fn with_positions(adjacency: Adjacency, positions: &[(f64, f64)]) -> Self {
        debug_assert_eq!(adjacency.node_count(), positions.len());
        let nodes = positions
            .iter()
            .map(|&(x, y)| Node::at(geometry::lift(x, y)))
            .collect();

        Self {
            nodes,
            anchor: Node::default(),
            adjacency,
        }
    }

    /// Number of ordinary nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when there are no ordinary nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Set every velocity, anchor included, to zero
    pub fn stop(&mut self) {
        for node in &mut self.nodes {
            node.velocity = Vec3::zeros();
        }
        self.anchor.velocity = Vec3::zeros();
    }

    /// Largest deviation from the hyperboloid constraint over all nodes
    pub fn max_residual(&self) -> f64 {
        self.nodes
            .iter()
            .chain(std::iter::once(&self.anchor))
            .map(|n| geometry::hyperboloid_residual(&n.position).abs())
            .fold(0.0, f64::max)
    }

    /// Sum of node speeds, a rough measure of how settled the layout is
    pub fn kinetic_measure(&self) -> f64 {
        self.nodes.iter().map(Node::speed).sum()
    }
}
