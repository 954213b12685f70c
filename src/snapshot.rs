//! Serializable view of the layout for renderers and CLI output

use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::state::{Node, SimulationState};

/// One node as a renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Hyperboloid coordinates `[x, y, z]`
    pub position: [f64; 3],
    /// Screen-space disk coordinates `[x/z, y/z]`
    pub disk: [f64; 2],
    /// Lorentz speed
    pub speed: f64,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        let (dx, dy) = geometry::project(&node.position);
        Self {
            position: [node.position.x, node.position.y, node.position.z],
            disk: [dx, dy],
            speed: node.speed(),
        }
    }
}

/// The whole layout at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Ordinary nodes in index order
    pub nodes: Vec<NodeSnapshot>,
    /// The fixed centering anchor
    pub anchor: NodeSnapshot,
    /// Edges as `[i, j]` with `i < j`
    pub edges: Vec<[usize; 2]>,
}

impl From<&SimulationState> for LayoutSnapshot {
    fn from(state: &SimulationState) -> Self {
        Self {
            nodes: state.nodes.iter().map(NodeSnapshot::from).collect(),
            anchor: NodeSnapshot::from(&state.anchor),
            edges: state.adjacency.edges().map(|(i, j)| [i, j]).collect(),
        }
    }
}
