//! Graph topology for the layout
//!
//! The adjacency is a dense, symmetric, irreflexive relation over the
//! ordinary nodes, stored as an `n × n` bitset. It is fixed once built.

use std::fmt;

use bitvec::vec::BitVec;
use rand::Rng;
use rand::seq::index;
use thiserror::Error;

/// Errors that can occur while building an adjacency
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// More edges were requested than unordered pairs exist
    #[error("cannot place {requested} edges among {nodes} nodes (at most {max})")]
    TooManyEdges {
        requested: usize,
        nodes: usize,
        max: usize,
    },

    /// An edge connects a node to itself
    #[error("self-loop on node {0}")]
    SelfLoop(usize),

    /// An edge endpoint does not name a node
    #[error("edge ({0}, {1}) references a node outside 0..{2}")]
    OutOfRange(usize, usize, usize),

    /// The same unordered pair was listed twice
    #[error("duplicate edge ({0}, {1})")]
    Duplicate(usize, usize),
}

/// Number of edges to generate for `nodes` nodes at `percent` of the complete graph
pub fn target_edge_count(nodes: usize, percent: u32) -> usize {
    max_edges(nodes) * percent as usize / 100
}

/// Number of unordered pairs among `nodes` nodes
pub fn max_edges(nodes: usize) -> usize {
    nodes * nodes.saturating_sub(1) / 2
}

/// Symmetric adjacency relation over `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    n: usize,
    bits: BitVec,
    edge_count: usize,
}

impl Adjacency {
    /// Create an adjacency with no edges
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            bits: BitVec::repeat(false, n * n),
            edge_count: 0,
        }
    }

    /// Build an adjacency from an explicit list of unordered pairs
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut adjacency = Self::empty(n);
        for &(a, b) in edges {
            if a >= n || b >= n {
                return Err(GraphError::OutOfRange(a, b, n));
            }
            if a == b {
                return Err(GraphError::SelfLoop(a));
            }
            if adjacency.has_edge(a, b) {
                return Err(GraphError::Duplicate(a.min(b), a.max(b)));
            }
            adjacency.connect(a, b);
        }
        Ok(adjacency)
    }

    /// Sample `edge_count` distinct unordered pairs uniformly at random
    pub fn random<R: Rng + ?Sized>(
        n: usize,
        edge_count: usize,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        let max = max_edges(n);
        if edge_count > max {
            return Err(GraphError::TooManyEdges {
                requested: edge_count,
                nodes: n,
                max,
            });
        }

        // Pairs are numbered row by row over the upper triangle
        let mut picked = index::sample(rng, max, edge_count).into_vec();
        picked.sort_unstable();

        let mut adjacency = Self::empty(n);
        let (mut row, mut row_start) = (0, 0);
        for k in picked {
            while k >= row_start + (n - 1 - row) {
                row_start += n - 1 - row;
                row += 1;
            }
            adjacency.connect(row, row + 1 + (k - row_start));
        }
        Ok(adjacency)
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.bits.set(a * self.n + b, true);
        self.bits.set(b * self.n + a, true);
        self.edge_count += 1;
    }

    /// Number of nodes the relation is defined over
    pub fn node_count(&self) -> usize {
        self.n
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `i` and `j` are connected
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        i < self.n && j < self.n && self.bits[i * self.n + j]
    }

    /// Iterate over edges as `(i, j)` with `i < j`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |i| {
            ((i + 1)..self.n)
                .filter(move |&j| self.has_edge(i, j))
                .map(move |j| (i, j))
        })
    }

    /// Number of neighbours of `i`
    pub fn degree(&self, i: usize) -> usize {
        if i >= self.n {
            return 0;
        }
        self.bits[i * self.n..(i + 1) * self.n].count_ones()
    }
}

/// Renders the matrix with `#` for an edge and `.` otherwise, one row per line
impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            if i > 0 {
                writeln!(f)?;
            }
            for j in 0..self.n {
                f.write_str(if self.has_edge(i, j) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}
