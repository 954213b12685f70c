//! hyperlayout - Force-directed graph layout on the hyperbolic plane.
//!
//! Nodes live on the hyperboloid model and move under a centering force,
//! edge springs, non-edge repulsion, and friction. Panning is a hyperbolic
//! translation. Drawing is left to the host; [`session::Session`] exposes the
//! event callbacks a windowing front end forwards.

pub mod config;
pub mod forces;
pub mod geometry;
pub mod graph;
pub mod heuristic;
pub mod integrator;
pub mod pacer;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod viewport;
