//! Application root tying the layout engine to a host event loop
//!
//! A windowing front end owns one [`Session`] and forwards its callbacks:
//! key presses, pointer down/move in pixels, and an idle tick with a
//! monotonic millisecond clock. Each callback returns whether the frame
//! should be redrawn.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::graph::{Adjacency, GraphError, target_edge_count};
use crate::heuristic::{self, ReseedReport};
use crate::integrator::{self, StepStats};
use crate::pacer::FramePacer;
use crate::snapshot::LayoutSnapshot;
use crate::state::SimulationState;
use crate::viewport::{self, MIN_DRAG, Viewport};

/// Key that starts the animation and reseeds the layout
pub const RESEED_KEY: char = ' ';

/// Owns the layout and everything needed to drive it interactively
#[derive(Debug)]
pub struct Session {
    config: Config,
    state: SimulationState,
    rng: ChaCha8Rng,
    pacer: FramePacer,
    viewport: Viewport,
    running: bool,
    drag_base: (f64, f64),
}

impl Session {
    /// Build a random graph with nodes on the starting circle, paused
    pub fn new(config: Config) -> Result<Self, GraphError> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let edges = target_edge_count(config.graph.nodes, config.graph.edge_percent);
        let adjacency = Adjacency::random(config.graph.nodes, edges, &mut rng)?;
        let state = SimulationState::on_circle(adjacency, config.graph.start_radius);

        tracing::info!(
            nodes = config.graph.nodes,
            edges,
            seed = ?config.seed,
            "created layout session"
        );

        Ok(Self::with_state(config, state, rng))
    }

    /// Wrap an existing state
    pub fn with_state(config: Config, state: SimulationState, rng: ChaCha8Rng) -> Self {
        let pacer = FramePacer::new(&config.frames);
        let viewport = Viewport::new(
            f64::from(config.viewport.width),
            f64::from(config.viewport.height),
        );
        Self {
            config,
            state,
            rng,
            pacer,
            viewport,
            running: false,
            drag_base: (0.0, 0.0),
        }
    }

    /// Current layout
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether idle ticks advance the physics
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mutable access to the viewport, e.g. on window resize
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Scatter and greedily improve the layout
    pub fn reseed(&mut self) -> ReseedReport {
        let report = heuristic::reseed(
            &mut self.state,
            &self.config.heuristic,
            &self.config.physics,
            &mut self.rng,
        );
        self.pacer.reset();
        tracing::info!(
            passes = report.passes,
            accepted = report.accepted,
            "reseeded layout"
        );
        report
    }

    /// Key press; space starts the animation from a fresh reseed
    pub fn on_key(&mut self, key: char) -> bool {
        if key != RESEED_KEY {
            return false;
        }
        self.running = true;
        self.reseed();
        true
    }

    /// Pointer pressed at pixel `(px, py)`: remember where the drag starts
    pub fn on_pointer_down(&mut self, px: f64, py: f64) {
        self.drag_base = self.viewport.normalize(px, py);
    }

    /// Pointer moved to pixel `(px, py)` while pressed: pan by the movement
    pub fn on_pointer_move(&mut self, px: f64, py: f64) -> bool {
        let current = self.viewport.normalize(px, py);
        let (dx, dy) = (current.0 - self.drag_base.0, current.1 - self.drag_base.1);
        if dx.hypot(dy) <= MIN_DRAG {
            return false;
        }
        self.pan(self.drag_base, current);
        self.drag_base = current;
        true
    }

    /// Pan by a drag between two normalized coordinates
    pub fn pan(&mut self, from: (f64, f64), to: (f64, f64)) -> usize {
        let moved = viewport::translate(&mut self.state, from, to);
        tracing::debug!(?from, ?to, moved, "panned layout");
        moved
    }

    /// Idle tick at monotonic time `now_ms`; runs any due frames
    pub fn on_idle(&mut self, now_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        let frames = self.pacer.advance(now_ms);
        if frames == 0 {
            return false;
        }
        if frames > 1 {
            tracing::debug!(frames, "catching up");
        }
        self.run_frames(frames);
        true
    }

    /// Run `frames` frames of physics regardless of the clock
    pub fn run_frames(&mut self, frames: usize) -> StepStats {
        integrator::run(
            &mut self.state,
            &self.config.physics,
            frames * self.config.frames.steps_per_frame,
        )
    }

    /// Current layout in serializable form
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::from(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameConfig, GraphConfig, HeuristicConfig};

    fn small_config() -> Config {
        Config {
            graph: GraphConfig {
                nodes: 8,
                edge_percent: 25,
                ..GraphConfig::default()
            },
            heuristic: HeuristicConfig {
                tries: 10,
                ..HeuristicConfig::default()
            },
            frames: FrameConfig {
                steps_per_frame: 2,
                ..FrameConfig::default()
            },
            seed: Some(17),
            ..Config::default()
        }
    }

    #[test]
    fn new_session_is_paused_on_circle() {
        let session = Session::new(small_config()).unwrap();
        assert!(!session.is_running());
        assert_eq!(session.state().len(), 8);
        assert_eq!(session.state().adjacency.edge_count(), target_edge_count(8, 25));
        assert_eq!(session.state().kinetic_measure(), 0.0);
    }

    #[test]
    fn same_seed_gives_same_graph() {
        let a = Session::new(small_config()).unwrap();
        let b = Session::new(small_config()).unwrap();
        assert_eq!(a.state().adjacency, b.state().adjacency);
    }

    #[test]
    fn idle_does_nothing_while_paused() {
        let mut session = Session::new(small_config()).unwrap();
        let before = session.snapshot();
        assert!(!session.on_idle(0));
        assert!(!session.on_idle(10_000));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut session = Session::new(small_config()).unwrap();
        assert!(!session.on_key('x'));
        assert!(!session.is_running());
    }

    #[test]
    fn space_starts_and_reseeds() {
        let mut session = Session::new(small_config()).unwrap();
        let before = session.snapshot();

        assert!(session.on_key(' '));

        assert!(session.is_running());
        assert_ne!(session.snapshot().nodes, before.nodes);
        assert!(session.state().max_residual() < 1e-12);
    }

    #[test]
    fn idle_runs_due_frames() {
        let mut session = Session::new(small_config()).unwrap();
        session.on_key(' ');

        assert!(!session.on_idle(1_000));
        let before = session.snapshot();
        assert!(session.on_idle(1_200));
        assert_ne!(session.snapshot().nodes, before.nodes);
        assert!(session.state().max_residual() < 1e-9);
    }

    #[test]
    fn tiny_pointer_moves_are_ignored() {
        let mut session = Session::new(small_config()).unwrap();
        session.on_pointer_down(300.0, 300.0);
        assert!(!session.on_pointer_move(300.1, 300.0));
    }

    #[test]
    fn pointer_drag_pans_and_stops_motion() {
        let mut session = Session::new(small_config()).unwrap();
        session.on_key(' ');
        session.run_frames(3);
        let before = session.state().anchor.position;

        session.on_pointer_down(300.0, 300.0);
        assert!(session.on_pointer_move(360.0, 300.0));

        assert_ne!(session.state().anchor.position, before);
        assert_eq!(session.state().kinetic_measure(), 0.0);
        // The anchor was under the pointer and follows it
        let (x, _) = crate::geometry::project(&session.state().anchor.position);
        assert!((x - 0.2).abs() < 1e-9);
    }
}
