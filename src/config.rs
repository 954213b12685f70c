//! Tunable parameters for the layout and their defaults
//!
//! Every section deserializes with `#[serde(default)]`, so a config file only
//! needs to list the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Default Constants
// =============================================================================

/// Default number of ordinary nodes
pub const DEFAULT_NODES: usize = 50;

/// Default share of the complete graph's edges to generate, in percent
pub const DEFAULT_EDGE_PERCENT: u32 = 5;

/// Default radius (in plane coordinates) of the initial circle
pub const DEFAULT_START_RADIUS: f64 = 1.0;

/// Shared scale applied to every force term
pub const DEFAULT_BASE_FORCE: f64 = 1e-4;

/// Default strength of the pull toward the anchor
pub const DEFAULT_CENTERING: f64 = 1e1;

/// Default velocity damping coefficient
pub const DEFAULT_FRICTION: f64 = 1e5;

/// Default spring strength along edges
pub const DEFAULT_PULL: f64 = 1e2;

/// Default repulsion strength between unconnected nodes
pub const DEFAULT_PUSH: f64 = 1e1;

/// Default rest length of an edge (hyperbolic distance)
pub const DEFAULT_OPTIMAL_DISTANCE: f64 = 0.05;

/// Default number of greedy passes when reseeding
pub const DEFAULT_TRIES: usize = 100;

/// Default side length of the square that reseeded nodes are drawn from
pub const DEFAULT_EXTENT: f64 = 5.0;

/// Default number of displayed frames per second
pub const DEFAULT_REFRESH_RATE: u32 = 8;

/// Default number of integrator steps per displayed frame
pub const DEFAULT_STEPS_PER_FRAME: usize = 40;

/// Default cap on frames run to catch up with wall-clock time
pub const DEFAULT_MAX_CATCH_UP_FRAMES: usize = 8;

/// Default viewport size in pixels
pub const DEFAULT_VIEWPORT_SIZE: u32 = 600;

/// Errors that can occur while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension is not a supported config format
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// The file contents could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// A value is outside its allowed range
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Shape of the generated graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Number of ordinary nodes
    pub nodes: usize,
    /// Percentage of all possible edges to generate
    pub edge_percent: u32,
    /// Radius of the circle nodes start on
    pub start_radius: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODES,
            edge_percent: DEFAULT_EDGE_PERCENT,
            start_radius: DEFAULT_START_RADIUS,
        }
    }
}

/// Force model coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Scale shared by every force term
    pub base_force: f64,
    /// Centering strength (quadratic in distance to the anchor)
    pub centering: f64,
    /// Friction strength (quadratic in speed)
    pub friction: f64,
    /// Edge spring strength (cubic in deviation from the rest length)
    pub pull: f64,
    /// Inverse-square repulsion strength
    pub push: f64,
    /// Rest length of an edge
    pub optimal_distance: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            base_force: DEFAULT_BASE_FORCE,
            centering: DEFAULT_CENTERING,
            friction: DEFAULT_FRICTION,
            pull: DEFAULT_PULL,
            push: DEFAULT_PUSH,
            optimal_distance: DEFAULT_OPTIMAL_DISTANCE,
        }
    }
}

/// Greedy reseed parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Number of passes over all nodes
    pub tries: usize,
    /// Side length of the sampling square, centered on the origin
    pub extent: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            tries: DEFAULT_TRIES,
            extent: DEFAULT_EXTENT,
        }
    }
}

/// Animation pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Displayed frames per second
    pub refresh_rate: u32,
    /// Integrator steps per displayed frame
    pub steps_per_frame: usize,
    /// Frames run at most in one catch-up; older backlog is dropped
    pub max_catch_up_frames: usize,
}

impl FrameConfig {
    /// Length of one frame in milliseconds
    pub fn refresh_interval_ms(&self) -> u64 {
        1000 / u64::from(self.refresh_rate.max(1))
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            refresh_rate: DEFAULT_REFRESH_RATE,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            max_catch_up_frames: DEFAULT_MAX_CATCH_UP_FRAMES,
        }
    }
}

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_SIZE,
            height: DEFAULT_VIEWPORT_SIZE,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub physics: PhysicsConfig,
    pub heuristic: HeuristicConfig,
    pub frames: FrameConfig,
    pub viewport: ViewportConfig,
    /// Fixed RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Config {
    /// Load a configuration from a YAML (`.yaml`, `.yml`) or JSON (`.json`) file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let content = fs::read_to_string(path)?;
        let config: Config = match ext.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            "json" => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check that every value is usable
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigResult<()> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.graph.nodes == 0 {
            return invalid("graph.nodes", "must be at least 1");
        }
        if self.graph.edge_percent > 100 {
            return invalid("graph.edge_percent", "must not exceed 100");
        }
        if !(self.graph.start_radius.is_finite() && self.graph.start_radius >= 0.0) {
            return invalid("graph.start_radius", "must be a finite, non-negative number");
        }
        if !(self.physics.optimal_distance.is_finite() && self.physics.optimal_distance > 0.0) {
            return invalid("physics.optimal_distance", "must be positive");
        }
        let coefficients = [
            ("physics.base_force", self.physics.base_force),
            ("physics.centering", self.physics.centering),
            ("physics.friction", self.physics.friction),
            ("physics.pull", self.physics.pull),
            ("physics.push", self.physics.push),
        ];
        for (field, value) in coefficients {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, "must be a finite, non-negative number");
            }
        }
        if !(self.heuristic.extent.is_finite() && self.heuristic.extent > 0.0) {
            return invalid("heuristic.extent", "must be positive");
        }
        if self.frames.refresh_rate == 0 || self.frames.refresh_rate > 1000 {
            return invalid("frames.refresh_rate", "must be between 1 and 1000");
        }
        if self.frames.max_catch_up_frames == 0 {
            return invalid("frames.max_catch_up_frames", "must be at least 1");
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid("viewport", "width and height must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.graph.nodes, 50);
        assert_eq!(config.frames.refresh_interval_ms(), 125);
        assert!(config.seed.is_none());
    }

    #[test]
    fn loads_partial_yaml() {
        let file = write_temp(
            ".yaml",
            "graph:\n  nodes: 12\nphysics:\n  push: 20.0\nseed: 9\n",
        );
        let config = Config::load(file.path()).expect("should load");

        assert_eq!(config.graph.nodes, 12);
        assert_eq!(config.graph.edge_percent, DEFAULT_EDGE_PERCENT);
        assert_eq!(config.physics.push, 20.0);
        assert_eq!(config.physics.pull, DEFAULT_PULL);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn loads_json() {
        let file = write_temp(".json", r#"{"frames": {"steps_per_frame": 3}}"#);
        let config = Config::load(file.path()).expect("should load");
        assert_eq!(config.frames.steps_per_frame, 3);
        assert_eq!(config.frames.refresh_rate, DEFAULT_REFRESH_RATE);
    }

    #[test]
    fn yaml_round_trips_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_temp(".toml", "");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let file = write_temp(".yml", "graph: [not, a, map");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = Config::default();
        config.graph.nodes = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "graph.nodes",
                ..
            })
        ));

        let mut config = Config::default();
        config.graph.edge_percent = 101;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.physics.optimal_distance = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.physics.friction = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.frames.refresh_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Config::load(Path::new("does/not/exist.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
