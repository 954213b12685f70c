use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hyperlayout::config::Config;
use hyperlayout::session::Session;

/// Lay out a random graph on the hyperbolic plane.
#[derive(Parser)]
#[command(name = "hyperlayout")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for graph generation and reseeding
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the number of nodes
    #[arg(long, global = true)]
    nodes: Option<usize>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and print the final layout as JSON
    Simulate {
        /// Number of displayed frames to simulate
        #[arg(short, long, default_value = "100")]
        frames: usize,

        /// Reseed with the greedy heuristic before simulating
        #[arg(long)]
        reseed: bool,

        /// Pan before simulating, as `x0,y0:x1,y1` in normalized coordinates
        #[arg(long = "drag")]
        drags: Vec<Drag>,

        /// Write the layout here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the default configuration as YAML
    InitConfig {
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// A pan gesture between two normalized screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    from: (f64, f64),
    to: (f64, f64),
}

impl FromStr for Drag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn point(s: &str) -> Result<(f64, f64), String> {
            let (x, y) = s
                .split_once(',')
                .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
            let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
            let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
            Ok((x, y))
        }

        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| format!("expected `x0,y0:x1,y1`, got `{s}`"))?;
        Ok(Drag {
            from: point(from)?,
            to: point(to)?,
        })
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(nodes) = cli.nodes {
        config.graph.nodes = nodes;
    }
    config.validate()?;
    Ok(config)
}

fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{content}"),
    }
    Ok(())
}

fn simulate(
    config: Config,
    frames: usize,
    reseed: bool,
    drags: &[Drag],
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let mut session = Session::new(config).context("failed to build graph")?;
    if reseed {
        session.reseed();
    }
    for drag in drags {
        session.pan(drag.from, drag.to);
    }

    let stats = session.run_frames(frames);
    tracing::info!(
        frames,
        moved = stats.moved,
        stationary = stats.stationary,
        rejected = stats.rejected,
        residual = session.state().max_residual(),
        "simulation finished"
    );

    let json = serde_json::to_string_pretty(&session.snapshot())?;
    write_output(output, &json)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Simulate {
            frames,
            reseed,
            drags,
            output,
        } => simulate(config, *frames, *reseed, drags, output.as_ref())?,
        Commands::InitConfig { output } => write_output(output.as_ref(), &config.to_yaml()?)?,
    }

    Ok(())
}
