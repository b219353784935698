//! Command-line parsing for the Wenner sounding inverter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the solver/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ves", version, about = "1-D Wenner sounding inversion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Invert a field sounding JSON into a layered resistivity model.
    Invert(InvertArgs),
    /// Predict the apparent resistivity of a known layered model.
    Forward(ForwardArgs),
    /// Generate a noisy synthetic sounding from a known layered model.
    Synth(SynthArgs),
}

/// Options for inverting one sounding.
#[derive(Debug, Parser, Clone)]
pub struct InvertArgs {
    /// Sounding JSON file (spacings in feet plus per-orientation readings).
    #[arg(value_name = "JSON")]
    pub input: PathBuf,

    /// Write the result JSON to a file as well as stdout.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub output: Option<PathBuf>,

    /// Export the recovered model as layered-model JSON (usable by forward/synth).
    #[arg(long, value_name = "JSON")]
    pub export_model: Option<PathBuf>,

    /// Print a human-readable summary instead of result JSON.
    #[arg(long)]
    pub report: bool,

    /// Render an ASCII log-log plot (to stderr unless --report).
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Skip the iterative solver and use the half-spacing estimate.
    #[arg(long)]
    pub fallback: bool,

    /// Write a markdown debug bundle under debug/.
    #[arg(long)]
    pub debug_bundle: bool,

    /// Gauss-Newton iteration cap.
    #[arg(long, default_value_t = 10)]
    pub max_iterations: usize,

    /// Stop once every point's relative misfit is at or below this value.
    #[arg(long, default_value_t = 0.01)]
    pub target_misfit: f64,

    /// Initial regularization weight as a multiple of the data-term scale.
    #[arg(long, default_value_t = 100.0)]
    pub beta0_ratio: f64,

    /// Factor the regularization weight is divided by each iteration.
    #[arg(long, default_value_t = 8.0)]
    pub beta_cooling: f64,

    /// Smallness regularization weight.
    #[arg(long, default_value_t = 1.0)]
    pub alpha_s: f64,

    /// Smoothness regularization weight.
    #[arg(long, default_value_t = 1.0)]
    pub alpha_x: f64,

    /// Padding cells appended below the deepest data cell.
    #[arg(long, default_value_t = 10)]
    pub pad_cells: usize,

    /// Width of each padding cell (metres).
    #[arg(long, default_value_t = 50.0)]
    pub pad_width_m: f64,
}

/// Options for the forward model.
#[derive(Debug, Parser)]
pub struct ForwardArgs {
    /// Layered-model JSON file (thicknesses_m + resistivities).
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Wenner spacings to evaluate, in feet (comma-separated).
    #[arg(long, value_name = "FT", value_delimiter = ',', required = true)]
    pub a_ft: Vec<f64>,
}

/// Options for synthetic sounding generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Layered-model JSON file (thicknesses_m + resistivities).
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Wenner spacings to simulate, in feet (comma-separated).
    #[arg(long, value_name = "FT", value_delimiter = ',', required = true)]
    pub a_ft: Vec<f64>,

    /// Relative lognormal noise level.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Probability that a single reading is missing.
    #[arg(long, default_value_t = 0.0)]
    pub dropout: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
