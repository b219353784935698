//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads sounding or model files
//! - runs aggregation + inversion (or the forward/synth paths)
//! - prints result JSON or reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ForwardArgs, InvertArgs, SynthArgs};
use crate::domain::{FEET_TO_METERS, ForwardResponse, InvertConfig};
use crate::error::AppError;
use crate::fit::Backend;

pub mod pipeline;

/// Entry point for the `ves` binary.
pub fn run() -> Result<(), AppError> {
    // We want `ves sounding.json` to behave like `ves invert sounding.json`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Invert(args) => handle_invert(args),
        Command::Forward(args) => handle_forward(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_invert(args: InvertArgs) -> Result<(), AppError> {
    let config = invert_config_from_args(&args);
    config.validate()?;

    let input = crate::io::read_sounding_json(&args.input)?;
    let agg = match crate::io::aggregate(&input) {
        Ok(agg) => agg,
        Err(err) => {
            // The error document still goes to stdout so downstream tooling
            // always finds one JSON document there.
            println!("{}", crate::io::render_error_document(&err.to_string()));
            return Err(AppError::new(1, err.to_string()));
        }
    };

    let backend = if args.fallback {
        Backend::HalfSpacing
    } else {
        let detected = Backend::detect();
        if detected == Backend::HalfSpacing {
            eprintln!("iterative solver not compiled into this build; using half-spacing estimate");
        }
        detected
    };

    let run = pipeline::solve_run(input, agg, backend, &config)?;
    for note in &run.outcome.notes {
        eprintln!("{note}");
    }

    if args.report {
        println!(
            "{}",
            crate::report::format_run_summary(
                &run.input,
                &run.agg,
                &run.outcome,
                &run.residuals,
                &config,
            )
        );
        if args.plot {
            println!(
                "{}",
                crate::plot::render_sounding_plot(&run.residuals, args.width, args.height)
            );
        }
    } else {
        println!("{}", crate::io::render_result(&run.outcome.result)?);
        if args.plot {
            // Keep stdout machine-readable; the plot goes to stderr.
            eprintln!(
                "{}",
                crate::plot::render_sounding_plot(&run.residuals, args.width, args.height)
            );
        }
    }

    if let Some(path) = &args.output {
        crate::io::write_result_json(path, &run.outcome.result)?;
    }
    if let Some(path) = &args.export_model {
        crate::io::write_model_json(path, &run.outcome.result)?;
    }
    if args.debug_bundle {
        let path = crate::debug::write_debug_bundle(&run.input, &run.agg, &run.outcome, &config)?;
        eprintln!("debug bundle: {}", path.display());
    }

    Ok(())
}

fn handle_forward(args: ForwardArgs) -> Result<(), AppError> {
    let model = crate::io::read_model_json(&args.model)?;
    model.validate()?;
    validate_spacings(&args.a_ft)?;

    let spacing_m: Vec<f64> = args.a_ft.iter().map(|a| a * FEET_TO_METERS).collect();
    let apparent_resistivity = crate::forward::predict_apparent(&model, &spacing_m);
    let response = ForwardResponse {
        a_ft: args.a_ft,
        spacing_m,
        apparent_resistivity,
    };

    println!("{}", crate::io::render_forward(&response)?);
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let model = crate::io::read_model_json(&args.model)?;
    model.validate()?;

    let config = crate::data::SynthConfig {
        noise_rel: args.noise,
        dropout: args.dropout,
        seed: args.seed,
    };
    let sounding = crate::data::generate_sounding(&model, &args.a_ft, &config)?;

    println!("{}", crate::io::render_sounding(&sounding)?);
    Ok(())
}

pub fn invert_config_from_args(args: &InvertArgs) -> InvertConfig {
    InvertConfig {
        max_iterations: args.max_iterations,
        target_misfit: args.target_misfit,
        beta0_ratio: args.beta0_ratio,
        beta_cooling: args.beta_cooling,
        alpha_s: args.alpha_s,
        alpha_x: args.alpha_x,
        pad_cells: args.pad_cells,
        pad_width_m: args.pad_width_m,
    }
}

fn validate_spacings(a_ft: &[f64]) -> Result<(), AppError> {
    for a in a_ft {
        if !a.is_finite() || *a <= 0.0 {
            return Err(AppError::new(
                2,
                format!("Invalid spacing {a}; spacings must be positive feet."),
            ));
        }
    }
    Ok(())
}

/// Rewrite argv so `ves` defaults to `ves invert`.
///
/// Rules:
/// - `ves sounding.json ...`    -> `ves invert sounding.json ...`
/// - `ves --help/--version/-h`  -> unchanged (show top-level help/version)
/// - `ves` with no arguments    -> unchanged (clap explains the subcommands)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "invert" | "forward" | "synth");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "invert".to_string());
    argv
}
