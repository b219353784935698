//! `ves-curves` library crate.
//!
//! The binary (`ves`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., batch drivers, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod forward;
pub mod io;
#[cfg(feature = "solver")]
pub mod math;
pub mod plot;
pub mod report;
