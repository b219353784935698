//! Mathematical utilities: dense symmetric solves and eigenvalue estimates.

pub mod linalg;

pub use linalg::*;
