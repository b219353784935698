//! Terminal plotting.

pub mod ascii;

pub use ascii::render_sounding_plot;
