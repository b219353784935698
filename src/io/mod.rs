//! Input/output helpers.
//!
//! - sounding ingest + aggregation (`sounding`)
//! - result JSON rendering and export (`result`)
//! - layered-model JSON read/write (`model`)

pub mod model;
pub mod result;
pub mod sounding;

pub use model::*;
pub use result::*;
pub use sounding::*;
