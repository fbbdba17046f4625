//! Input/output helpers.
//!
//! - two-column ingest + validation (`ingest`)
//! - CSV exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
