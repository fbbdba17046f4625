//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model/method enums (`KineticModel`, `InterpMethod`)
//! - observation points (`DataPoint`) and dataset stats
//! - run configurations (`InterpConfig`, `GrowthConfig`, `SynthConfig`)
//! - saved outputs (`CurveFile`)

pub mod types;

pub use types::*;
