//! Plotting: terminal ASCII plots and chart files.

pub mod ascii;
pub mod chart;

pub use ascii::*;
pub use chart::*;
