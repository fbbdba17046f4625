//! Data sources that do not come from user files.
//!
//! - the built-in resonance reference samples (`reference`)
//! - seeded synthetic growth series (`sample`)

pub mod reference;
pub mod sample;

pub use reference::*;
pub use sample::*;
