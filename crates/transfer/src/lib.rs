//! Tour planning crate: constant-acceleration legs, departure search, per-system route
//! optimization and the multi-system sequencer, plus glue for the supporting crates.

pub mod mission;

pub use facade::*;

mod facade;
