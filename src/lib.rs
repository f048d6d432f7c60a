//! Solar Tour Planner: multi-system tours flown at constant acceleration.
//!
//! The planner lives in the workspace crates; this library stitches them together so the CLI
//! and integration tests can depend on a single package.

pub use solar_config as config;
pub use solar_core::{constants, time, units, vector};
pub use solar_ephemeris as ephemeris;
pub use solar_export as export;
pub use solar_transfer as transfer;
pub use solar_transfer::mission;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
