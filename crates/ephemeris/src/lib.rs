//! Ephemeris providers for the Solar Tour Planner workspace.
//!
//! The planner only needs two capabilities from an ephemeris: turning a body name into a
//! handle, and sampling that handle's position at an epoch. [`Ephemeris`] captures exactly
//! that; the providers in this crate range from fixed positions (tests, reproducible
//! scenarios) through analytic circular orbits to CSPICE kernels behind the `spice` feature.

use std::path::PathBuf;

use solar_core::time::Epoch;
use solar_core::vector::Vector3;
use thiserror::Error;

pub mod circular;
pub mod fixed;
pub mod kernels;
#[cfg(feature = "spice")]
pub mod spice;

pub use circular::{CircularEphemeris, CircularOrbit};
pub use fixed::FixedEphemeris;
#[cfg(feature = "spice")]
pub use spice::SpiceEphemeris;

use kernels::KERNEL_CATALOG;

/// Opaque handle to a body known by a provider.
///
/// `name` is the name the caller asked for; `target` is the provider's own key for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Body {
    name: String,
    target: String,
}

impl Body {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Errors surfaced while resolving bodies or sampling positions.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("body `{name}` is not known to the ephemeris")]
    UnknownBody { name: String },
    #[error("no ephemeris coverage for `{body}` at {epoch}")]
    OutOfCoverage { body: String, epoch: Epoch },
    #[error("invalid body catalog: {0}")]
    InvalidCatalog(String),
    #[error("kernel `{name}` is missing at {path}")]
    MissingKernel { name: &'static str, path: PathBuf },
    #[error("kernel `{name}` path contains invalid UTF-8: {path}")]
    InvalidKernelPath { name: &'static str, path: PathBuf },
    #[error("SPICE kernel call failed: {message}")]
    Spice { message: String },
}

/// Position source consumed by the tour planner.
pub trait Ephemeris {
    /// Resolve a body name into a handle usable with [`Ephemeris::position_km`].
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError>;

    /// Position of `body` at `epoch`, in kilometres, in the provider's inertial frame.
    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError>;
}

impl<T: Ephemeris + ?Sized> Ephemeris for &T {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        (**self).resolve(name)
    }

    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        (**self).position_km(body, epoch)
    }
}

impl<T: Ephemeris + ?Sized> Ephemeris for Box<T> {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        (**self).resolve(name)
    }

    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        (**self).position_km(body, epoch)
    }
}

/// Normalize a SPICE target name for heliocentric queries.
///
/// Major planets map to their barycenter targets, which the planetary SPK covers for the whole
/// span of the kernel. Non-planetary targets (moons, asteroids) are passed through unchanged.
pub fn normalize_heliocentric_target_name(name: &str) -> String {
    let upper = name.to_ascii_uppercase();
    if upper.contains("BARYCENTER") {
        return upper;
    }
    match upper.as_str() {
        "MERCURY" | "VENUS" | "EARTH" | "MARS" | "JUPITER" | "SATURN" | "URANUS" | "NEPTUNE"
        | "PLUTO" => format!("{upper} BARYCENTER"),
        _ => upper,
    }
}

/// Check that every catalog kernel exists locally under a UTF-8 path.
pub fn validate_kernel_paths() -> Result<(), EphemerisError> {
    for descriptor in KERNEL_CATALOG {
        let path = descriptor.local_path();
        if !path.exists() {
            return Err(EphemerisError::MissingKernel {
                name: descriptor.filename,
                path,
            });
        }
        if path.to_str().is_none() {
            return Err(EphemerisError::InvalidKernelPath {
                name: descriptor.filename,
                path,
            });
        }
    }
    Ok(())
}
