//! Constant-acceleration transit time to a moving destination.
//!
//! The vehicle accelerates for half the flight and decelerates for the other half, so a
//! stationary target at distance `d` is reached after `t = sqrt(2d/a)`. Targets move, so the
//! distance is re-sampled at the predicted arrival and the estimate refined by fixed-point
//! iteration until successive estimates agree within the configured threshold.

use solar_config::SolverConfig;
use solar_core::time::Epoch;
use solar_core::units::km_to_m;
use solar_core::vector;
use solar_ephemeris::{Body, Ephemeris};
use tracing::debug;

use super::TourError;

/// Result of the fixed-point transit solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitEstimate {
    pub duration_s: f64,
    /// Refinements performed, counting the one that met the threshold.
    pub iterations: u32,
    /// `false` when the iteration cap was hit first; `duration_s` is then the latest estimate.
    pub converged: bool,
}

/// Straight-line separation between two bodies at `epoch`, in metres.
pub fn distance_m<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    a: &Body,
    b: &Body,
    epoch: Epoch,
) -> Result<f64, TourError> {
    let position = |body: &Body| {
        ephemeris
            .position_km(body, epoch)
            .map_err(|source| TourError::PositionUnavailable {
                body: body.name().to_string(),
                epoch,
                source,
            })
    };
    let pa = position(a)?;
    let pb = position(b)?;
    Ok(km_to_m(vector::distance(&pa, &pb)))
}

/// Travel duration from `origin` to `destination` departing at `departure`.
pub fn transit_time<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    solver: &SolverConfig,
    origin: &Body,
    destination: &Body,
    departure: Epoch,
) -> Result<TransitEstimate, TourError> {
    let acceleration = solver.acceleration_m_s2;
    let initial_distance = distance_m(ephemeris, origin, destination, departure)?;
    if initial_distance == 0.0 {
        return Ok(TransitEstimate {
            duration_s: 0.0,
            iterations: 1,
            converged: true,
        });
    }

    let mut estimate = (2.0 * initial_distance / acceleration).sqrt();
    let mut latest = estimate;
    for iteration in 1..=solver.max_iterations {
        let arrival = departure.add_seconds(estimate);
        let distance = distance_m(ephemeris, origin, destination, arrival)?;
        latest = (2.0 * distance / acceleration).sqrt();
        if (latest - estimate).abs() < solver.convergence_threshold_s {
            return Ok(TransitEstimate {
                duration_s: latest,
                iterations: iteration,
                converged: true,
            });
        }
        estimate = latest;
    }

    debug!(
        from = origin.name(),
        to = destination.name(),
        iterations = solver.max_iterations,
        estimate_s = latest,
        "transit estimate did not converge"
    );
    Ok(TransitEstimate {
        duration_s: latest,
        iterations: solver.max_iterations,
        converged: false,
    })
}
