//! Departure search: wait at the origin when a later launch arrives sooner overall.

use solar_config::{DepartureWindowConfig, SolverConfig};
use solar_core::time::{Epoch, days_to_seconds};
use solar_ephemeris::{Body, Ephemeris};

use super::TourError;
use super::transit::{TransitEstimate, transit_time};

/// Best departure found on the wait grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepartureChoice {
    pub departure: Epoch,
    pub wait_s: f64,
    pub transit: TransitEstimate,
    /// Wait plus travel, the quantity being minimised.
    pub total_s: f64,
}

/// Wait offsets in days: `0, step, 2·step, …` up to and including `max_wait_days`.
pub fn wait_offsets_days(window: &DepartureWindowConfig) -> impl Iterator<Item = f64> {
    let step = window.wait_step_days;
    let count = if step > 0.0 && window.max_wait_days >= 0.0 {
        (window.max_wait_days / step + 1e-9).floor() as u64
    } else {
        0
    };
    (0..=count).map(move |k| k as f64 * step)
}

/// Scan the wait grid and keep the candidate minimising wait + travel.
///
/// Candidates are visited in increasing wait and only a strictly better total replaces the
/// incumbent, so ties resolve to the earliest departure.
pub fn optimal_departure<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    solver: &SolverConfig,
    window: &DepartureWindowConfig,
    origin: &Body,
    destination: &Body,
    earliest: Epoch,
) -> Result<DepartureChoice, TourError> {
    let evaluate = |wait_days: f64| -> Result<DepartureChoice, TourError> {
        let wait_s = days_to_seconds(wait_days);
        let departure = earliest.add_seconds(wait_s);
        let transit = transit_time(ephemeris, solver, origin, destination, departure)?;
        Ok(DepartureChoice {
            departure,
            wait_s,
            transit,
            total_s: wait_s + transit.duration_s,
        })
    };

    let mut best = evaluate(0.0)?;
    for wait_days in wait_offsets_days(window).skip(1) {
        let candidate = evaluate(wait_days)?;
        if candidate.total_s < best.total_s {
            best = candidate;
        }
    }
    Ok(best)
}
