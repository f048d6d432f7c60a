//! Re-exported APIs for consumers of the transfer crate.

pub use crate::mission::departure::{DepartureChoice, optimal_departure, wait_offsets_days};
pub use crate::mission::itinerary::{Itinerary, Leg};
pub use crate::mission::route::{
    CandidateRoute, RoutePlan, candidate_orders, optimize_system_route, ranking_time,
};
pub use crate::mission::tour::{SummaryEntry, SummaryKind, TourPlan, plan_tour};
pub use crate::mission::transit::{TransitEstimate, distance_m, transit_time};
pub use crate::mission::{Diagnostic, ResolvedBodies, TourContext, TourError, resolve_bodies};

pub mod catalog {
    use solar_config::BodyConfig;
    use solar_core::time::{Epoch, EpochParseError};
    use solar_ephemeris::{CircularEphemeris, CircularOrbit, EphemerisError};
    use thiserror::Error;

    /// Errors surfaced when turning body records into an analytic ephemeris.
    #[derive(Debug, Error)]
    pub enum CatalogError {
        #[error("body `{name}` has an invalid coverage bound: {source}")]
        Coverage {
            name: String,
            #[source]
            source: EpochParseError,
        },
        #[error("body `{0}` sets only one coverage bound")]
        PartialCoverage(String),
        #[error(transparent)]
        Ephemeris(#[from] EphemerisError),
    }

    /// Convert a `BodyConfig` into its circular orbit.
    pub fn orbit_from_config(config: &BodyConfig) -> Result<CircularOrbit, CatalogError> {
        let parse = |value: &str| {
            value
                .parse::<Epoch>()
                .map_err(|source| CatalogError::Coverage {
                    name: config.name.clone(),
                    source,
                })
        };
        let coverage = match (&config.coverage_start, &config.coverage_end) {
            (Some(start), Some(end)) => Some((parse(start)?, parse(end)?)),
            (None, None) => None,
            _ => return Err(CatalogError::PartialCoverage(config.name.clone())),
        };

        Ok(CircularOrbit {
            name: config.name.clone(),
            parent: config.parent.clone(),
            radius_km: config.orbit_radius_km,
            period_days: config.period_days,
            phase_deg: config.phase_deg,
            inclination_deg: config.inclination_deg,
            coverage,
        })
    }

    /// Build the analytic ephemeris for a whole body catalog.
    pub fn from_config(configs: &[BodyConfig]) -> Result<CircularEphemeris, CatalogError> {
        let orbits = configs
            .iter()
            .map(orbit_from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CircularEphemeris::new(orbits)?)
    }
}
