//! Tour planning: transit solving, departure search, per-system route optimization and the
//! end-to-end sequencer that chains them into an itinerary.

pub mod departure;
pub mod itinerary;
pub mod route;
pub mod tour;
pub mod transit;

use std::collections::BTreeMap;

use serde::Serialize;
use solar_config::{ConfigError, TourConfig};
use solar_core::time::Epoch;
use solar_ephemeris::{Body, Ephemeris, EphemerisError};

use self::departure::DepartureChoice;

/// Bodies successfully resolved for a run, keyed by their configured name.
pub type ResolvedBodies = BTreeMap<String, Body>;

/// Top-level tour planning error.
///
/// `BodyUnresolved` and `PositionUnavailable` are recovered from at leg, candidate or system
/// granularity; only `Config` stops a run before it starts.
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("body `{name}` could not be resolved")]
    BodyUnresolved { name: String },
    #[error("position of `{body}` unavailable at {epoch}: {source}")]
    PositionUnavailable {
        body: String,
        epoch: Epoch,
        #[source]
        source: EphemerisError,
    },
    #[error("tour configuration rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Recoverable problem met during a run, reported alongside the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// System, leg or body the problem applies to.
    pub scope: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            message: message.into(),
        }
    }
}

/// Everything a leg computation needs, borrowed for the duration of one run.
#[derive(Debug)]
pub struct TourContext<'a, E: ?Sized> {
    ephemeris: &'a E,
    config: &'a TourConfig,
    bodies: &'a ResolvedBodies,
}

impl<'a, E: Ephemeris + ?Sized> TourContext<'a, E> {
    pub fn new(ephemeris: &'a E, config: &'a TourConfig, bodies: &'a ResolvedBodies) -> Self {
        Self {
            ephemeris,
            config,
            bodies,
        }
    }

    pub fn config(&self) -> &'a TourConfig {
        self.config
    }

    pub fn body(&self, name: &str) -> Result<&'a Body, TourError> {
        self.bodies
            .get(name)
            .ok_or_else(|| TourError::BodyUnresolved {
                name: name.to_string(),
            })
    }

    /// Best departure from `from` to `to`, leaving no earlier than `earliest`.
    pub fn best_departure(
        &self,
        from: &str,
        to: &str,
        earliest: Epoch,
    ) -> Result<DepartureChoice, TourError> {
        let origin = self.body(from)?;
        let destination = self.body(to)?;
        departure::optimal_departure(
            self.ephemeris,
            &self.config.solver,
            &self.config.departure,
            origin,
            destination,
            earliest,
        )
    }
}

/// Resolve every body the tour mentions, returning the successes and the failures.
pub fn resolve_bodies<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    config: &TourConfig,
) -> (ResolvedBodies, Vec<(String, EphemerisError)>) {
    let mut resolved = ResolvedBodies::new();
    let mut failures = Vec::new();
    let names = std::iter::once(config.home.as_str())
        .chain(config.systems.iter().flat_map(|system| system.bodies()));
    for name in names {
        if resolved.contains_key(name) || failures.iter().any(|(n, _)| n == name) {
            continue;
        }
        match ephemeris.resolve(name) {
            Ok(body) => {
                resolved.insert(name.to_string(), body);
            }
            Err(err) => failures.push((name.to_string(), err)),
        }
    }
    (resolved, failures)
}
