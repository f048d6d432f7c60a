//! End-to-end tour sequencing.
//!
//! Flies home → first system, optimizes each system in turn with a transit leg between
//! consecutive systems, and returns home from the last body reached. A body that cannot be
//! resolved or sampled costs only the leg or system that needs it: the run carries on from
//! the last body actually reached.

use serde::Serialize;
use solar_config::{SystemConfig, TourConfig};
use solar_core::time::Epoch;
use solar_ephemeris::Ephemeris;
use tracing::{info, warn};

use super::itinerary::{Itinerary, Leg};
use super::route::{CandidateRoute, optimize_system_route};
use super::{Diagnostic, TourContext, TourError, resolve_bodies};

/// What a summary row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryKind {
    Initial,
    System,
    Transit,
    Final,
}

/// One reporting row per system or per connecting leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub kind: SummaryKind,
    pub label: String,
    pub route: Vec<String>,
    pub start: Epoch,
    pub finish: Epoch,
    /// Ranking total for systems; wait + travel for connecting legs.
    pub internal_time_s: f64,
    /// Valid orderings of a system, fastest first. Empty for connecting legs.
    pub candidates: Vec<CandidateRoute>,
}

impl SummaryEntry {
    pub fn route_label(&self) -> String {
        self.route.join(" -> ")
    }
}

/// Everything produced by one planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourPlan {
    pub start: Epoch,
    pub itinerary: Vec<Leg>,
    pub summary: Vec<SummaryEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TourPlan {
    pub fn final_arrival(&self) -> Option<Epoch> {
        self.itinerary.last().map(|leg| leg.arrival)
    }
}

struct Sequencer<'a, E: ?Sized> {
    ctx: TourContext<'a, E>,
    itinerary: Itinerary,
    summary: Vec<SummaryEntry>,
    diagnostics: Vec<Diagnostic>,
    current: Epoch,
}

impl<E: Ephemeris + ?Sized> Sequencer<'_, E> {
    fn warn(&mut self, scope: &str, message: String) {
        warn!(%scope, "{message}");
        self.diagnostics.push(Diagnostic::new(scope, message));
    }

    /// Fly a connecting leg and add its summary row; `None` when the leg cannot be flown.
    fn connect(
        &mut self,
        kind: SummaryKind,
        leg_label: String,
        row_label: String,
        from: &str,
        to: &str,
    ) -> Option<Epoch> {
        match self.ctx.best_departure(from, to, self.current) {
            Ok(choice) => {
                let arrival = self.itinerary.record(
                    &leg_label,
                    from,
                    to,
                    choice.departure,
                    &choice.transit,
                );
                info!(leg = %leg_label, departure = %choice.departure, %arrival, "leg flown");
                self.summary.push(SummaryEntry {
                    kind,
                    label: row_label,
                    route: vec![from.to_string(), to.to_string()],
                    start: self.current,
                    finish: arrival,
                    internal_time_s: choice.total_s,
                    candidates: Vec::new(),
                });
                self.current = arrival;
                Some(arrival)
            }
            Err(err) => {
                self.warn(&leg_label, format!("cannot fly {from} -> {to}: {err}"));
                None
            }
        }
    }

    fn visit(&mut self, system: &SystemConfig) -> String {
        info!(system = %system.name, start = %self.current, "optimizing system");
        let mut route = optimize_system_route(&self.ctx, system, self.current, &mut self.itinerary);
        route.candidates.sort_by(|a, b| a.total_s.total_cmp(&b.total_s));
        self.summary.push(SummaryEntry {
            kind: SummaryKind::System,
            label: system.name.clone(),
            route: route.order.clone(),
            start: self.current,
            finish: route.finish,
            internal_time_s: route.internal_time_s,
            candidates: route.candidates,
        });
        self.diagnostics.extend(route.diagnostics);
        self.current = route.finish;
        route.reached
    }
}

/// Plan the whole tour described by `config` against `ephemeris`.
///
/// Only an invalid configuration is an error; missing bodies and ephemeris gaps are reported
/// in [`TourPlan::diagnostics`] and the plan covers whatever could be flown.
pub fn plan_tour<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    config: &TourConfig,
) -> Result<TourPlan, TourError> {
    config.validate()?;
    let start = config.start_epoch()?;
    let (bodies, failures) = resolve_bodies(ephemeris, config);

    let mut sequencer = Sequencer {
        ctx: TourContext::new(ephemeris, config, &bodies),
        itinerary: Itinerary::new(config.solver.acceleration_m_s2),
        summary: Vec::new(),
        diagnostics: Vec::new(),
        current: start,
    };
    for (name, err) in failures {
        sequencer.warn(&name, format!("{name} not found in the ephemeris: {err}"));
    }

    let home = config.home.as_str();
    let mut position = if bodies.contains_key(home) {
        Some(home.to_string())
    } else {
        let message = format!("home body {home} unavailable; tour starts at the first system");
        sequencer.warn(home, message);
        None
    };
    let mut previous: Option<&SystemConfig> = None;

    for system in &config.systems {
        let missing: Vec<&str> = system
            .bodies()
            .filter(|name| !bodies.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            sequencer.warn(
                &system.name,
                format!("skipping {}, missing: {}", system.name, missing.join(", ")),
            );
            continue;
        }

        if let Some(from) = position.as_deref() {
            let planet = system.planet.as_str();
            let connected = match previous {
                None => sequencer.connect(
                    SummaryKind::Initial,
                    format!("Initial {from}->{planet}"),
                    format!("Initial Transit: {from} -> {planet}"),
                    from,
                    planet,
                ),
                Some(prev) => sequencer.connect(
                    SummaryKind::Transit,
                    format!("Transit: {}->{}", prev.name, system.name),
                    format!("Transit: {} -> {}", prev.name, system.name),
                    from,
                    planet,
                ),
            };
            if connected.is_none() {
                continue;
            }
        }

        position = Some(sequencer.visit(system));
        previous = Some(system);
    }

    match (previous, position.as_deref()) {
        (Some(last), Some(from)) if bodies.contains_key(home) => {
            sequencer.connect(
                SummaryKind::Final,
                format!("Final {}->{home}", last.name),
                format!("Final Transit: {} -> {home}", last.name),
                from,
                home,
            );
        }
        (None, _) => sequencer.warn(home, "no system was visited; final leg skipped".into()),
        _ => sequencer.warn(home, format!("cannot return to {home}; final leg skipped")),
    }

    Ok(TourPlan {
        start,
        itinerary: sequencer.itinerary.into_legs(),
        summary: sequencer.summary,
        diagnostics: sequencer.diagnostics,
    })
}
