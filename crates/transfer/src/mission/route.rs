//! Per-system route optimization.
//!
//! The planet is always visited first; every ordering of the moons is ranked by the sum of
//! best leg totals, each searched from the system arrival epoch without chaining. The winner
//! is then flown for real, each leg departing no earlier than the previous arrival.

use itertools::Itertools;
use serde::Serialize;
use solar_config::SystemConfig;
use solar_core::time::{Epoch, seconds_to_days};
use solar_ephemeris::Ephemeris;
use tracing::{debug, info, warn};

use super::itinerary::Itinerary;
use super::{Diagnostic, TourContext, TourError};

/// One ranked ordering of a system's bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRoute {
    pub order: Vec<String>,
    /// Sum of unchained best leg totals; a ranking key, not a flown duration.
    pub total_s: f64,
}

/// Outcome of optimizing and flying one system.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Flown prefix of the winning order, or the configured order when no candidate was valid.
    pub order: Vec<String>,
    /// Last body actually reached.
    pub reached: String,
    /// Arrival at `reached`.
    pub finish: Epoch,
    /// Ranking total of the winning order.
    pub internal_time_s: f64,
    /// Valid candidates in enumeration order.
    pub candidates: Vec<CandidateRoute>,
    /// Orderings enumerated, valid or not.
    pub evaluated: usize,
    pub legs_flown: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Every visiting order of `system`: the planet, then one permutation of the moons.
///
/// Permutations follow lexicographic order over the configured moon positions. The iterator
/// borrows the system, so calling again restarts the enumeration.
pub fn candidate_orders(system: &SystemConfig) -> impl Iterator<Item = Vec<&str>> {
    let planet = system.planet.as_str();
    system
        .moons
        .iter()
        .map(String::as_str)
        .permutations(system.moons.len())
        .map(move |moons| std::iter::once(planet).chain(moons).collect::<Vec<_>>())
}

/// Ranking total of `order`: each leg's best wait + travel, all searched from `arrival`.
pub fn ranking_time<E: Ephemeris + ?Sized>(
    ctx: &TourContext<'_, E>,
    order: &[&str],
    arrival: Epoch,
) -> Result<f64, TourError> {
    order
        .windows(2)
        .map(|pair| {
            ctx.best_departure(pair[0], pair[1], arrival)
                .map(|choice| choice.total_s)
        })
        .sum()
}

/// Pick the best moon order for `system`, fly it from `arrival` and record the legs.
pub fn optimize_system_route<E: Ephemeris + ?Sized>(
    ctx: &TourContext<'_, E>,
    system: &SystemConfig,
    arrival: Epoch,
    itinerary: &mut Itinerary,
) -> RoutePlan {
    let configured_order: Vec<String> = system.bodies().map(str::to_string).collect();
    let mut plan = RoutePlan {
        order: configured_order,
        reached: system.planet.clone(),
        finish: arrival,
        internal_time_s: 0.0,
        candidates: Vec::new(),
        evaluated: 0,
        legs_flown: 0,
        diagnostics: Vec::new(),
    };
    if system.moons.is_empty() {
        return plan;
    }

    for order in candidate_orders(system) {
        plan.evaluated += 1;
        match ranking_time(ctx, &order, arrival) {
            Ok(total_s) => {
                debug!(
                    system = %system.name,
                    route = %order.join(" -> "),
                    days = seconds_to_days(total_s),
                    "candidate route"
                );
                plan.candidates.push(CandidateRoute {
                    order: order.iter().map(|name| name.to_string()).collect(),
                    total_s,
                });
            }
            Err(err) => {
                debug!(
                    system = %system.name,
                    route = %order.join(" -> "),
                    %err,
                    "candidate route invalid"
                );
            }
        }
    }

    let invalid = plan.evaluated - plan.candidates.len();
    if invalid > 0 {
        plan.diagnostics.push(Diagnostic::new(
            &system.name,
            format!("{invalid} of {} candidate routes were invalid", plan.evaluated),
        ));
    }

    let best = plan
        .candidates
        .iter()
        .fold(None::<&CandidateRoute>, |best, candidate| match best {
            Some(incumbent) if incumbent.total_s <= candidate.total_s => Some(incumbent),
            _ => Some(candidate),
        })
        .cloned();
    let Some(best) = best else {
        warn!(system = %system.name, "no valid route through system");
        plan.diagnostics
            .push(Diagnostic::new(&system.name, "no valid route through system"));
        return plan;
    };

    info!(
        system = %system.name,
        route = %best.order.join(" -> "),
        days = seconds_to_days(best.total_s),
        "best route"
    );

    let leg_label = format!("System: {}", system.planet);
    for pair in best.order.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        match ctx.best_departure(from, to, plan.finish) {
            Ok(choice) => {
                plan.finish =
                    itinerary.record(&leg_label, from, to, choice.departure, &choice.transit);
                plan.reached = to.clone();
                plan.legs_flown += 1;
            }
            Err(err) => {
                warn!(system = %system.name, %from, %to, %err, "leg skipped");
                plan.diagnostics.push(Diagnostic::new(
                    &system.name,
                    format!("leg {from} -> {to} skipped: {err}"),
                ));
                break;
            }
        }
    }

    // Only the bodies actually reached are reported as flown.
    plan.order = best.order;
    plan.order.truncate(plan.legs_flown + 1);
    plan.internal_time_s = best.total_s;
    plan
}
