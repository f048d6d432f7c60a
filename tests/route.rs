mod common;

use common::{RecordingEphemeris, flight_time_s, mission_start};
use solar_tour_planner::config::{SystemConfig, TourConfig};
use solar_tour_planner::ephemeris::{CircularEphemeris, CircularOrbit, FixedEphemeris};
use solar_tour_planner::time::Epoch;
use solar_tour_planner::transfer::{
    Itinerary, TourContext, candidate_orders, optimize_system_route, ranking_time, resolve_bodies,
};

fn moon_cluster() -> FixedEphemeris {
    FixedEphemeris::new()
        .with_body("Earth", [0.0, 0.0, 5.0e6])
        .with_body("Planet", [0.0, 0.0, 0.0])
        .with_body("Near", [1.0e5, 0.0, 0.0])
        .with_body("Mid", [3.0e5, 0.0, 0.0])
        .with_body("Far", [7.0e5, 0.0, 0.0])
}

fn tour_of(system: &SystemConfig) -> TourConfig {
    TourConfig {
        systems: vec![system.clone()],
        ..TourConfig::default()
    }
}

#[test]
fn candidate_orders_fix_the_planet_and_permute_moons() {
    let system = SystemConfig::new("S", "Planet", &["Near", "Mid", "Far"]);
    let orders: Vec<Vec<&str>> = candidate_orders(&system).collect();
    assert_eq!(orders.len(), 6);
    assert!(orders.iter().all(|order| order[0] == "Planet" && order.len() == 4));
    assert_eq!(orders[0], vec!["Planet", "Near", "Mid", "Far"]);
    assert_eq!(orders[5], vec!["Planet", "Far", "Mid", "Near"]);

    // The generator restarts from the beginning.
    assert_eq!(candidate_orders(&system).next(), Some(orders[0].clone()));
}

#[test]
fn every_permutation_is_ranked_and_the_minimum_wins() {
    let ephemeris = moon_cluster();
    for moons in [&["Near"][..], &["Near", "Mid"][..], &["Near", "Mid", "Far"][..]] {
        let system = SystemConfig::new("S", "Planet", moons);
        let config = tour_of(&system);
        let (bodies, failures) = resolve_bodies(&ephemeris, &config);
        assert!(failures.is_empty());
        let ctx = TourContext::new(&ephemeris, &config, &bodies);
        let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);

        let plan = optimize_system_route(&ctx, &system, mission_start(), &mut itinerary);

        let factorial: usize = (1..=moons.len()).product();
        assert_eq!(plan.evaluated, factorial);
        assert_eq!(plan.candidates.len(), factorial);
        assert!(
            plan.candidates
                .iter()
                .all(|candidate| plan.internal_time_s <= candidate.total_s)
        );
        assert_eq!(plan.legs_flown, moons.len());
        assert_eq!(itinerary.len(), moons.len());
        assert!(plan.diagnostics.is_empty());
    }
}

#[test]
fn outward_sweep_beats_zig_zag() {
    let ephemeris = moon_cluster();
    let system = SystemConfig::new("S", "Planet", &["Far", "Near", "Mid"]);
    let config = tour_of(&system);
    let (bodies, _) = resolve_bodies(&ephemeris, &config);
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);
    let arrival = mission_start();

    let plan = optimize_system_route(&ctx, &system, arrival, &mut itinerary);
    assert_eq!(plan.order, vec!["Planet", "Near", "Mid", "Far"]);
    assert_eq!(plan.reached, "Far");

    let expected = flight_time_s(1.0e5, 1.0) + flight_time_s(2.0e5, 1.0) + flight_time_s(4.0e5, 1.0);
    assert!((plan.internal_time_s - expected).abs() < 1e-6);

    // Stationary bodies never wait, so the flown legs chain back to back.
    let legs = itinerary.legs();
    assert_eq!(legs[0].departure, arrival);
    for pair in legs.windows(2) {
        assert_eq!(pair[1].departure, pair[0].arrival);
    }
    assert_eq!(plan.finish, legs[2].arrival);
    assert!(legs.iter().all(|leg| leg.system == "System: Planet" && leg.converged));
}

#[test]
fn moonless_system_skips_the_search() {
    let ephemeris = moon_cluster();
    let system = SystemConfig::new("S", "Planet", &[]);
    let config = tour_of(&system);
    let (bodies, _) = resolve_bodies(&ephemeris, &config);
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);
    let arrival = mission_start();

    let plan = optimize_system_route(&ctx, &system, arrival, &mut itinerary);
    assert_eq!(plan.order, vec!["Planet"]);
    assert_eq!(plan.finish, arrival);
    assert_eq!(plan.internal_time_s, 0.0);
    assert_eq!(plan.evaluated, 0);
    assert!(itinerary.is_empty());
}

#[test]
fn single_moon_gives_one_candidate_and_one_leg() {
    let ephemeris = moon_cluster();
    let system = SystemConfig::new("S", "Planet", &["Mid"]);
    let config = tour_of(&system);
    let (bodies, _) = resolve_bodies(&ephemeris, &config);
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);

    let plan = optimize_system_route(&ctx, &system, mission_start(), &mut itinerary);
    assert_eq!(plan.evaluated, 1);
    assert_eq!(itinerary.len(), 1);
    let leg = &itinerary.legs()[0];
    assert_eq!((leg.from.as_str(), leg.to.as_str()), ("Planet", "Mid"));
    let travel = flight_time_s(3.0e5, 1.0);
    assert!((leg.travel_s - travel).abs() < 1e-9);
    assert!((leg.peak_speed_m_s - travel / 2.0).abs() < 1e-9);
}

#[test]
fn no_valid_candidate_keeps_the_configured_order() {
    let ephemeris = CircularEphemeris::new([
        CircularOrbit::new("Sun", 0.0, 0.0),
        CircularOrbit::new("Mars", 227_939_200.0, 686.98).around("Sun"),
        CircularOrbit::new("Phobos", 9_376.0, 0.31891)
            .around("Mars")
            .with_coverage(Epoch::J2000, Epoch::J2000.add_days(1.0)),
        CircularOrbit::new("Deimos", 23_463.2, 1.263).around("Mars"),
    ])
    .expect("valid catalog");
    let system = SystemConfig::new("Mars System", "Mars", &["Phobos", "Deimos"]);
    let config = tour_of(&system);
    let (bodies, _) = resolve_bodies(&ephemeris, &config);
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);
    let arrival = mission_start();

    let plan = optimize_system_route(&ctx, &system, arrival, &mut itinerary);
    assert_eq!(plan.evaluated, 2);
    assert!(plan.candidates.is_empty());
    assert_eq!(plan.order, vec!["Mars", "Phobos", "Deimos"]);
    assert_eq!(plan.finish, arrival);
    assert_eq!(plan.internal_time_s, 0.0);
    assert!(itinerary.is_empty());
    assert!(!plan.diagnostics.is_empty());
}

/// Sun-centred Jupiter with its three inner Galilean moons on circular orbits.
fn galilean_system() -> CircularEphemeris {
    CircularEphemeris::new([
        CircularOrbit::new("Sun", 0.0, 0.0),
        CircularOrbit::new("Earth", 149_597_870.7, 365.256).around("Sun"),
        CircularOrbit::new("Jupiter", 778_547_200.0, 4_332.59).around("Sun"),
        CircularOrbit::new("Io", 421_700.0, 1.769).around("Jupiter"),
        CircularOrbit::new("Europa", 671_034.0, 3.551).around("Jupiter"),
        CircularOrbit::new("Ganymede", 1_070_412.0, 7.155).around("Jupiter"),
    ])
    .expect("valid catalog")
}

#[test]
fn ranking_searches_every_leg_from_the_system_arrival() {
    let ephemeris = RecordingEphemeris::new(galilean_system());
    let system = SystemConfig::new("Jupiter System", "Jupiter", &["Io", "Europa", "Ganymede"]);
    let config = tour_of(&system);
    let (bodies, failures) = resolve_bodies(&ephemeris, &config);
    assert!(failures.is_empty());
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let arrival = mission_start();
    let order = ["Jupiter", "Europa", "Io", "Ganymede"];

    ephemeris.take_epochs();
    let total = ranking_time(&ctx, &order, arrival).expect("ranking succeeds");
    let epochs = ephemeris.take_epochs();

    // Each leg's zero-wait sample positions both ends at the arrival epoch, and nothing
    // is ever sampled before it.
    assert!(epochs.iter().all(|epoch| *epoch >= arrival));
    let at_arrival = epochs.iter().filter(|epoch| **epoch == arrival).count();
    assert_eq!(at_arrival, 2 * (order.len() - 1));

    let unchained: f64 = order
        .windows(2)
        .map(|pair| {
            ctx.best_departure(pair[0], pair[1], arrival)
                .expect("leg is in coverage")
                .total_s
        })
        .sum();
    assert!((total - unchained).abs() < 1e-9);
}

#[test]
fn flown_legs_chain_while_ranking_stays_unchained() {
    let ephemeris = galilean_system();
    let system = SystemConfig::new("Jupiter System", "Jupiter", &["Io", "Europa", "Ganymede"]);
    let config = tour_of(&system);
    let (bodies, _) = resolve_bodies(&ephemeris, &config);
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);
    let arrival = mission_start();

    let plan = optimize_system_route(&ctx, &system, arrival, &mut itinerary);
    assert_eq!(plan.legs_flown, 3);
    assert_eq!(plan.order.len(), 4);

    let order: Vec<&str> = plan.order.iter().map(String::as_str).collect();
    let ranked = ranking_time(&ctx, &order, arrival).expect("winner is valid");
    assert!((plan.internal_time_s - ranked).abs() < 1e-9);

    let legs = itinerary.legs();
    assert!(legs[0].departure >= arrival);
    assert!(legs[0].arrival > arrival);
    for pair in legs.windows(2) {
        assert!(pair[1].departure >= pair[0].arrival);
    }
    assert_eq!(plan.finish, legs[2].arrival);

    // The second leg was searched from the first arrival, not from the system arrival.
    let chained = ctx
        .best_departure(&legs[1].from, &legs[1].to, legs[0].arrival)
        .expect("leg is in coverage");
    assert_eq!(legs[1].departure, chained.departure);
    assert!((legs[1].travel_s - chained.transit.duration_s).abs() < 1e-9);
}

#[test]
fn route_stops_at_the_last_body_reached() {
    let arrival = mission_start();
    // M2 stays in coverage for every ranking sample but not for the chained second leg,
    // whose wait grid starts one Q -> M1 flight later.
    let ephemeris = CircularEphemeris::new([
        CircularOrbit::new("Q", 0.0, 0.0),
        CircularOrbit::new("Earth", 1.0e6, 0.0).around("Q"),
        CircularOrbit::new("M1", 1.0e5, 0.0).around("Q"),
        CircularOrbit::new("M2", 4.0e5, 0.0)
            .around("Q")
            .with_phase(180.0)
            .with_coverage(arrival.add_days(-1.0), arrival.add_days(180.45)),
    ])
    .expect("valid catalog");
    let system = SystemConfig::new("B", "Q", &["M1", "M2"]);
    let config = tour_of(&system);
    let (bodies, failures) = resolve_bodies(&ephemeris, &config);
    assert!(failures.is_empty());
    let ctx = TourContext::new(&ephemeris, &config, &bodies);
    let mut itinerary = Itinerary::new(config.solver.acceleration_m_s2);

    let plan = optimize_system_route(&ctx, &system, arrival, &mut itinerary);
    assert_eq!(plan.evaluated, 2);
    assert_eq!(plan.candidates.len(), 2);
    assert_eq!(plan.legs_flown, 1);
    assert_eq!(plan.order, vec!["Q", "M1"]);
    assert_eq!(plan.reached, "M1");
    assert_eq!(itinerary.len(), 1);
    assert_eq!(plan.finish, itinerary.legs()[0].arrival);

    let expected = flight_time_s(1.0e5, 1.0) + flight_time_s(5.0e5, 1.0);
    assert!((plan.internal_time_s - expected).abs() < 1e-6);
    assert!(
        plan.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.message.contains("leg M1 -> M2 skipped"))
    );
}
