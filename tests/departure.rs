mod common;

use common::{flight_time_s, mission_start};
use solar_tour_planner::config::{DepartureWindowConfig, SolverConfig};
use solar_tour_planner::ephemeris::{CircularEphemeris, CircularOrbit, Ephemeris, FixedEphemeris};
use solar_tour_planner::time::days_to_seconds;
use solar_tour_planner::transfer::{optimal_departure, transit_time, wait_offsets_days};

#[test]
fn default_window_has_nineteen_waits() {
    let offsets: Vec<f64> = wait_offsets_days(&DepartureWindowConfig::default()).collect();
    assert_eq!(offsets.len(), 19);
    assert_eq!(offsets.first(), Some(&0.0));
    assert_eq!(offsets.last(), Some(&180.0));
}

#[test]
fn window_stops_at_the_last_whole_step() {
    let window = DepartureWindowConfig {
        max_wait_days: 25.0,
        wait_step_days: 10.0,
    };
    let offsets: Vec<f64> = wait_offsets_days(&window).collect();
    assert_eq!(offsets, vec![0.0, 10.0, 20.0]);

    let immediate = DepartureWindowConfig {
        max_wait_days: 0.0,
        wait_step_days: 10.0,
    };
    assert_eq!(wait_offsets_days(&immediate).collect::<Vec<_>>(), vec![0.0]);
}

#[test]
fn stationary_bodies_leave_immediately() {
    let ephemeris = FixedEphemeris::new()
        .with_body("A", [0.0, 0.0, 0.0])
        .with_body("B", [2.0e6, 0.0, 0.0]);
    let a = ephemeris.resolve("A").expect("A resolves");
    let b = ephemeris.resolve("B").expect("B resolves");
    let earliest = mission_start();

    let choice = optimal_departure(
        &ephemeris,
        &SolverConfig::default(),
        &DepartureWindowConfig::default(),
        &a,
        &b,
        earliest,
    )
    .expect("departure search");
    assert_eq!(choice.departure, earliest);
    assert_eq!(choice.wait_s, 0.0);
    assert!((choice.total_s - flight_time_s(2.0e6, 1.0)).abs() < 1e-9);
}

#[test]
fn best_departure_never_loses_to_leaving_now() {
    let ephemeris = CircularEphemeris::new([
        CircularOrbit::new("Sun", 0.0, 0.0),
        CircularOrbit::new("Earth", 149_598_023.0, 365.256)
            .around("Sun")
            .with_phase(100.0),
        CircularOrbit::new("Mars", 227_939_200.0, 686.98)
            .around("Sun")
            .with_phase(355.0),
    ])
    .expect("valid catalog");
    let solver = SolverConfig::default();
    let window = DepartureWindowConfig::default();
    let earth = ephemeris.resolve("Earth").expect("Earth resolves");
    let mars = ephemeris.resolve("Mars").expect("Mars resolves");
    let earliest = mission_start();

    let immediate = transit_time(&ephemeris, &solver, &earth, &mars, earliest).expect("leave now");
    let choice = optimal_departure(&ephemeris, &solver, &window, &earth, &mars, earliest)
        .expect("departure search");

    assert!(choice.total_s <= immediate.duration_s);
    assert!(choice.wait_s >= 0.0 && choice.wait_s <= days_to_seconds(window.max_wait_days));
    let steps = choice.wait_s / days_to_seconds(window.wait_step_days);
    assert!((steps - steps.round()).abs() < 1e-9, "wait must sit on the grid");
    assert_eq!(choice.departure, earliest.add_seconds(choice.wait_s));
    assert!((choice.total_s - (choice.wait_s + choice.transit.duration_s)).abs() < 1e-6);
}
