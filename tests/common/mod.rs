#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use solar_tour_planner::config::{SystemConfig, TourConfig};
use solar_tour_planner::ephemeris::{Body, Ephemeris, EphemerisError, FixedEphemeris};
use solar_tour_planner::time::Epoch;
use solar_tour_planner::units::km_to_m;
use solar_tour_planner::vector::Vector3;

/// Stationary layout used by the end-to-end scenarios: home, two planets and two moons of Q.
pub fn stationary_layout() -> FixedEphemeris {
    FixedEphemeris::new()
        .with_body("Earth", [0.0, 0.0, 0.0])
        .with_body("P", [1.0e6, 0.0, 0.0])
        .with_body("Q", [3.0e6, 0.0, 0.0])
        .with_body("M1", [3.0e6, 1.0e5, 0.0])
        .with_body("M2", [3.0e6, -3.0e5, 0.0])
}

pub fn two_system_tour() -> TourConfig {
    TourConfig {
        systems: vec![
            SystemConfig::new("A", "P", &[]),
            SystemConfig::new("B", "Q", &["M1", "M2"]),
        ],
        ..TourConfig::default()
    }
}

/// Constant-acceleration flight time over a fixed distance.
pub fn flight_time_s(distance_km: f64, acceleration_m_s2: f64) -> f64 {
    (2.0 * km_to_m(distance_km) / acceleration_m_s2).sqrt()
}

pub fn mission_start() -> Epoch {
    "2025-01-01".parse().expect("valid start date")
}

/// Wraps a provider and counts the calls made through it.
pub struct CountingEphemeris<E> {
    inner: E,
    resolves: Cell<usize>,
    positions: Cell<usize>,
}

impl<E> CountingEphemeris<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            resolves: Cell::new(0),
            positions: Cell::new(0),
        }
    }

    pub fn resolves(&self) -> usize {
        self.resolves.get()
    }

    pub fn positions(&self) -> usize {
        self.positions.get()
    }
}

impl<E: Ephemeris> Ephemeris for CountingEphemeris<E> {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        self.resolves.set(self.resolves.get() + 1);
        self.inner.resolve(name)
    }

    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        self.positions.set(self.positions.get() + 1);
        self.inner.position_km(body, epoch)
    }
}

/// Wraps a provider and keeps every epoch a position was requested at.
pub struct RecordingEphemeris<E> {
    inner: E,
    epochs: RefCell<Vec<Epoch>>,
}

impl<E> RecordingEphemeris<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            epochs: RefCell::new(Vec::new()),
        }
    }

    /// Drain the epochs recorded so far.
    pub fn take_epochs(&self) -> Vec<Epoch> {
        self.epochs.take()
    }
}

impl<E: Ephemeris> Ephemeris for RecordingEphemeris<E> {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        self.inner.resolve(name)
    }

    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        self.epochs.borrow_mut().push(epoch);
        self.inner.position_km(body, epoch)
    }
}
