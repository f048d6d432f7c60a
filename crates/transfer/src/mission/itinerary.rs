//! Append-only log of the legs actually flown.

use serde::Serialize;
use solar_core::time::{Epoch, seconds_to_days};

use super::transit::TransitEstimate;

/// One flown leg. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub system: String,
    pub from: String,
    pub to: String,
    pub departure: Epoch,
    pub travel_s: f64,
    pub arrival: Epoch,
    /// Speed at turnover of the symmetric accelerate/decelerate burn.
    pub peak_speed_m_s: f64,
    pub converged: bool,
    pub iterations: u32,
}

impl Leg {
    pub fn travel_days(&self) -> f64 {
        seconds_to_days(self.travel_s)
    }
}

/// Ordered legs of one planning run.
#[derive(Debug, Clone)]
pub struct Itinerary {
    acceleration_m_s2: f64,
    legs: Vec<Leg>,
}

impl Itinerary {
    pub fn new(acceleration_m_s2: f64) -> Self {
        Self {
            acceleration_m_s2,
            legs: Vec::new(),
        }
    }

    /// Append a leg and return its arrival epoch so the caller can chain the next one.
    pub fn record(
        &mut self,
        system: &str,
        from: &str,
        to: &str,
        departure: Epoch,
        transit: &TransitEstimate,
    ) -> Epoch {
        let arrival = departure.add_seconds(transit.duration_s);
        self.legs.push(Leg {
            system: system.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            departure,
            travel_s: transit.duration_s,
            arrival,
            peak_speed_m_s: self.acceleration_m_s2 * (transit.duration_s / 2.0),
            converged: transit.converged,
            iterations: transit.iterations,
        });
        arrival
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn into_legs(self) -> Vec<Leg> {
        self.legs
    }
}
