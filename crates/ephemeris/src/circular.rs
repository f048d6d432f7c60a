//! Analytic provider placing every body on a circular orbit around its parent.
//!
//! Positions are built recursively: a moon's position is its parent's position plus its own
//! circular offset. Bodies without a parent orbit the frame origin (the Sun).

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use solar_core::time::{Epoch, days_to_seconds};
use solar_core::vector::{self, Vector3};

use crate::{Body, Ephemeris, EphemerisError};

/// Circular orbit description for a single body.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularOrbit {
    pub name: String,
    /// Body this one orbits; `None` for heliocentric orbits.
    pub parent: Option<String>,
    pub radius_km: f64,
    /// Sidereal period in days. Zero pins the body at its phase angle.
    pub period_days: f64,
    /// Angle along the orbit at J2000.
    pub phase_deg: f64,
    pub inclination_deg: f64,
    /// Inclusive epoch range with valid data; `None` means unbounded.
    pub coverage: Option<(Epoch, Epoch)>,
}

impl CircularOrbit {
    /// Heliocentric, equatorial orbit with unbounded coverage.
    pub fn new(name: &str, radius_km: f64, period_days: f64) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            radius_km,
            period_days,
            phase_deg: 0.0,
            inclination_deg: 0.0,
            coverage: None,
        }
    }

    pub fn around(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn with_phase(mut self, phase_deg: f64) -> Self {
        self.phase_deg = phase_deg;
        self
    }

    pub fn with_inclination(mut self, inclination_deg: f64) -> Self {
        self.inclination_deg = inclination_deg;
        self
    }

    pub fn with_coverage(mut self, start: Epoch, end: Epoch) -> Self {
        self.coverage = Some((start, end));
        self
    }

    fn covers(&self, epoch: Epoch) -> bool {
        self.coverage.is_none_or(|(start, end)| epoch >= start && epoch <= end)
    }

    /// Offset from the parent body at `epoch`, in kilometres.
    fn offset_km(&self, epoch: Epoch) -> Vector3 {
        let mut angle = self.phase_deg.to_radians();
        if self.period_days > 0.0 {
            let revolutions = epoch.seconds_past_j2000() / days_to_seconds(self.period_days);
            angle += TAU * revolutions.fract();
        }
        let inclination = self.inclination_deg.to_radians();
        let in_plane = [
            angle.cos(),
            angle.sin() * inclination.cos(),
            angle.sin() * inclination.sin(),
        ];
        vector::scale(&in_plane, self.radius_km)
    }
}

/// Catalog of circular orbits keyed by upper-cased body name.
#[derive(Debug, Clone)]
pub struct CircularEphemeris {
    orbits: BTreeMap<String, CircularOrbit>,
}

impl CircularEphemeris {
    /// Build the catalog, rejecting duplicate names, unknown parents, parent cycles and
    /// negative radii or periods.
    pub fn new(orbits: impl IntoIterator<Item = CircularOrbit>) -> Result<Self, EphemerisError> {
        let mut map = BTreeMap::new();
        for orbit in orbits {
            if !(orbit.radius_km >= 0.0) || !(orbit.period_days >= 0.0) {
                return Err(EphemerisError::InvalidCatalog(format!(
                    "`{}` needs a non-negative radius and period",
                    orbit.name
                )));
            }
            let key = orbit.name.to_uppercase();
            if map.insert(key, orbit.clone()).is_some() {
                return Err(EphemerisError::InvalidCatalog(format!(
                    "`{}` is listed more than once",
                    orbit.name
                )));
            }
        }

        let catalog = Self { orbits: map };
        for key in catalog.orbits.keys() {
            catalog.check_ancestry(key)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.orbits.values().map(|orbit| orbit.name.as_str())
    }

    fn check_ancestry(&self, key: &str) -> Result<(), EphemerisError> {
        let mut current = key.to_string();
        for _ in 0..=self.orbits.len() {
            let Some(parent) = self.orbits.get(&current).and_then(|o| o.parent.as_ref()) else {
                return Ok(());
            };
            let parent_key = parent.to_uppercase();
            if !self.orbits.contains_key(&parent_key) {
                return Err(EphemerisError::InvalidCatalog(format!(
                    "`{current}` orbits unknown parent `{parent}`"
                )));
            }
            current = parent_key;
        }
        Err(EphemerisError::InvalidCatalog(format!(
            "parent chain of `{key}` loops back on itself"
        )))
    }

    fn position_of(&self, key: &str, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        let orbit = self
            .orbits
            .get(key)
            .ok_or_else(|| EphemerisError::UnknownBody {
                name: key.to_string(),
            })?;
        if !orbit.covers(epoch) {
            return Err(EphemerisError::OutOfCoverage {
                body: orbit.name.clone(),
                epoch,
            });
        }
        let offset = orbit.offset_km(epoch);
        match &orbit.parent {
            Some(parent) => {
                let origin = self.position_of(&parent.to_uppercase(), epoch)?;
                Ok(vector::add(&origin, &offset))
            }
            None => Ok(offset),
        }
    }
}

impl Ephemeris for CircularEphemeris {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        let key = name.to_uppercase();
        if self.orbits.contains_key(&key) {
            Ok(Body::new(name, key))
        } else {
            Err(EphemerisError::UnknownBody {
                name: name.to_string(),
            })
        }
    }

    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        self.position_of(body.target(), epoch)
    }
}
