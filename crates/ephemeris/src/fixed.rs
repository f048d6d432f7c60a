//! Provider with bodies pinned at constant positions.

use std::collections::BTreeMap;

use solar_core::time::Epoch;
use solar_core::vector::Vector3;

use crate::{Body, Ephemeris, EphemerisError};

/// Bodies that never move. Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct FixedEphemeris {
    positions: BTreeMap<String, Vector3>,
}

impl FixedEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_body(mut self, name: &str, position_km: Vector3) -> Self {
        self.insert(name, position_km);
        self
    }

    pub fn insert(&mut self, name: &str, position_km: Vector3) {
        self.positions.insert(name.to_uppercase(), position_km);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Ephemeris for FixedEphemeris {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        let key = name.to_uppercase();
        if self.positions.contains_key(&key) {
            Ok(Body::new(name, key))
        } else {
            Err(EphemerisError::UnknownBody {
                name: name.to_string(),
            })
        }
    }

    fn position_km(&self, body: &Body, _epoch: Epoch) -> Result<Vector3, EphemerisError> {
        self.positions
            .get(body.target())
            .copied()
            .ok_or_else(|| EphemerisError::UnknownBody {
                name: body.name().to_string(),
            })
    }
}
