//! Configuration models and loaders for the Solar Tour Planner.
//!
//! A tour file fixes everything the planner must not hard-code: the ordered list of systems,
//! the vehicle's constant acceleration, the transit solver tolerances, the departure wait grid
//! and the mission start. Missing fields fall back to the reference Mercury-to-Neptune tour.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solar_core::time::{Epoch, EpochParseError};
use thiserror::Error;

/// Upper bound on moons per system; route search is factorial in this number.
pub const MAX_MOONS_PER_SYSTEM: usize = 6;

/// One planetary system: the planet is always visited first, the moons in an optimized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,
    pub planet: String,
    #[serde(default)]
    pub moons: Vec<String>,
}

impl SystemConfig {
    pub fn new(name: &str, planet: &str, moons: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            planet: planet.to_string(),
            moons: moons.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Planet followed by the moons in configured order.
    pub fn bodies(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.planet.as_str()).chain(self.moons.iter().map(String::as_str))
    }
}

/// Constant-acceleration transit solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub acceleration_m_s2: f64,
    pub convergence_threshold_s: f64,
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            acceleration_m_s2: 1.0,
            convergence_threshold_s: 60.0,
            max_iterations: 20,
        }
    }
}

/// Grid of waits considered before each departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartureWindowConfig {
    pub max_wait_days: f64,
    pub wait_step_days: f64,
}

impl Default for DepartureWindowConfig {
    fn default() -> Self {
        Self {
            max_wait_days: 180.0,
            wait_step_days: 10.0,
        }
    }
}

/// Complete tour definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourConfig {
    /// Body the tour starts from and returns to.
    #[serde(default = "default_home")]
    pub home: String,
    /// Mission start, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub departure: DepartureWindowConfig,
    #[serde(default = "reference_systems")]
    pub systems: Vec<SystemConfig>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            start: default_start(),
            solver: SolverConfig::default(),
            departure: DepartureWindowConfig::default(),
            systems: reference_systems(),
        }
    }
}

impl TourConfig {
    pub fn start_epoch(&self) -> Result<Epoch, ConfigError> {
        Ok(self.start.parse()?)
    }

    /// Reject settings the planner cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if self.home.trim().is_empty() {
            return invalid("home body must be named".into());
        }
        self.start_epoch()?;
        if !(self.solver.acceleration_m_s2 > 0.0) {
            return invalid(format!(
                "acceleration must be positive (got {})",
                self.solver.acceleration_m_s2
            ));
        }
        if !(self.solver.convergence_threshold_s > 0.0) {
            return invalid(format!(
                "convergence threshold must be positive (got {})",
                self.solver.convergence_threshold_s
            ));
        }
        if self.solver.max_iterations == 0 {
            return invalid("solver needs at least one iteration".into());
        }
        if !(self.departure.max_wait_days >= 0.0) {
            return invalid(format!(
                "maximum wait must be non-negative (got {})",
                self.departure.max_wait_days
            ));
        }
        if !(self.departure.wait_step_days > 0.0) {
            return invalid(format!(
                "wait step must be positive (got {})",
                self.departure.wait_step_days
            ));
        }
        if self.systems.is_empty() {
            return invalid("tour needs at least one system".into());
        }
        for system in &self.systems {
            if system.moons.len() > MAX_MOONS_PER_SYSTEM {
                return invalid(format!(
                    "{} lists {} moons; at most {MAX_MOONS_PER_SYSTEM} are supported",
                    system.name,
                    system.moons.len()
                ));
            }
            let mut seen = BTreeSet::new();
            for body in system.bodies() {
                if !seen.insert(body.to_uppercase()) {
                    return invalid(format!("{} lists `{body}` more than once", system.name));
                }
            }
        }
        Ok(())
    }
}

fn default_home() -> String {
    "Earth".to_string()
}

fn default_start() -> String {
    "2025-01-01".to_string()
}

/// Mercury through Neptune with the moons visited by the reference tour.
pub fn reference_systems() -> Vec<SystemConfig> {
    vec![
        SystemConfig::new("Mercury System", "Mercury", &[]),
        SystemConfig::new("Venus System", "Venus", &[]),
        SystemConfig::new("Earth System", "Earth", &["Moon"]),
        SystemConfig::new("Mars System", "Mars", &["Phobos", "Deimos"]),
        SystemConfig::new(
            "Jupiter System",
            "Jupiter",
            &["Io", "Europa", "Ganymede", "Callisto"],
        ),
        SystemConfig::new(
            "Saturn System",
            "Saturn",
            &["Mimas", "Enceladus", "Dione", "Rhea", "Titan"],
        ),
        SystemConfig::new(
            "Uranus System",
            "Uranus",
            &["Ariel", "Umbriel", "Titania", "Oberon", "Miranda"],
        ),
        SystemConfig::new("Neptune System", "Neptune", &["Triton", "Nereid", "Proteus"]),
    ]
}

/// Circular-orbit body record for the analytic ephemeris catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub orbit_radius_km: f64,
    pub period_days: f64,
    #[serde(default)]
    pub phase_deg: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub coverage_start: Option<String>,
    #[serde(default)]
    pub coverage_end: Option<String>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Epoch(#[from] EpochParseError),
    #[error("invalid tour configuration: {0}")]
    Invalid(String),
}

/// Load and validate a tour definition from a TOML or YAML file.
pub fn load_tour<P: AsRef<Path>>(path: P) -> Result<TourConfig, ConfigError> {
    let path = path.as_ref();
    let config: TourConfig = if is_toml(path) {
        toml::from_str(&std::fs::read_to_string(path)?)?
    } else {
        serde_yaml::from_reader(File::open(path)?)?
    };
    config.validate()?;
    Ok(config)
}

/// Load circular-orbit body records from a YAML list, a TOML file or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    load_records(path)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
