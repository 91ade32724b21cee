//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`ViewConfig`]       – window and overlay settings, presentation only
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! parameters:               # every key is optional
//!   G: 40.0                 # gravitational constant
//!   dt: 0.01                # fixed step size
//!   num_dt: 6000            # number of steps
//!   eps2: 0.0               # softening, 0 disables it
//!   merge_policy: sequential
//!   merge_geometry: keep
//!
//! view:
//!   width: 1920
//!   height: 1080
//!   origin: [0.0, 0.0]      # world point drawn at the top-left corner
//!   triangle:
//!     vertices: [0, 1, 2]
//!     windows: [[150, 350], [5650, 5850]]
//!
//! bodies:
//!   - x: [960.0, 540.0]
//!     v: [0.0, 0.0]
//!     m: 10000.0
//!     radius: 25.0
//!     color: yellow         # a CSS color string or [r, g, b]
//!   - x: [960.0, 800.0]
//!     v: [39.2232270276, 0.0]
//!     m: 1000.0
//!     radius: 15.0
//!     color: [0, 0, 255]
//! ```
//!
//! [`crate::Scenario::build_scenario`] validates the configuration and maps it
//! into the runtime state.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::configuration::error::ConfigError;
use crate::simulation::params::{MergeGeometry, MergePolicy, Parameters, DEFAULT_DT, DEFAULT_G, DEFAULT_NUM_DT};
use crate::simulation::states::Rgb;

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub G: f64,                          // gravitational constant
    pub dt: f64,                         // time step size
    pub num_dt: u64,                     // number of steps in a run
    pub eps2: f64,                       // softening, 0 keeps the bare inverse-square law
    pub merge_policy: MergePolicy,       // how chained overlaps are resolved
    pub merge_geometry: MergeGeometry,   // whether merges move and grow the survivor
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            G: DEFAULT_G,
            dt: DEFAULT_DT,
            num_dt: DEFAULT_NUM_DT,
            eps2: 0.0,
            merge_policy: MergePolicy::default(),
            merge_geometry: MergeGeometry::default(),
        }
    }
}

impl From<&ParametersConfig> for Parameters {
    fn from(cfg: &ParametersConfig) -> Self {
        Self {
            G: cfg.G,
            dt: cfg.dt,
            num_dt: cfg.num_dt,
            eps2: cfg.eps2,
            merge_policy: cfg.merge_policy,
            merge_geometry: cfg.merge_geometry,
        }
    }
}

/// A body color, either a CSS color string (`orange`, `"#ff8800"`) or `[r, g, b]`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorConfig {
    Name(String),
    Rgb([u8; 3]),
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // Initial position in world units, y grows downward
    pub v: Vec<f64>, // Initial velocity in world units per time unit
    pub m: f64,      // Mass of the body
    pub radius: f64, // Radius used for collisions and drawing
    #[serde(default)]
    pub color: Option<ColorConfig>, // White when absent
}

impl BodyConfig {
    pub fn new(x: [f64; 2], v: [f64; 2], m: f64, radius: f64, color: Rgb) -> Self {
        Self {
            x: x.to_vec(),
            v: v.to_vec(),
            m,
            radius,
            color: Some(ColorConfig::Rgb([color.r, color.g, color.b])),
        }
    }

    /// Resolve the configured color
    pub fn rgb(&self, body: usize) -> Result<Rgb, ConfigError> {
        match &self.color {
            None => Ok(Rgb::default()),
            Some(ColorConfig::Rgb([r, g, b])) => Ok(Rgb::new(*r, *g, *b)),
            Some(ColorConfig::Name(name)) => name.parse::<Rgb>().map_err(|_| ConfigError::UnknownColor {
                body,
                name: name.clone(),
            }),
        }
    }
}

/// Dashed triangle drawn between three bodies during some tick windows
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TriangleConfig {
    pub vertices: [usize; 3], // store indices of the three corners
    pub windows: Vec<[u64; 2]>, // exclusive (start, end) tick bounds
}

impl TriangleConfig {
    /// Bodies 0, 1, 2 shortly after the start and shortly before the end of a run
    pub fn default_for(num_dt: u64) -> Self {
        Self {
            vertices: [0, 1, 2],
            windows: vec![
                [150, 350],
                [num_dt.saturating_sub(350), num_dt.saturating_sub(150)],
            ],
        }
    }
}

/// Window and overlay settings. The physics never reads these.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
    pub origin: [f64; 2],
    pub triangle: Option<TriangleConfig>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            origin: [0.0, 0.0],
            triangle: None,
        }
    }
}

impl ViewConfig {
    /// The configured triangle, or the default windows for a run of `num_dt` ticks
    pub fn triangle_or_default(&self, num_dt: u64) -> TriangleConfig {
        self.triangle.clone().unwrap_or_else(|| TriangleConfig::default_for(num_dt))
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    #[serde(default)]
    pub view: ViewConfig, // Presentation settings for the viewer
    pub bodies: Vec<BodyConfig>, // List of bodies that define the initial state of the system
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The four-body Lagrange scene: a central mass, one orbiter, and two
    /// test masses near the L4 and L3 points of the pair
    pub fn lagrange() -> Self {
        Self {
            parameters: ParametersConfig::default(),
            view: ViewConfig::default(),
            bodies: vec![
                BodyConfig::new([960.0, 540.0], [0.0, 0.0], 10000.0, 25.0, Rgb::YELLOW),
                BodyConfig::new([960.0, 800.0], [39.2232270276, 0.0], 1000.0, 15.0, Rgb::BLUE),
                BodyConfig::new([1185.16660498, 670.0], [19.6116135138, -33.9683110243], 1.0, 5.0, Rgb::MAGENTA),
                BodyConfig::new([960.0, 280.00045552937092], [-39.2232613879, 0.0], 1.0, 5.0, Rgb::WHITE),
            ],
        }
    }

    /// Check every precondition the physics assumes but never tests
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parameters;
        if !p.G.is_finite() {
            return Err(ConfigError::InvalidParameter { name: "G", value: p.G });
        }
        if !(p.dt.is_finite() && p.dt > 0.0) {
            return Err(ConfigError::InvalidParameter { name: "dt", value: p.dt });
        }
        if !(p.eps2.is_finite() && p.eps2 >= 0.0) {
            return Err(ConfigError::InvalidParameter { name: "eps2", value: p.eps2 });
        }

        for (i, b) in self.bodies.iter().enumerate() {
            check_vector(i, "x", &b.x)?;
            check_vector(i, "v", &b.v)?;
            check_positive(i, "m", b.m)?;
            check_positive(i, "radius", b.radius)?;
            b.rgb(i)?;
        }

        for (i, a) in self.bodies.iter().enumerate() {
            for (j, b) in self.bodies.iter().enumerate().skip(i + 1) {
                if a.x == b.x {
                    return Err(ConfigError::CoincidentBodies { first: i, second: j });
                }
            }
        }

        if let Some(triangle) = &self.view.triangle {
            let [a, b, c] = triangle.vertices;
            if a == b || b == c || a == c {
                return Err(ConfigError::TriangleVertices(triangle.vertices));
            }
            for &[start, end] in &triangle.windows {
                if end <= start.saturating_add(1) {
                    return Err(ConfigError::EmptyWindow { start, end });
                }
            }
        }

        Ok(())
    }
}

fn check_vector(body: usize, field: &'static str, v: &[f64]) -> Result<(), ConfigError> {
    if v.len() != 2 {
        return Err(ConfigError::VectorLength { body, field, len: v.len() });
    }
    if !v.iter().all(|c| c.is_finite()) {
        return Err(ConfigError::NonFinite { body, field });
    }
    Ok(())
}

fn check_positive(body: usize, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { body, field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { body, field, value });
    }
    Ok(())
}
