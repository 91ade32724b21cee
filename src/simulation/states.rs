//! Core state types for the 2D gravity simulation.
//!
//! Defines the body record and the body store:
//! - `Body`   using `NVec2` for position, velocity and cached acceleration
//! - `System` the ordered list of live bodies plus elapsed time and tick count
//!
//! The store keeps insertion order. Bodies are only ever removed by the
//! collision resolver, and removal never reorders the survivors.

use std::str::FromStr;

use css_color_parser::{Color as CssColor, ColorParseError};
use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Stable identity of a body, assigned in insertion order when a scenario is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Display color of a body. Never read by the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Any CSS color: a name (`orange`), hex (`#ff8800`) or `rgb(...)`.
    /// Alpha is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let css = s.trim().to_ascii_lowercase().parse::<CssColor>()?;
        Ok(Self::new(css.r, css.g, css.b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub id: BodyId, // stable identity
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub a: NVec2, // acceleration cached from the end of the previous step
    pub m: f64, // mass, > 0 for every live body
    pub radius: f64, // collision and drawing radius
    pub color: Rgb, // display only
}

impl Body {
    /// New body with zero cached acceleration, filled in by the first step
    pub fn new(id: BodyId, x: NVec2, v: NVec2, m: f64, radius: f64, color: Rgb) -> Self {
        Self {
            id,
            x,
            v,
            a: NVec2::zeros(),
            m,
            radius,
            color,
        }
    }

    pub fn momentum(&self) -> NVec2 {
        self.v * self.m
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (other.x - self.x).norm()
    }

    /// True when every vector and scalar of the body is finite
    pub fn is_finite(&self) -> bool {
        self.x.iter().chain(self.v.iter()).chain(self.a.iter()).all(|c| c.is_finite())
            && self.m.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // live bodies in insertion order
    pub t: f64, // time
    pub tick: u64, // completed steps
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self {
            bodies,
            t: 0.0,
            tick: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }

    /// Total linear momentum, sum of m v
    pub fn momentum(&self) -> NVec2 {
        self.bodies.iter().fold(NVec2::zeros(), |p, b| p + b.momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn is_finite(&self) -> bool {
        self.bodies.iter().all(Body::is_finite)
    }
}
