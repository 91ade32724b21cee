//! Force / acceleration contributors for the gravity engine
//!
//! Defines the 2D acceleration trait, the set that sums several terms,
//! and direct Newtonian gravity

use crate::simulation::states::{System, NVec2};

/// Collection of 2D acceleration terms (gravity, drag, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Number of registered terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations at time `t` for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - every term reads the same `sys`, so no body sees another body's
    ///   result from this pass
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for 2D acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec2]);
}

/// 2D Newtonian gravity, direct n^2 sum
///
/// With `eps2 == 0.0` this is the bare inverse-square law and two bodies at
/// the same position produce a non-finite acceleration.
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub eps2: f64, // softening
}

impl NewtonianGravity {
    /// Net acceleration on body `i` from every other body in `sys`
    ///
    /// Forces `G * m_i * m_j / r^2` along the separation are summed, then the
    /// total is divided by `m_i`. Body `i` itself is skipped by index.
    pub fn acceleration_on(&self, i: usize, sys: &System) -> NVec2 {
        let bi = &sys.bodies[i];
        let mut net_force = NVec2::zeros();

        for (j, bj) in sys.bodies.iter().enumerate() {
            if j == i {
                continue;
            }

            // r points from i toward j, so i is pulled along +r
            let r = bj.x - bi.x;

            // |r|^2 plus optional softening
            let d2 = r.norm_squared() + self.eps2;
            let d = d2.sqrt();

            // |F| = G m_i m_j / d^2, direction r / |r|
            let magnitude = self.G * bi.m * bj.m / d2;
            net_force += r * (magnitude / d);
        }

        net_force / bi.m
    }

    /// Total gravitational potential energy, -G m_i m_j / r over all pairs
    pub fn potential_energy(&self, sys: &System) -> f64 {
        let n = sys.bodies.len();
        let mut pe = 0.0;

        for i in 0..n {
            let bi = &sys.bodies[i];
            for bj in &sys.bodies[(i + 1)..] {
                let d = ((bj.x - bi.x).norm_squared() + self.eps2).sqrt();
                pe -= self.G * bi.m * bj.m / d;
            }
        }

        pe
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) {
        for (i, a) in out.iter_mut().enumerate().take(sys.bodies.len()) {
            *a += self.acceleration_on(i, sys);
        }
    }
}
