//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - active force set (`AccelSet`)
//! - presentation settings (`ViewConfig`), passed through untouched
//!
//! The scenario is inserted into Bevy as a `Resource` by the viewer and is
//! driven directly by the headless runner and the tests.

use bevy::prelude::Resource;
use log::info;

use crate::configuration::config::{ScenarioConfig, ViewConfig};
use crate::configuration::error::ConfigError;
use crate::simulation::collisions::MergeEvent;
use crate::simulation::engine::step;
use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, BodyId, NVec2, System};

/// Outcome of a complete headless run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub merges: Vec<MergeEvent>,
    pub bodies_left: usize,
    pub initial_momentum: NVec2,
    pub final_momentum: NVec2,
    pub initial_energy: f64,
    pub final_energy: f64,
}

/// Bevy resource representing a fully-initialized scenario
#[derive(Resource)]
pub struct Scenario {
    pub parameters: Parameters,
    pub system: System,
    pub forces: AccelSet,
    pub view: ViewConfig,
}

impl Scenario {
    /// Validate `cfg` and build the runtime state from it
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        // Bodies: map `BodyConfig` -> runtime `Body`, ids in file order
        let mut bodies = Vec::with_capacity(cfg.bodies.len());
        for (i, bc) in cfg.bodies.iter().enumerate() {
            bodies.push(Body::new(
                BodyId(i as u32),
                NVec2::new(bc.x[0], bc.x[1]),
                NVec2::new(bc.v[0], bc.v[1]),
                bc.m,
                bc.radius,
                bc.rgb(i)?,
            ));
        }

        let parameters = Parameters::from(&cfg.parameters);
        let mut scenario = Self::from_system(System::new(bodies), parameters);
        scenario.view = cfg.view;

        info!(
            "built scenario: {} bodies, {} force terms, G = {}, dt = {}, {} steps",
            scenario.system.len(),
            scenario.forces.len(),
            scenario.parameters.G,
            scenario.parameters.dt,
            scenario.parameters.num_dt
        );

        Ok(scenario)
    }

    /// Wrap an existing system, registering Newtonian gravity from `parameters`
    pub fn from_system(system: System, parameters: Parameters) -> Self {
        let forces = AccelSet::new().with(NewtonianGravity {
            G: parameters.G,
            eps2: parameters.eps2,
        });

        Self {
            parameters,
            system,
            forces,
            view: ViewConfig::default(),
        }
    }

    /// Run one integrate + collide tick
    pub fn advance(&mut self) -> Vec<MergeEvent> {
        step(&mut self.system, &self.forces, &self.parameters)
    }

    /// Read-only view of the live bodies
    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.system.tick
    }

    pub fn is_finished(&self) -> bool {
        self.system.tick >= self.parameters.num_dt
    }

    /// Advance until `num_dt` ticks have run, returning every merge
    pub fn run_to_end(&mut self) -> Vec<MergeEvent> {
        let mut merges = Vec::new();
        while !self.is_finished() {
            merges.extend(self.advance());
        }
        merges
    }

    /// Run to the end without a viewer, recording conservation diagnostics
    pub fn run_headless(&mut self) -> RunSummary {
        let initial_momentum = self.system.momentum();
        let initial_energy = self.total_energy();

        let merges = self.run_to_end();

        info!(
            "finished {} steps: {} merges, {} bodies left",
            self.tick(),
            merges.len(),
            self.system.len()
        );

        RunSummary {
            ticks: self.tick(),
            bodies_left: self.system.len(),
            merges,
            initial_momentum,
            final_momentum: self.system.momentum(),
            initial_energy,
            final_energy: self.total_energy(),
        }
    }

    /// Kinetic plus potential energy of the current state
    pub fn total_energy(&self) -> f64 {
        let gravity = NewtonianGravity {
            G: self.parameters.G,
            eps2: self.parameters.eps2,
        };
        self.system.kinetic_energy() + gravity.potential_energy(&self.system)
    }
}
