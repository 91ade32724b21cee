pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod logger;

pub use simulation::states::{Body, BodyId, NVec2, Rgb, System};
pub use simulation::params::{MergeGeometry, MergePolicy, Parameters};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity};
pub use simulation::integrator::verlet_integrator;
pub use simulation::collisions::{bodies_overlap, detect_overlaps, merge_into, resolve_collisions, MergeEvent, Overlap};
pub use simulation::engine::step;
pub use simulation::scenario::{RunSummary, Scenario};

pub use configuration::config::{BodyConfig, ColorConfig, ParametersConfig, ScenarioConfig, TriangleConfig, ViewConfig};
pub use configuration::error::ConfigError;

pub use visualization::vis2d::run_2d;

pub use benchmark::benchmark::{bench_gravity, bench_verlet};
