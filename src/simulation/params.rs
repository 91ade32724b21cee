//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - fixed step size and tick count (`dt`, `num_dt`),
//! - gravitational constant and optional softening (`G`, `eps2`),
//! - how overlapping bodies are merged (`merge_policy`, `merge_geometry`)

use serde::Deserialize;

/// Default gravitational constant, tuned for a screen-sized scene
pub const DEFAULT_G: f64 = 40.0;
/// Default fixed step
pub const DEFAULT_DT: f64 = 0.01;
/// Default number of steps in a run
pub const DEFAULT_NUM_DT: u64 = 6000;

/// How one collision pass treats chains of overlapping bodies
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Scan pairs in index order and merge in place. A body that grew earlier
    /// in the pass is seen with its new mass by later pairs.
    #[default]
    #[serde(rename = "sequential")]
    Sequential,

    /// Detect every overlap on the pre-pass state, resolve closest pairs first,
    /// and let each body take part in at most one merge per pass.
    #[serde(rename = "snapshot")]
    Snapshot,
}

/// What happens to the survivor's geometry on a merge
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeGeometry {
    /// Survivor keeps its own position and radius
    #[default]
    #[serde(rename = "keep")]
    Keep,

    /// Survivor moves to the center of mass and takes the area-conserving radius
    #[serde(rename = "conserve")]
    Conserve,
}

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub G: f64, // gravitational constant
    pub dt: f64, // step size
    pub num_dt: u64, // number of steps in a run
    pub eps2: f64, // softening, 0 disables it
    pub merge_policy: MergePolicy,
    pub merge_geometry: MergeGeometry,
}

impl Default for Parameters {
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
