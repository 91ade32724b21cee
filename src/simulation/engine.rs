//! Step driver
//!
//! One tick = integrate every body, then resolve collisions on the result.
//! Nothing here touches global state, so the same function drives the
//! windowed viewer, the headless runner and the tests.

use log::warn;

use crate::simulation::collisions::{resolve_collisions, MergeEvent};
use crate::simulation::forces::AccelSet;
use crate::simulation::integrator::verlet_integrator;
use crate::simulation::params::Parameters;
use crate::simulation::states::System;

/// Advance `sys` by one tick of `params.dt` and return the merges it caused
pub fn step(sys: &mut System, forces: &AccelSet, params: &Parameters) -> Vec<MergeEvent> {
    let was_finite = sys.is_finite();

    verlet_integrator(sys, forces, params);
    let merges = resolve_collisions(sys, params);
    sys.tick += 1;

    if was_finite && !sys.is_finite() {
        warn!("tick {}: non-finite body state, bodies may coincide", sys.tick);
    }

    merges
}
