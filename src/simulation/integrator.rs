//! Fixed-step time integrator for the gravity system
//!
//! Velocity Verlet driven by an `AccelSet` and `Parameters`. The acceleration
//! cached on each body is reused as a_n, so every step needs one force pass.

use super::states::{System, NVec2};
use super::forces::AccelSet;
use super::params::Parameters;

/// Advance the 2D system by one step using velocity Verlet
///
/// Every sub-step is a full pass over the bodies before the next one starts:
/// 1. x_n+1 = x_n + dt v_n + (1/2) dt^2 a_n
/// 2. v_n+1/2 = v_n + (1/2 dt) a_n
/// 3. a_n+1 from all x_n+1 at once
/// 4. v_n+1 = v_n+1/2 + (1/2 dt) a_n+1
///
/// `sys.t` is advanced by `params.dt`. On the very first step a_n is the
/// zero acceleration bodies are created with.
pub fn verlet_integrator(sys: &mut System, forces: &AccelSet, params: &Parameters) {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return;
    }

    let dt = params.dt; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2, half update for verlet

    // Drift with the acceleration cached at the end of the previous step
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v + half_dt * dt * b.a;
    }

    // First kick, still using a_n
    for b in sys.bodies.iter_mut() {
        b.v += half_dt * b.a;
    }

    // Increment the system time by one full step
    sys.t += dt;

    // a_n+1 is computed into a separate buffer so every body reads the same
    // set of updated positions
    let mut a_new = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_new);

    // Second kick with a_n+1, and cache it for the next drift
    for (b, a) in sys.bodies.iter_mut().zip(a_new.iter()) {
        b.a = *a;
        b.v += half_dt * *a;
    }
}
