use std::time::Instant;

use crate::simulation::states::{Body, BodyId, NVec2, Rgb, System};
use crate::simulation::params::Parameters;
use crate::simulation::forces::{Acceleration, NewtonianGravity};
use crate::simulation::scenario::Scenario;

/// Helper to build a manual System of size `n`
/// Bodies sit on a deterministic spread with radii small enough never to touch
fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec2::new(
            (i_f * 0.37).sin() * 500.0,
            (i_f * 0.13).cos() * 500.0,
        );

        bodies.push(Body::new(BodyId(i as u32), x, NVec2::zeros(), 1.0, 1.0e-6, Rgb::WHITE));
    }

    System::new(bodies)
}

/// Time one direct force pass for growing n
pub fn bench_gravity() {
    // Different system sizes to test
    let ns = [100, 200, 400, 800, 1600, 3200];
    let params = Parameters::default();

    for n in ns {
        let sys = make_system(n);
        let mut out = vec![NVec2::zeros(); n];

        let direct = NewtonianGravity {
            G: params.G,
            eps2: params.eps2,
        };

        // Warm up
        direct.acceleration(0.0, &sys, &mut out);

        let t0 = Instant::now();
        direct.acceleration(0.0, &sys, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, force pass = {:8.6} s", dt_direct);
    }
}

/// Time full integrate + collide steps for growing n
/// Paste output directly into a spreadsheet to graph
pub fn bench_verlet() {
    println!("N,step_ms");

    for n in (100..=1600).step_by(100) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 400 { 10 } else { 2 };

        let mut scenario = Scenario::from_system(make_system(n), Parameters::default());

        // Warm-up one step
        scenario.advance();

        let t0 = Instant::now();
        for _ in 0..steps {
            scenario.advance();
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
}
