//! Collision detection and resolution through perfectly inelastic mergers
//!
//! Two bodies collide when their centers are no farther apart than the sum of
//! their radii. The lighter body is absorbed into the heavier one:
//! - mass is summed
//! - momentum is conserved, v = (m_a v_a + m_b v_b) / (m_a + m_b)
//!
//! Absorbed bodies are flagged during the pass and swept out in a single
//! compaction afterwards, preserving the order of the survivors.

use log::debug;

use crate::simulation::params::{MergeGeometry, MergePolicy, Parameters};
use crate::simulation::states::{Body, BodyId, System};

/// One resolved merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEvent {
    /// Body that kept its slot and gained the mass
    pub survivor: BodyId,
    /// Body that was removed
    pub absorbed: BodyId,
}

/// An overlapping pair found on a store, `i < j`
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    pub i: usize,
    pub j: usize,
    /// Center distance at detection time
    pub separation: f64,
}

/// True when the two circles touch or overlap
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    let r = b.x - a.x;
    let reach = a.radius + b.radius;
    r.norm_squared() <= reach * reach
}

/// Every overlapping pair of `bodies`, in `(i, j)` index order
pub fn detect_overlaps(bodies: &[Body]) -> Vec<Overlap> {
    let mut overlaps = Vec::new();

    for (i, bi) in bodies.iter().enumerate() {
        for (j, bj) in bodies.iter().enumerate().skip(i + 1) {
            if bodies_overlap(bi, bj) {
                overlaps.push(Overlap {
                    i,
                    j,
                    separation: bi.distance_to(bj),
                });
            }
        }
    }

    overlaps
}

/// Fold `absorbed` into `survivor`
///
/// Mass and momentum are conserved. With [`MergeGeometry::Keep`] the survivor
/// keeps its position and radius; with [`MergeGeometry::Conserve`] it moves to
/// the center of mass and takes the radius of a disk with the combined area.
pub fn merge_into(survivor: &mut Body, absorbed: &Body, geometry: MergeGeometry) {
    let total_mass = survivor.m + absorbed.m;

    survivor.v = (survivor.momentum() + absorbed.momentum()) / total_mass;

    if geometry == MergeGeometry::Conserve {
        survivor.x = (survivor.x * survivor.m + absorbed.x * absorbed.m) / total_mass;
        survivor.radius = (survivor.radius.powi(2) + absorbed.radius.powi(2)).sqrt();
    }

    survivor.m = total_mass;
}

/// Detect and merge all colliding pairs in `sys`, then compact the store
///
/// Returns the merges in the order they were applied. The store shrinks by
/// exactly the number of returned events.
pub fn resolve_collisions(sys: &mut System, params: &Parameters) -> Vec<MergeEvent> {
    let mut removed = vec![false; sys.bodies.len()];

    let events = match params.merge_policy {
        MergePolicy::Sequential => merge_sequential(&mut sys.bodies, &mut removed, params.merge_geometry),
        MergePolicy::Snapshot => merge_snapshot(&mut sys.bodies, &mut removed, params.merge_geometry),
    };

    if !events.is_empty() {
        compact(&mut sys.bodies, &removed);
    }

    for e in &events {
        debug!(
            "tick {}: body {} absorbed body {}",
            sys.tick, e.survivor.0, e.absorbed.0
        );
    }

    events
}

/// Index-ordered scan over live pairs, merging in place
///
/// A pair is judged on the masses at the moment it is checked, so a body that
/// absorbed another earlier in the pass can absorb a third one too.
/// Flagged bodies take no further part in the pass.
fn merge_sequential(bodies: &mut [Body], removed: &mut [bool], geometry: MergeGeometry) -> Vec<MergeEvent> {
    let n = bodies.len();
    let mut events = Vec::new();

    for i in 0..n {
        if removed[i] {
            continue;
        }

        for j in (i + 1)..n {
            if removed[j] || !bodies_overlap(&bodies[i], &bodies[j]) {
                continue;
            }

            // i only survives when strictly heavier
            let (s, a) = if bodies[i].m > bodies[j].m { (i, j) } else { (j, i) };
            events.push(merge_pair(bodies, s, a, geometry));
            removed[a] = true;

            if a == i {
                break;
            }
        }
    }

    events
}

/// Merge the overlaps found on the pre-pass state, closest pairs first
///
/// A body that already took part in a merge this pass is skipped, so every
/// merge reads untouched pre-pass bodies. Overlaps left over are picked up on
/// a later pass.
fn merge_snapshot(bodies: &mut [Body], removed: &mut [bool], geometry: MergeGeometry) -> Vec<MergeEvent> {
    let mut overlaps = detect_overlaps(bodies);

    // stable sort, ties keep index order
    overlaps.sort_by(|a, b| a.separation.total_cmp(&b.separation));

    let mut consumed = vec![false; bodies.len()];
    let mut events = Vec::new();

    for Overlap { i, j, .. } in overlaps {
        if consumed[i] || consumed[j] {
            continue;
        }

        let (s, a) = if bodies[i].m > bodies[j].m { (i, j) } else { (j, i) };
        events.push(merge_pair(bodies, s, a, geometry));

        consumed[i] = true;
        consumed[j] = true;
        removed[a] = true;
    }

    events
}

fn merge_pair(bodies: &mut [Body], survivor: usize, absorbed: usize, geometry: MergeGeometry) -> MergeEvent {
    let gone = bodies[absorbed];
    merge_into(&mut bodies[survivor], &gone, geometry);

    MergeEvent {
        survivor: bodies[survivor].id,
        absorbed: gone.id,
    }
}

/// Drop flagged slots, keeping survivors in their original relative order
fn compact(bodies: &mut Vec<Body>, removed: &[bool]) {
    // retain visits every element exactly once, in order
    let mut flags = removed.iter();
    bodies.retain(|_| !flags.next().copied().unwrap_or(false));
}
