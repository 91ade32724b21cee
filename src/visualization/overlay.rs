//! Presentation policy for the dashed triangle overlay
//!
//! Pure functions, no Bevy types, so the policy can be tested headless.

use crate::configuration::config::TriangleConfig;
use crate::simulation::states::{Body, NVec2};

/// Length of one dash and of one gap, in world units
pub const DASH_LENGTH: f64 = 10.0;

/// True when `tick_index` lies strictly inside `[start, end]`
pub fn in_window(tick_index: u64, [start, end]: [u64; 2]) -> bool {
    start < tick_index && tick_index < end
}

/// Whether the triangle is drawn after the step with zero-based index `tick_index`
///
/// Needs every vertex index to still name a live body, so at least three
/// bodies must remain.
pub fn triangle_visible(tick_index: u64, body_count: usize, triangle: &TriangleConfig) -> bool {
    let highest = triangle.vertices.iter().copied().max().unwrap_or(0);

    body_count >= 3
        && body_count > highest
        && triangle.windows.iter().any(|&w| in_window(tick_index, w))
}

/// Positions of the three corners, if they all exist in `bodies`
pub fn triangle_corners(bodies: &[Body], triangle: &TriangleConfig) -> Option<[NVec2; 3]> {
    let [a, b, c] = triangle.vertices;
    Some([bodies.get(a)?.x, bodies.get(b)?.x, bodies.get(c)?.x])
}

/// Split the line from `start` to `end` into dashes of length `dash`
///
/// Dashes and gaps alternate, starting with a dash at `start`; the last dash
/// is clipped at `end`.
pub fn dashed_segments(start: NVec2, end: NVec2, dash: f64) -> Vec<(NVec2, NVec2)> {
    let direction = end - start;
    let length = direction.norm();
    if !(length > 0.0 && dash > 0.0) {
        return Vec::new();
    }
    let unit = direction / length;

    let mut segments = Vec::new();
    let mut k = 0u64;
    loop {
        let from = k as f64 * dash;
        if from >= length {
            break;
        }
        if k % 2 == 0 {
            let to = (from + dash).min(length);
            segments.push((start + unit * from, start + unit * to));
        }
        k += 1;
    }

    segments
}
