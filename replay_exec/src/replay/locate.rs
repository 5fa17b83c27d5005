//! Nearest point search over the recorded trajectory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::PathPoint;
use util::maths::planar_dist_sq;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the index of the trajectory point closest to `query` in the plane.
///
/// Every point is checked, altitude and heading are ignored. When several points are at the same
/// minimum distance the earliest one is returned. Returns `None` if the trajectory is empty.
pub fn locate(query: (f64, f64), trajectory: &[PathPoint]) -> Option<usize> {
    let mut nearest: Option<(usize, f64)> = None;

    for (i, point) in trajectory.iter().enumerate() {
        let dist_sq = planar_dist_sq(query, point.planar_position());

        // Strictly smaller only, so ties keep the first point and NaN never replaces it
        match nearest {
            None => nearest = Some((i, dist_sq)),
            Some((_, min_dist_sq)) if dist_sq < min_dist_sq => nearest = Some((i, dist_sq)),
            _ => (),
        }
    }

    nearest.map(|(i, _)| i)
}
