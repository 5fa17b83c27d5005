//! Horizon construction from a matched trajectory point

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use serde::Serialize;

use super::{Params, PathPoint, MAX_FORWARD_HORIZON};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The forward looking section of the trajectory produced by one planning cycle.
///
/// Times of the points are relative to the first point of the horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Horizon {
    /// Points of the horizon, real points followed by any padding
    pub points: Vec<PathPoint>,

    /// Index in the recorded trajectory of the first point of the horizon
    pub matched_index: usize,

    /// Number of padding points at the end of the horizon
    pub num_padded: usize,
}

/// Builds fixed length horizons from the recorded trajectory.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HorizonBuilder {
    /// Number of points in each horizon
    pub forward_count: usize,

    /// Time between consecutive padding points.
    ///
    /// Units: seconds
    pub time_step_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Horizon {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathPoint> {
        self.points.iter()
    }

    /// Number of points copied from the recorded trajectory.
    pub fn num_real(&self) -> usize {
        self.points.len() - self.num_padded
    }
}

impl Default for HorizonBuilder {
    fn default() -> Self {
        let params = Params::default();
        Self::new(params.forward_horizon, params.padding_time_step_s)
    }
}

impl HorizonBuilder {
    pub fn new(forward_count: usize, time_step_s: f64) -> Self {
        Self {
            forward_count,
            time_step_s,
        }
    }

    /// Build the horizon starting at `matched_index`.
    ///
    /// Up to `forward_count` points from `matched_index` onwards are copied, with the time of the
    /// matched point subtracted from each. If the trajectory ends first, the last point is repeated
    /// `time_step_s` apart until the horizon holds `forward_count` points.
    ///
    /// An empty horizon is returned if `matched_index` is out of range or `forward_count` is zero.
    pub fn build(&self, matched_index: usize, trajectory: &[PathPoint]) -> Horizon {
        let mut horizon = Horizon {
            points: Vec::with_capacity(self.forward_count.min(MAX_FORWARD_HORIZON)),
            matched_index,
            num_padded: 0,
        };

        if self.forward_count == 0 || matched_index >= trajectory.len() {
            return horizon;
        }

        // Inclusive end of the window, limited to the end of the trajectory
        let end_index = matched_index
            .saturating_add(self.forward_count - 1)
            .min(trajectory.len() - 1);

        let t0_s = trajectory[matched_index].time_s;

        horizon.points.extend(
            trajectory[matched_index..=end_index]
                .iter()
                .map(|p| p.shifted_in_time(-t0_s)),
        );

        // Hold the last point until the horizon is full
        while horizon.points.len() < self.forward_count {
            let last = match horizon.points.last() {
                Some(p) => *p,
                None => break,
            };
            horizon.points.push(last.shifted_in_time(self.time_step_s));
            horizon.num_padded += 1;
        }

        trace!(
            "Horizon from {}: {} real points, {} padded",
            matched_index,
            horizon.num_real(),
            horizon.num_padded
        );

        horizon
    }
}
