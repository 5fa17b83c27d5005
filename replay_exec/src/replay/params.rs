//! Parameters structure for the replay planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::path::PathBuf;

use super::{ReplayError, DEFAULT_RECORD_PERIOD_S};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest accepted number of points in a horizon.
pub const MAX_FORWARD_HORIZON: usize = 10_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the replay planner.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- TRAJECTORY ----
    /// Path to the recorded trajectory file.
    ///
    /// Relative paths are relative to the working directory of the executable.
    pub trajectory_path: PathBuf,

    /// Time between records of trajectory files which have no time column.
    ///
    /// Units: seconds
    pub record_period_s: f64,

    // ---- HORIZON ----
    /// Number of points in each planned horizon.
    pub forward_horizon: usize,

    /// Time between the points added to the end of a horizon when the trajectory runs out.
    ///
    /// Units: seconds
    pub padding_time_step_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            trajectory_path: PathBuf::from("garage.csv"),
            record_period_s: DEFAULT_RECORD_PERIOD_S,
            forward_horizon: 80,
            padding_time_step_s: 0.01,
        }
    }
}

impl Params {
    /// Check that the parameters can be used to plan.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.forward_horizon == 0 || self.forward_horizon > MAX_FORWARD_HORIZON {
            return Err(ReplayError::InvalidParam(
                "forward_horizon",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_FORWARD_HORIZON, self.forward_horizon
                ),
            ));
        }

        if !(self.padding_time_step_s.is_finite() && self.padding_time_step_s > 0.0) {
            return Err(ReplayError::InvalidParam(
                "padding_time_step_s",
                format!("must be positive, got {}", self.padding_time_step_s),
            ));
        }

        if !(self.record_period_s.is_finite() && self.record_period_s > 0.0) {
            return Err(ReplayError::InvalidParam(
                "record_period_s",
                format!("must be positive, got {}", self.record_period_s),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_params() {
        let p: Params = util::params::parse(
            r#"
            trajectory_path = "/data/laps/lap_1.csv"
            forward_horizon = 40
            padding_time_step_s = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(p.trajectory_path, PathBuf::from("/data/laps/lap_1.csv"));
        assert_eq!(p.forward_horizon, 40);
        assert_eq!(p.padding_time_step_s, 0.05);

        // Missing keys take their defaults
        assert_eq!(p.record_period_s, DEFAULT_RECORD_PERIOD_S);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_default_params() {
        let p: Params = util::params::parse("").unwrap();

        assert_eq!(p, Params::default());
        assert_eq!(p.trajectory_path, PathBuf::from("garage.csv"));
        assert_eq!(p.forward_horizon, 80);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut p = Params::default();
        p.forward_horizon = 0;
        match p.validate() {
            Err(ReplayError::InvalidParam(name, _)) => assert_eq!(name, "forward_horizon"),
            r => panic!("Unexpected result {:?}", r),
        }

        let mut p = Params::default();
        p.forward_horizon = usize::MAX;
        match p.validate() {
            Err(ReplayError::InvalidParam(name, _)) => assert_eq!(name, "forward_horizon"),
            r => panic!("Unexpected result {:?}", r),
        }

        p.forward_horizon = MAX_FORWARD_HORIZON + 1;
        assert!(p.validate().is_err());

        p.forward_horizon = MAX_FORWARD_HORIZON;
        assert!(p.validate().is_ok());

        let mut p = Params::default();
        p.padding_time_step_s = -0.01;
        match p.validate() {
            Err(ReplayError::InvalidParam(name, _)) => assert_eq!(name, "padding_time_step_s"),
            r => panic!("Unexpected result {:?}", r),
        }

        let mut p = Params::default();
        p.record_period_s = std::f64::NAN;
        match p.validate() {
            Err(ReplayError::InvalidParam(name, _)) => assert_eq!(name, "record_period_s"),
            r => panic!("Unexpected result {:?}", r),
        }
    }
}
