//! Implementations for the ReplayPlanner state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;
use std::{io::Read, path::Path};

// Internal
use super::{
    locate, Horizon, HorizonBuilder, LoadError, LoadSummary, Params, PlanError, ReplayError,
    TrajectoryStore,
};
use crate::loc::Pose;
use util::{
    archive::{ArchiveError, Archived, Archiver},
    maths::{planar_dist_sq, wrap_pi},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Replay planner module state
#[derive(Default)]
pub struct ReplayPlanner {
    pub(crate) params: Params,

    store: TrajectoryStore,

    builder: HorizonBuilder,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Status report for replay planner processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Index of the trajectory point nearest to the vehicle
    pub matched_index: usize,

    /// Planar distance between the vehicle and the matched point
    pub matched_dist: f64,

    /// Heading of the vehicle relative to the matched point.
    ///
    /// Units: radians, in [-pi, pi)
    pub heading_error_rad: f64,

    /// Number of horizon points copied from the trajectory
    pub num_real_points: usize,

    /// Number of horizon points added by padding
    pub num_padded_points: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ReplayPlanner {
    type InitData = Params;
    type InitError = ReplayError;

    type InputData = Pose;
    type OutputData = Horizon;
    type StatusReport = StatusReport;
    type ProcError = PlanError;

    /// Initialise the replay planner.
    ///
    /// The trajectory is loaded from `params.trajectory_path`. If it cannot be read the planner
    /// starts with no trajectory and every cycle fails with `PlanError::NoTrajectory`.
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        *self = Self::new(init_data)?;

        self.arch_report = Archiver::from_path(session, "replay/status_report.csv")
            .map_err(ReplayError::ArchiveError)?;

        let path = self.params.trajectory_path.clone();
        if let Err(e) = self.load_trajectory(&path) {
            warn!("Continuing without a trajectory: {}", e);
        }

        Ok(())
    }

    /// Plan the horizon for the current pose of the vehicle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let horizon = self.plan(input_data)?;

        let matched = &self.store.points()[horizon.matched_index];

        self.report = StatusReport {
            matched_index: horizon.matched_index,
            matched_dist: planar_dist_sq(input_data.planar_position(), matched.planar_position())
                .sqrt(),
            heading_error_rad: wrap_pi(input_data.yaw - matched.yaw),
            num_real_points: horizon.num_real(),
            num_padded_points: horizon.num_padded,
        };

        debug!(
            "Matched trajectory point {} at {:.3}, {} real + {} padded points",
            self.report.matched_index,
            self.report.matched_dist,
            self.report.num_real_points,
            self.report.num_padded_points
        );

        Ok((horizon, self.report))
    }
}

impl Archived for ReplayPlanner {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(&self.report)
    }
}

impl ReplayPlanner {
    /// Create a new planner with no trajectory loaded and no archives.
    pub fn new(params: Params) -> Result<Self, ReplayError> {
        params.validate()?;

        Ok(Self {
            store: TrajectoryStore::new(params.record_period_s),
            builder: HorizonBuilder::new(params.forward_horizon, params.padding_time_step_s),
            params,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Load the trajectory file at `path`, replacing the current trajectory.
    pub fn load_trajectory<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadSummary, LoadError> {
        self.store.load(path)
    }

    /// Load a trajectory from a reader, replacing the current trajectory.
    pub fn load_trajectory_from_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> Result<LoadSummary, LoadError> {
        self.store.load_from_reader(reader)
    }

    pub fn store(&self) -> &TrajectoryStore {
        &self.store
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Find the trajectory point nearest to `pose` and build the horizon from it.
    pub fn plan(&self, pose: &Pose) -> Result<Horizon, PlanError> {
        if !self.store.is_usable() {
            return Err(PlanError::NoTrajectory {
                num_points: self.store.len(),
            });
        }

        let matched_index = locate(pose.planar_position(), self.store.points()).ok_or(
            PlanError::NoTrajectory {
                num_points: self.store.len(),
            },
        )?;

        Ok(self.builder.build(matched_index, self.store.points()))
    }
}
