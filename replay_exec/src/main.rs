//! Replay planner executable entry point.
//!
//! # Architecture
//!
//! The executable consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Initialise the replay planner, loading the recorded trajectory
//!     - Main loop:
//!         - Receive the current pose from localisation
//!         - Plan the horizon from the nearest trajectory point
//!         - Publish the horizon as a lane
//!         - Write the archives
//!
//! A cycle is only run when a pose is received. If no trajectory is loaded every cycle fails and
//! nothing is published.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use comms_if::net::{zmq, NetParams};
use replay_lib::{
    loc::Pose,
    pose_client::PoseClient,
    replay::{Params, ReplayPlanner},
    traj_server::{lane_from_horizon, TrajServer},
};
use util::{
    archive::Archived,
    host,
    logger::{level_from_verbosity, logger_init},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Replays a recorded trajectory from the current pose of the vehicle.
#[derive(Debug, StructOpt)]
#[structopt(name = "replay_exec")]
struct Opts {
    /// Trajectory file to replay, overrides `trajectory_path` in the parameter file.
    #[structopt(short, long, parse(from_os_str))]
    trajectory: Option<PathBuf>,

    /// Parameter file, relative to the `params` directory of the software root.
    #[structopt(short, long, default_value = "replay_exec.toml")]
    params: String,

    /// Increase the log verbosity (-v for debug, -vv for trace).
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Stop after this many planning cycles.
    #[structopt(long)]
    max_cycles: Option<u64>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("replay_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(level_from_verbosity(opts.verbose), &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("RTK Replay Planner\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    let mut params: Params =
        util::params::load(&opts.params).wrap_err("Could not load replay params")?;

    if let Some(path) = opts.trajectory {
        info!("Trajectory overridden from the command line: {:?}", path);
        params.trajectory_path = path;
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut planner = ReplayPlanner::default();
    planner
        .init(params, &session)
        .wrap_err("Failed to initialise the replay planner")?;

    info!(
        "Replay planner initialised with {} trajectory points",
        planner.store().len()
    );

    // ---- INITIALISE NETWORK ----

    let zmq_ctx = zmq::Context::new();

    let mut pose_client =
        PoseClient::new(&zmq_ctx, &net_params).wrap_err("Failed to create the pose client")?;
    let mut traj_server = TrajServer::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to create the trajectory server")?;

    info!("Network initialised, waiting for poses on {}", net_params.pose_endpoint);

    // ---- MAIN LOOP ----

    let mut num_cycles: u64 = 0;
    let mut pose_connected = false;

    loop {
        // Report changes in the localisation connection
        if pose_client.is_connected() != pose_connected {
            pose_connected = !pose_connected;
            match pose_connected {
                true => info!("Connected to localisation"),
                false => warn!("Lost connection to localisation"),
            }
        }

        // Get the current pose
        let pose: Pose = match pose_client.receive_pose() {
            Ok(Some(p)) => p.into(),
            Ok(None) => continue,
            Err(e) => {
                warn!("Could not receive the current pose: {}", e);
                continue;
            }
        };

        num_cycles += 1;

        match planner.proc(&pose) {
            Ok((horizon, _)) => {
                let lane = lane_from_horizon(&horizon, Utc::now());

                match traj_server.send(&lane) {
                    Ok(()) if traj_server.num_subscribers() == 0 => {
                        debug!("Lane published with no connected subscribers")
                    }
                    Ok(()) => (),
                    Err(e) => error!("Could not publish the lane: {}", e),
                }
            }
            Err(e) => warn!("No lane published: {}", e),
        }

        if let Err(e) = planner.write() {
            warn!("Could not write the replay archives: {}", e);
        }

        if let Some(max) = opts.max_cycles {
            if num_cycles >= max {
                info!("Reached {} cycles, stopping", max);
                break;
            }
        }
    }

    info!("End of execution");

    Ok(())
}
