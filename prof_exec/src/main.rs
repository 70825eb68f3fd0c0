//! Main motion profile executable entry point.
//!
//! # Architecture
//!
//! The executable demonstrates a complete move of a tank drive chassis:
//!
//!     - Initialise the session and logging
//!     - Load the trajectory generator parameters
//!     - Build the chassis and its drive system
//!     - Plan a turning move, generating a trajectory for each side
//!     - Archive both trajectories as CSV and save a summary of the move
//!
//! The software root is given by the `PROF_SW_ROOT` environment variable, the
//! parameters are loaded from `$PROF_SW_ROOT/params` and the session is
//! created in `$PROF_SW_ROOT/sessions`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use serde::Serialize;

// Internal
use prof_lib::{
    drive::{Chassis, DriveParams, DriveSystem, TankDrive},
    traj_gen::{Params, TrajGen, Trajectory, TrajectorySummary},
    units::{
        ChassisAcceleration, ChassisTurnRate, ChassisVelocity, MotorAcceleration, MotorVelocity,
    },
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the demonstration chassis
const CHASSIS_NAME: &str = "Johnny5";

/// Units: RPM
const MAX_MOTOR_VELOCITY_RPM: f64 = 4250.0;

/// Units: RPM/second
const MAX_MOTOR_ACCELERATION_RPMS: f64 = 5100.0;

/// Units: rotations/foot
const MOTOR_ROT_PER_FT: f64 = 8.5;

/// Units: milliseconds
const ITERATION_PERIOD_MS: u32 = 10;

/// Units: feet
const DRIVE_WIDTH_FT: f64 = 2.75;

/// Units: feet
const MOVE_DISTANCE_FT: f64 = 45.0;

/// Units: degrees/foot
const MOVE_TURN_RATE_DEG_PER_FT: f64 = 5.0;

/// Units: feet/second
const MOVE_VELOCITY_FPS: f64 = 3.0;

/// Units: feet/second^2
const MOVE_ACCELERATION_FPSS: f64 = 2.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of the demonstration move, saved into the session.
#[derive(Serialize)]
struct MoveSummary {
    drive: DriveParams,
    drive_width_ft: f64,
    traj_gen: Params,
    left: SideSummary,
    right: SideSummary,
}

#[derive(Serialize)]
struct SideSummary {
    trajectory: TrajectorySummary,
    max_motor_velocity: MotorVelocity,
    max_motor_acceleration: MotorAcceleration,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("prof_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Motion Profile Executable\n");
    info!("Running on: {}", host::get_platform());
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: Params =
        util::params::load("traj_gen.toml").wrap_err("Could not load trajectory generator params")?;
    let traj_gen = TrajGen::new(params).wrap_err("Invalid trajectory generator params")?;

    info!("Exec parameters loaded");

    // ---- BUILD CHASSIS ----

    let drive = TankDrive::new(
        DriveParams::from_motor_limits(
            CHASSIS_NAME,
            MotorVelocity::new(MAX_MOTOR_VELOCITY_RPM),
            MotorAcceleration::new(MAX_MOTOR_ACCELERATION_RPMS),
            MOTOR_ROT_PER_FT,
            ITERATION_PERIOD_MS,
        ),
        DRIVE_WIDTH_FT,
    )
    .wrap_err("Invalid drive system")?;

    let velocity = ChassisVelocity::new(MOVE_VELOCITY_FPS);
    let acceleration = ChassisAcceleration::new(MOVE_ACCELERATION_FPSS);
    let turn_rate = ChassisTurnRate::new(MOVE_TURN_RATE_DEG_PER_FT);
    let (left_cruise, right_cruise) = drive.side_motor_velocities(velocity, turn_rate);
    info!(
        "Nominal cruise motor velocities: left {}, right {}",
        left_cruise, right_cruise
    );

    let drive_params = drive.params().clone();
    let chassis = Chassis::new(drive);
    info!("Chassis: {:#?}", chassis);

    // ---- PLAN MOVE ----

    info!(
        "Planning move of {} ft at {}, {} with {}",
        MOVE_DISTANCE_FT, turn_rate, velocity, acceleration
    );

    let plan = chassis
        .move_by(
            MOVE_DISTANCE_FT,
            turn_rate,
            velocity,
            acceleration,
            &traj_gen,
        )
        .wrap_err("Failed to plan the move")?;

    // ---- ARCHIVE ----

    let left = archive_side(&session, &chassis, "left", &plan.left)?;
    let right = archive_side(&session, &chassis, "right", &plan.right)?;

    session.save(
        "summary.json",
        MoveSummary {
            drive: drive_params,
            drive_width_ft: DRIVE_WIDTH_FT,
            traj_gen: traj_gen.params().clone(),
            left,
            right,
        },
    );

    info!("End of execution");
    session.exit();

    Ok(())
}

/// Log and archive the trajectory of one side of the chassis.
fn archive_side(
    session: &Session,
    chassis: &Chassis,
    side: &str,
    traj: &Trajectory,
) -> Result<SideSummary, Report> {
    let diag = traj.diagnostics();
    let rpf = chassis.drive().motor_rot_per_movement_foot();

    info!(
        "{} side: {:.3} ft in {:.2} s, {} samples, peak {} ({})",
        side,
        traj.distance(),
        traj.duration_s(),
        diag.n_count,
        traj.max_velocity(),
        MotorVelocity::from_chassis(traj.max_velocity(), rpf)
    );
    info!(
        "    FL1 {}, FL2 {}, T1 {} ms, T2 {} ms, T4 {} ms, ItP {:.3} ms",
        diag.fl1_count, diag.fl2_count, diag.t1_ms, diag.t2_ms, diag.t4_ms, diag.itp_ms
    );
    if traj.is_degraded() {
        warn!(
            "{} side trajectory had {} samples clamped after {} retries",
            side,
            diag.violations.len(),
            diag.retries
        );
    }

    let mut arch = Archiver::from_path(session, format!("{}-{}.csv", chassis.name(), side))
        .map_err(|e| eyre!("Cannot create the {} side archive: {}", side, e))?;
    arch.serialise_all(traj.iter())
        .map_err(|e| eyre!("Cannot archive the {} side trajectory: {}", side, e))?;

    Ok(SideSummary {
        trajectory: traj.summary(),
        max_motor_velocity: MotorVelocity::from_chassis(traj.max_velocity(), rpf),
        max_motor_acceleration: MotorAcceleration::from_chassis(traj.max_acceleration(), rpf),
    })
}
