//! # Trajectory generation module
//!
//! Trajectory generation turns a [`Path`] into a [`Trajectory`]: a sequence of
//! velocity samples, one per control tick of the drive system, which moves the
//! chassis along the path without breaking any velocity or acceleration
//! limit.
//!
//! The profile is shaped by two moving-sum filters in series. The input to the
//! first filter is a rectangular velocity demand built by walking along the
//! path. The first filter (window `FL1` ticks) turns each step in the demand
//! into a constant-acceleration ramp, giving a trapezoidal profile. The second
//! filter (window `FL2` ticks) rounds the corners of the trapezoid, limiting
//! jerk.
//!
//! `FL1` is chosen so that the steepest ramp the first filter can produce, a
//! step from rest to the top velocity, stays within the acceleration limit.
//! `FL2` is a fraction of `FL1` set by [`Params::jerk_window_ratio`].
//!
//! [`Path`]: crate::path::Path

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod demand;
mod filter;
mod params;
mod state;
mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;
pub use trajectory::*;

use crate::{
    drive::{DriveError, DriveSystem},
    path::{Path, PathError},
};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Errors which can occur while generating a trajectory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrajGenError {
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Invalid drive system: {0}")]
    InvalidDriveSystem(#[from] DriveError),

    #[error("Invalid trajectory generator parameters: {0}")]
    InvalidParams(String),

    #[error("The trajectory would need up to {estimate} samples, more than the limit of {limit}")]
    TooManySamples { estimate: f64, limit: usize },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate a trajectory with the default generator parameters.
pub fn generate<D: DriveSystem + ?Sized>(
    path: &Path,
    drive: &D,
) -> Result<Trajectory, TrajGenError> {
    TrajGen::default().generate(path, drive)
}
