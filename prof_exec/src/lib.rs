//! # Motion profile library.
//!
//! This library generates smooth, limit respecting motion profiles for
//! wheeled drive systems, and allows other crates in the workspace to access
//! the items defined inside the profile crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drive systems - the motors moving the chassis and the limits they impose
pub mod drive;

/// Paths - ordered points with motion limits that trajectories follow
pub mod path;

/// Trajectory generation - converts a path into a time-indexed trajectory
pub mod traj_gen;

/// Unit types - chassis and motor kinematic quantities
pub mod units;
