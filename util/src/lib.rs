//! Utility library for the motion profile software
//!
//! Provides the ambient services shared by every executable in the workspace:
//! sessions, logging, parameter loading and CSV archiving.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
