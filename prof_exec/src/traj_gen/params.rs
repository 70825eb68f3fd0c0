//! Trajectory generator parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::TrajGenError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest accepted jerk window ratio.
pub const MAX_JERK_WINDOW_RATIO: f64 = 10.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory generation.
///
/// Any parameter missing from a parameter file takes its default value.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Length of the jerk (second) filter window as a fraction of the
    /// acceleration (first) filter window.
    ///
    /// Zero disables jerk limiting, larger values give smoother but longer
    /// trajectories.
    pub jerk_window_ratio: f64,

    /// Maximum number of times generation is repeated with wider look-ahead
    /// margins when the generated samples break a limit.
    pub max_retries: usize,

    /// Tolerance used when checking samples against limits.
    ///
    /// Units: feet/second for velocities, feet/second^2 for accelerations
    pub tolerance: f64,

    /// Largest number of samples a single trajectory may need. Generation
    /// fails rather than exceed it.
    pub max_samples: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            jerk_window_ratio: 0.5,
            max_retries: 3,
            tolerance: 1e-6,
            max_samples: 10_000_000,
        }
    }
}

impl Params {
    /// Check that the parameters are usable.
    pub fn validate(&self) -> Result<(), TrajGenError> {
        if !(self.jerk_window_ratio >= 0.0 && self.jerk_window_ratio <= MAX_JERK_WINDOW_RATIO) {
            return Err(TrajGenError::InvalidParams(format!(
                "jerk_window_ratio must be between 0 and {}, found {}",
                MAX_JERK_WINDOW_RATIO, self.jerk_window_ratio
            )));
        }

        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(TrajGenError::InvalidParams(format!(
                "tolerance must be finite and non-negative, found {}",
                self.tolerance
            )));
        }

        if self.max_samples == 0 {
            return Err(TrajGenError::InvalidParams(String::from(
                "max_samples must be at least 1",
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let params: Params = toml::from_str("max_retries = 7").unwrap();

        assert_eq!(params.max_retries, 7);
        assert_eq!(params.jerk_window_ratio, 0.5);
        assert_eq!(params.tolerance, 1e-6);
        assert_eq!(params.max_samples, 10_000_000);
    }

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let bad_ratio = Params {
            jerk_window_ratio: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_ratio.validate(),
            Err(TrajGenError::InvalidParams(_))
        ));

        let bad_tol = Params {
            tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());

        let huge_ratio = Params {
            jerk_window_ratio: 1e12,
            ..Default::default()
        };
        assert!(matches!(
            huge_ratio.validate(),
            Err(TrajGenError::InvalidParams(_))
        ));

        let max_ratio = Params {
            jerk_window_ratio: MAX_JERK_WINDOW_RATIO,
            ..Default::default()
        };
        assert!(max_ratio.validate().is_ok());

        let no_samples = Params {
            max_samples: 0,
            ..Default::default()
        };
        assert!(no_samples.validate().is_err());
    }
}
