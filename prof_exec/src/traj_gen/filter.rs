//! # Moving sum filter
//!
//! Both smoothing stages of the generator are the same filter: a running sum
//! over a fixed number of past samples. Each new sample is added to the sum
//! and the sample leaving the window is subtracted, so one pass costs the
//! same regardless of the window length. The filter output is the mean of the
//! window.
//!
//! Because the output is a mean, a step change at the input becomes a ramp at
//! the output lasting exactly one window, and the sum of all outputs equals
//! the sum of all inputs once the window has been flushed with zeros.
//!
//! The `fl1_count` and `fl2_count` diagnostics are therefore window lengths in
//! ticks, not the convergence counts of an exponential smoother.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A running sum over the last `len` samples.
#[derive(Clone, Debug)]
pub(crate) struct MovingSum {
    window: VecDeque<f64>,
    len: usize,
    sum: f64,

    /// Number of non-zero samples currently in the window, used to snap the
    /// sum back to exactly zero once the window has emptied.
    num_nonzero: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MovingSum {
    /// Create a new filter with the given window length.
    ///
    /// A zero length is treated as a length of one (no filtering).
    pub fn new(len: usize) -> Self {
        let len = len.max(1);

        Self {
            window: VecDeque::from(vec![0.0; len]),
            len,
            sum: 0.0,
            num_nonzero: 0,
        }
    }

    /// Pass a new sample through the filter, returning the new output.
    pub fn push(&mut self, sample: f64) -> f64 {
        if let Some(leaving) = self.window.pop_front() {
            self.sum -= leaving;
            if leaving != 0.0 {
                self.num_nonzero -= 1;
            }
        }

        self.window.push_back(sample);
        self.sum += sample;
        if sample != 0.0 {
            self.num_nonzero += 1;
        }

        // Rounding in the running sum must not leave a residual at rest
        if self.num_nonzero == 0 {
            self.sum = 0.0;
        }

        self.output()
    }

    /// The current sum of the window.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// The current output (mean of the window).
    pub fn output(&self) -> f64 {
        self.sum / self.len as f64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_becomes_ramp() {
        let mut f = MovingSum::new(4);

        let out: Vec<f64> = (0..6).map(|_| f.push(1.0)).collect();
        assert_eq!(out, vec![0.25, 0.5, 0.75, 1.0, 1.0, 1.0]);
        assert_eq!(f.sum(), 4.0);

        let out: Vec<f64> = (0..5).map(|_| f.push(0.0)).collect();
        assert_eq!(out, vec![0.75, 0.5, 0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_sum_is_conserved() {
        let input = [0.3, 1.7, 2.2, 0.1, 5.0, 4.9];
        let mut f = MovingSum::new(3);

        let mut total_out: f64 = input.iter().map(|&x| f.push(x)).sum();
        total_out += (0..3).map(|_| f.push(0.0)).sum::<f64>();

        let total_in: f64 = input.iter().sum();
        assert!((total_out - total_in).abs() < 1e-12);

        // Back at rest the sum is exactly zero
        assert_eq!(f.sum(), 0.0);
    }

    #[test]
    fn test_zero_length_is_passthrough() {
        let mut f = MovingSum::new(0);

        assert_eq!(f.push(2.5), 2.5);
        assert_eq!(f.push(1.0), 1.0);
    }
}
