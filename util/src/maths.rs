//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Limit a value to the range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Round a value up to the next integer, ignoring any excess over an integer
/// which is no larger than `tol`.
///
/// This stops values which should be exact integers but carry floating point
/// noise, for example `100.00000000000001`, from being rounded up.
pub fn ceil_tol<T>(value: T, tol: T) -> T
where
    T: Float
{
    (value - tol).ceil()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5.0, &-1.0, &1.0), 1.0);
        assert_eq!(clamp(&-5.0, &-1.0, &1.0), -1.0);
        assert_eq!(clamp(&0.5f32, &-1.0, &1.0), 0.5);
    }

    #[test]
    fn test_ceil_tol() {
        assert_eq!(ceil_tol(100.00000000000001, 1e-9), 100.0);
        assert_eq!(ceil_tol(100.1, 1e-9), 101.0);
        assert_eq!(ceil_tol(62.5, 1e-9), 63.0);
        assert_eq!(ceil_tol(0.0, 1e-9), 0.0);
    }
}
