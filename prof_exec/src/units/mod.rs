//! # Kinematic unit types
//!
//! Every kinematic quantity passed between the path, drive and trajectory
//! modules is wrapped in one of these value types. Each type binds a plain
//! `f64` to a single unit so that, for example, a chassis velocity in feet per
//! second can never be added to a motor velocity in RPM.
//!
//! Arithmetic is only provided between values of the same type (plus scaling
//! by a bare `f64`). Moving between chassis and motor units is done with the
//! explicit `from_chassis`/`to_chassis` style functions, which take the
//! drive's motor rotations per foot of chassis movement.

// ---------------------------------------------------------------------------
// MACROS
// ---------------------------------------------------------------------------

/// Declare a unit wrapper type.
///
/// The generated type is `Copy`, ordered, serialised transparently as its
/// inner value and supports same-unit addition and subtraction as well as
/// scaling by an `f64`. Dividing two values of the same unit gives their
/// dimensionless ratio.
macro_rules! unit_type {
    ($(#[$meta:meta])* $name:ident, $getter:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, PartialOrd,
            serde::Serialize, serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Zero in this unit.
            pub const ZERO: Self = Self(0.0);

            #[doc = concat!("Create a new value in ", $unit, ".")]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            #[doc = concat!("Get the value in ", $unit, ".")]
            pub fn $getter(&self) -> f64 {
                self.0
            }

            /// Return the absolute value.
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Return the smaller of two values.
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Return the larger of two values.
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// True if the inner value is neither infinite nor NaN.
            pub fn is_finite(&self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl std::ops::Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl std::ops::Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl std::ops::Div<f64> for $name {
            type Output = Self;

            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl std::ops::Div for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit)
            }
        }
    };
}

pub(crate) use unit_type;

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod chassis;
mod motor;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use chassis::*;
pub use motor::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of seconds in a minute, used for RPM conversions.
pub const SECONDS_PER_MINUTE: f64 = 60.0;
