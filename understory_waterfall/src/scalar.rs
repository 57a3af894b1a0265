// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction for heights, offsets, and scroll positions.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, Mul, Sub};

/// Numeric type used for item heights, column totals, and scroll geometry.
///
/// Implemented for `f32` and `f64`. All values are expected to be finite;
/// negative heights are clamped to zero where they enter the layout.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialOrd
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// Converts an index or count into this scalar type.
    fn from_usize(value: usize) -> Self;

    /// Widens to `f64` for diagnostics and error reporting.
    fn to_f64(self) -> f64;

    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Returns `true` if the sign bit is set (including `-0.0`).
    fn is_sign_negative(self) -> bool;

    /// Returns the larger of `self` and `other`.
    #[must_use]
    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Returns the smaller of `self` and `other`.
    #[must_use]
    fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }
}

macro_rules! impl_scalar {
    ($ty:ty) => {
        impl Scalar for $ty {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            #[allow(
                clippy::cast_precision_loss,
                reason = "Counts beyond the mantissa range are not meaningful layout inputs"
            )]
            fn from_usize(value: usize) -> Self {
                value as $ty
            }

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$ty>::is_sign_negative(self)
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn min_max_pick_expected_side() {
        assert_eq!(Scalar::max(3.0_f32, 5.0), 5.0);
        assert_eq!(Scalar::min(3.0_f64, 5.0), 3.0);
        assert_eq!(<f64 as Scalar>::from_usize(7), 7.0);
    }

    #[test]
    fn sign_and_finiteness() {
        assert!(Scalar::is_sign_negative(-1.0_f32));
        assert!(!Scalar::is_finite(f64::NAN));
        assert!(Scalar::is_finite(0.0_f64));
    }
}
