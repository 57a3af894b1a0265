// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

use thiserror::Error;

/// Errors reported when a [`Waterfall`](crate::Waterfall) is configured.
///
/// Construction is the only fallible step. Every other operation is total.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WaterfallError {
    /// `num_columns` was zero.
    #[error("a waterfall layout needs at least one column")]
    ZeroColumns,
    /// The end-reached threshold was negative or not finite.
    #[error("end-reached threshold must be finite and non-negative; got {0}")]
    InvalidThreshold(f64),
    /// The gap was negative or not finite.
    #[error("gap must be finite and non-negative; got {0}")]
    InvalidGap(f64),
}
