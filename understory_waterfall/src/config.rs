// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for a [`Waterfall`](crate::Waterfall).

use core::num::NonZeroUsize;

use crate::{Scalar, WaterfallError};

/// Options recognized by a [`Waterfall`](crate::Waterfall).
///
/// The column count is fixed for the lifetime of one layout; changing it
/// means building a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaterfallConfig<S: Scalar> {
    /// Number of columns. Must be non-zero.
    pub num_columns: usize,
    /// Spacing between columns and below items. Only affects edge insets.
    pub gap: S,
    /// Fraction of the content length used by the end-reached check.
    pub end_reached_threshold: S,
    /// Caller-driven loading flag; keeps columns rendered while empty.
    pub loading: bool,
    /// Whether newly appended items get an entrance transition.
    pub enable_fade_in: bool,
}

impl<S: Scalar> Default for WaterfallConfig<S> {
    fn default() -> Self {
        Self {
            num_columns: 2,
            gap: S::from_usize(5),
            end_reached_threshold: S::from_usize(1) / S::from_usize(10),
            loading: false,
            enable_fade_in: false,
        }
    }
}

impl<S: Scalar> WaterfallConfig<S> {
    /// Returns the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of columns.
    #[must_use]
    pub fn with_num_columns(mut self, num_columns: usize) -> Self {
        self.num_columns = num_columns;
        self
    }

    /// Sets the gap.
    #[must_use]
    pub fn with_gap(mut self, gap: S) -> Self {
        self.gap = gap;
        self
    }

    /// Sets the end-reached threshold.
    #[must_use]
    pub fn with_end_reached_threshold(mut self, threshold: S) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    /// Sets the loading flag.
    #[must_use]
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Enables or disables entrance transitions for new items.
    #[must_use]
    pub fn with_fade_in(mut self, enable: bool) -> Self {
        self.enable_fade_in = enable;
        self
    }

    /// Checks the configuration and returns the column count.
    pub fn validate(&self) -> Result<NonZeroUsize, WaterfallError> {
        let num_columns = NonZeroUsize::new(self.num_columns).ok_or(WaterfallError::ZeroColumns)?;
        if !self.end_reached_threshold.is_finite() || self.end_reached_threshold.is_sign_negative()
        {
            return Err(WaterfallError::InvalidThreshold(
                self.end_reached_threshold.to_f64(),
            ));
        }
        if !self.gap.is_finite() || self.gap.is_sign_negative() {
            return Err(WaterfallError::InvalidGap(self.gap.to_f64()));
        }
        Ok(num_columns)
    }
}
