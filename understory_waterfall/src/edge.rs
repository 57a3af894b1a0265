// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-edge detection for "load more" pagination.
//!
//! [`is_near_bottom`] and [`has_left_bottom`] are pure predicates over a
//! [`ScrollGeometry`] snapshot. [`EdgeState`] turns them into an
//! edge-triggered signal: [`EdgeState::on_scroll`] emits [`EndReached`] once
//! per approach to the bottom and stays quiet until the view has left the
//! bottom zone again.
//!
//! ```rust
//! use understory_waterfall::{EdgeState, ScrollGeometry};
//!
//! let state = EdgeState::Idle;
//! let at_bottom = ScrollGeometry::new(100.0_f32, 900.0, 1000.0);
//!
//! let (state, signal) = state.on_scroll(&at_bottom, 0.1);
//! assert!(signal.is_some());
//!
//! // Still at the bottom: suppressed.
//! let (_, signal) = state.on_scroll(&at_bottom, 0.1);
//! assert!(signal.is_none());
//! ```

use crate::Scalar;

/// Offsets at or below this many units from the top never count as near the bottom.
pub const NEAR_TOP_GUARD: usize = 20;

/// Snapshot of scroll geometry along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollGeometry<S: Scalar> {
    /// Extent of the viewport.
    pub visible_length: S,
    /// Current scroll position, measured from the top of the content.
    pub offset: S,
    /// Total scrollable extent of the content.
    pub content_length: S,
}

impl<S: Scalar> ScrollGeometry<S> {
    /// Creates a geometry snapshot.
    #[must_use]
    pub const fn new(visible_length: S, offset: S, content_length: S) -> Self {
        Self {
            visible_length,
            offset,
            content_length,
        }
    }

    /// Distance between the bottom of the viewport and the end of the content.
    ///
    /// Negative while overscrolled past the end.
    #[must_use]
    pub fn distance_from_end(&self) -> S {
        self.content_length - (self.visible_length + self.offset)
    }
}

#[cfg(feature = "kurbo")]
impl ScrollGeometry<f64> {
    /// Builds a vertical scroll geometry from Kurbo types.
    ///
    /// Uses the heights of `viewport` and `content` and the `y` component of `offset`.
    #[must_use]
    pub fn from_kurbo(viewport: kurbo::Size, offset: kurbo::Vec2, content: kurbo::Size) -> Self {
        Self::new(viewport.height, offset.y, content.height)
    }
}

/// Returns `true` if `geometry` is close enough to the end to request more items.
///
/// Content that fits in the viewport has no bottom, and offsets within
/// [`NEAR_TOP_GUARD`] of the top are ignored. Otherwise the test is
/// `visible_length + offset >= content_length * threshold`.
#[must_use]
pub fn is_near_bottom<S: Scalar>(geometry: &ScrollGeometry<S>, threshold: S) -> bool {
    if geometry.visible_length >= geometry.content_length
        || geometry.offset <= S::from_usize(NEAR_TOP_GUARD)
    {
        return false;
    }
    geometry.visible_length + geometry.offset >= geometry.content_length * threshold
}

/// Returns `true` if the viewport has moved out of the bottom zone.
///
/// The zone is `threshold * visible_length` units tall at the end of the content.
#[must_use]
pub fn has_left_bottom<S: Scalar>(geometry: &ScrollGeometry<S>, threshold: S) -> bool {
    geometry.visible_length + geometry.offset
        < geometry.content_length - threshold * geometry.visible_length
}

/// Signal emitted when the view reaches the end of the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndReached<S: Scalar> {
    /// See [`ScrollGeometry::distance_from_end`].
    pub distance_from_end: S,
    /// The geometry that produced the signal.
    pub geometry: ScrollGeometry<S>,
}

/// Pagination trigger state for the current approach to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeState {
    /// No pagination request is pending for this approach.
    #[default]
    Idle,
    /// A request already fired; wait until the view leaves the bottom zone.
    Triggered,
}

impl EdgeState {
    /// Returns `true` if a signal already fired for the current approach.
    #[must_use]
    pub const fn is_triggered(self) -> bool {
        matches!(self, Self::Triggered)
    }

    /// Advances the state for one scroll event.
    ///
    /// Leaving the bottom zone resets to [`EdgeState::Idle`]. From `Idle`, a
    /// near-bottom geometry emits [`EndReached`] and moves to
    /// [`EdgeState::Triggered`]; from `Triggered` nothing is emitted.
    #[must_use]
    pub fn on_scroll<S: Scalar>(
        self,
        geometry: &ScrollGeometry<S>,
        threshold: S,
    ) -> (Self, Option<EndReached<S>>) {
        let state = if has_left_bottom(geometry, threshold) {
            Self::Idle
        } else {
            self
        };
        match state {
            Self::Idle if is_near_bottom(geometry, threshold) => (
                Self::Triggered,
                Some(EndReached {
                    distance_from_end: geometry.distance_from_end(),
                    geometry: *geometry,
                }),
            ),
            _ => (state, None),
        }
    }
}

/// Edge-triggered end-of-content detector with a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector<S: Scalar> {
    threshold: S,
    state: EdgeState,
}

impl<S: Scalar> EdgeDetector<S> {
    /// Creates an idle detector. `threshold` is a fraction of the content length.
    #[must_use]
    pub fn new(threshold: S) -> Self {
        Self {
            threshold,
            state: EdgeState::Idle,
        }
    }

    /// The threshold fraction.
    #[must_use]
    pub const fn threshold(&self) -> S {
        self.threshold
    }

    /// Current trigger state.
    #[must_use]
    pub const fn state(&self) -> EdgeState {
        self.state
    }

    /// Feeds one scroll event, returning a signal at most once per approach.
    pub fn on_scroll(&mut self, geometry: &ScrollGeometry<S>) -> Option<EndReached<S>> {
        let (state, signal) = self.state.on_scroll(geometry, self.threshold);
        #[cfg(feature = "tracing")]
        if self.state.is_triggered() && !state.is_triggered() {
            tracing::trace!("left bottom zone, pagination re-armed");
        }
        self.state = state;
        signal
    }

    /// Forces the detector back to [`EdgeState::Idle`].
    pub fn reset(&mut self) {
        self.state = EdgeState::Idle;
    }
}
