// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy shortest-column assignment.

use core::hash::Hash;

use smallvec::SmallVec;

use crate::{Grid, Scalar};

/// Returns the index of the shortest column in `totals`.
///
/// Ties go to the lowest index. An empty slice yields `0`.
#[must_use]
pub fn shortest_column<S: Scalar>(totals: &[S]) -> usize {
    let mut best = 0;
    for (index, total) in totals.iter().enumerate().skip(1) {
        if *total < totals[best] {
            best = index;
        }
    }
    best
}

/// Running per-column height totals for one append batch.
///
/// Every [`place`](ColumnTotals::place) both picks a column and adds the
/// item's height to it, so each placement sees every item placed before it
/// in the same batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnTotals<S: Scalar> {
    totals: SmallVec<[S; 4]>,
}

impl<S: Scalar> ColumnTotals<S> {
    /// Creates totals from explicit per-column values.
    pub fn from_totals(totals: impl IntoIterator<Item = S>) -> Self {
        Self {
            totals: totals.into_iter().collect(),
        }
    }

    /// Seeds totals from the current contents of `grid`.
    pub fn seeded<T, K, H>(grid: &Grid<T, K>, height_of: H) -> Self
    where
        K: Hash + Eq + Clone,
        H: Fn(&T) -> S,
    {
        Self::from_totals((0..grid.num_columns()).map(|c| grid.column_total(c, &height_of)))
    }

    /// Assigns an item of `height` to the shortest column and returns that column.
    pub fn place(&mut self, height: S) -> usize {
        let column = shortest_column(&self.totals);
        if let Some(total) = self.totals.get_mut(column) {
            *total += height;
        }
        column
    }

    /// Current totals, one per column.
    #[must_use]
    pub fn as_slice(&self) -> &[S] {
        &self.totals
    }
}
