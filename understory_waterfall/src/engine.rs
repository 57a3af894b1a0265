// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Waterfall`] controller: grid, edge detection, and presentation bookkeeping.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt;
use core::mem;
use core::num::NonZeroUsize;

use smallvec::SmallVec;

use crate::{
    ColumnInsets, EdgeDetector, EdgeState, EndReached, Grid, ItemKey, ItemLayout, ItemPosition,
    Scalar, ScrollGeometry, WaterfallConfig, WaterfallError, WaterfallItem, column_insets,
    default_key, height_of, item_layout,
};

/// Identity function: receives an item and its submission position.
pub type KeyExtractor<T> = Box<dyn Fn(&T, usize) -> ItemKey>;

/// A request for the host to move its scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest<S> {
    /// Target offset from the top of the content.
    pub offset: S,
    /// Whether the host should animate the move.
    pub animated: bool,
}

/// Masonry layout controller.
///
/// Owns the current [`Grid`] and [`EdgeDetector`]. All operations are
/// synchronous: a read after [`add_items`](Self::add_items),
/// [`mutate_item`](Self::mutate_item), or [`remove_item`](Self::remove_item)
/// observes the update.
pub struct Waterfall<T: WaterfallItem> {
    config: WaterfallConfig<T::Scalar>,
    num_columns: NonZeroUsize,
    grid: Grid<T>,
    edge: EdgeDetector<T::Scalar>,
    previous_lengths: SmallVec<[usize; 4]>,
    key_extractor: Option<KeyExtractor<T>>,
}

impl<T: WaterfallItem + fmt::Debug> fmt::Debug for Waterfall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waterfall")
            .field("config", &self.config)
            .field("num_columns", &self.num_columns)
            .field("grid", &self.grid)
            .field("edge", &self.edge)
            .field("previous_lengths", &self.previous_lengths)
            .field("key_extractor", &self.key_extractor.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl<T: WaterfallItem> Waterfall<T> {
    /// Creates an empty layout using the default identity resolution
    /// ([`default_key`]).
    pub fn new(config: WaterfallConfig<T::Scalar>) -> Result<Self, WaterfallError> {
        let num_columns = config.validate()?;
        Ok(Self {
            config,
            num_columns,
            grid: Grid::new(num_columns),
            edge: EdgeDetector::new(config.end_reached_threshold),
            previous_lengths: SmallVec::from_elem(0, num_columns.get()),
            key_extractor: None,
        })
    }

    /// Creates an empty layout that identifies items with `key_extractor`.
    ///
    /// The extractor receives each item and its submission position since the
    /// last [`clear`](Self::clear).
    pub fn with_key_extractor(
        config: WaterfallConfig<T::Scalar>,
        key_extractor: impl Fn(&T, usize) -> ItemKey + 'static,
    ) -> Result<Self, WaterfallError> {
        let mut waterfall = Self::new(config)?;
        waterfall.key_extractor = Some(Box::new(key_extractor));
        Ok(waterfall)
    }

    /// Runs one grid transition.
    fn transition<R>(&mut self, f: impl FnOnce(Grid<T>) -> (Grid<T>, R)) -> R {
        let grid = mem::replace(&mut self.grid, Grid::vacant(self.num_columns));
        let (grid, result) = f(grid);
        self.grid = grid;
        result
    }

    /// Appends a batch of items, each to the currently shortest column.
    ///
    /// Items whose identity is already present are dropped silently.
    pub fn add_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.previous_lengths = self.grid.column_lengths().collect();
        let extractor = self.key_extractor.as_deref();
        #[cfg(feature = "tracing")]
        let (len_before, submitted_before) = (self.grid.len(), self.grid.submitted());

        let grid = mem::replace(&mut self.grid, Grid::vacant(self.num_columns));
        self.grid = grid.append_batch(items, height_of::<T>, |item, position| {
            resolve_key(extractor, item, position)
        });

        #[cfg(feature = "tracing")]
        {
            let submitted = self.grid.submitted() - submitted_before;
            let accepted = self.grid.len() - len_before;
            tracing::debug!(
                submitted,
                accepted,
                dropped = submitted - accepted,
                "appended waterfall batch"
            );
        }
    }

    /// Removes every item. The column count is unchanged.
    pub fn clear(&mut self) {
        self.transition(|grid| (grid.reset(), ()));
        self.previous_lengths = SmallVec::from_elem(0, self.num_columns.get());
        #[cfg(feature = "tracing")]
        tracing::debug!("cleared waterfall");
    }

    /// Replaces the first item matching `predicate` with `mutation(item)`.
    ///
    /// The replacement keeps the column and position of the original. Its
    /// identity is re-derived the same way [`add_items`](Self::add_items) does.
    ///
    /// Returns `false` if nothing matched, or if the replacement's identity
    /// belongs to another item; the layout is unchanged in both cases.
    pub fn mutate_item<P, M>(&mut self, predicate: P, mutation: M) -> bool
    where
        P: FnMut(&T) -> bool,
        M: FnOnce(&T) -> T,
    {
        let Some(position) = self.grid.find(predicate) else {
            return false;
        };
        let extractor = self.key_extractor.as_deref();
        let grid = mem::replace(&mut self.grid, Grid::vacant(self.num_columns));
        let (grid, committed) = grid.mutate_at(position, mutation, |item, ordinal| {
            resolve_key(extractor, item, ordinal)
        });
        self.grid = grid;
        #[cfg(feature = "tracing")]
        {
            if committed {
                tracing::debug!(column = position.column, index = position.index, "mutated item");
            } else {
                tracing::debug!(
                    column = position.column,
                    index = position.index,
                    "mutation dropped, identity already present"
                );
            }
        }
        committed
    }

    /// Removes the first item matching `predicate` and returns it.
    pub fn remove_item<P>(&mut self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let position = self.grid.find(predicate)?;
        let removed = self.transition(|grid| grid.remove_at(position));
        #[cfg(feature = "tracing")]
        tracing::debug!(column = position.column, index = position.index, "removed item");
        removed
    }

    /// Returns the position of the first item matching `predicate`.
    pub fn find_item<P>(&self, predicate: P) -> Option<ItemPosition>
    where
        P: FnMut(&T) -> bool,
    {
        self.grid.find(predicate)
    }

    /// Feeds a scroll event. Returns a signal at most once per approach to the bottom.
    pub fn on_scroll(
        &mut self,
        geometry: &ScrollGeometry<T::Scalar>,
    ) -> Option<EndReached<T::Scalar>> {
        let signal = self.edge.on_scroll(geometry);
        #[cfg(feature = "tracing")]
        if let Some(signal) = &signal {
            tracing::trace!(
                distance_from_end = signal.distance_from_end.to_f64(),
                "end reached"
            );
        }
        signal
    }

    /// Returns the request that scrolls the host back to the top.
    #[must_use]
    pub fn scroll_to_top(&self) -> ScrollRequest<T::Scalar> {
        ScrollRequest {
            offset: T::Scalar::zero(),
            animated: true,
        }
    }

    /// Layout of the item at `index` in `column`, for fixed-offset scrolling.
    #[must_use]
    pub fn item_layout(&self, column: usize, index: usize) -> Option<ItemLayout<T::Scalar>> {
        item_layout(self.grid.column(column), index, height_of::<T>)
    }

    /// Edge insets for `column`.
    #[must_use]
    pub fn column_insets(&self, column: usize) -> ColumnInsets<T::Scalar> {
        column_insets(column, self.num_columns.get(), self.config.gap)
    }

    /// Stable key for the outer per-column list.
    #[must_use]
    pub fn column_key(&self, column: usize) -> String {
        format!("waterfall-column-index-{column}")
    }

    /// The current grid.
    #[must_use]
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }

    /// Items of `column`, in insertion order.
    #[must_use]
    pub fn column(&self, column: usize) -> &[T] {
        self.grid.column(column)
    }

    /// Iterates over all columns in index order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.grid.columns()
    }

    /// Number of columns.
    #[must_use]
    pub const fn num_columns(&self) -> usize {
        self.num_columns.get()
    }

    /// Returns `true` if any column holds an item.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.grid.has_any_data()
    }

    /// Current pagination trigger state.
    #[must_use]
    pub const fn edge_state(&self) -> EdgeState {
        self.edge.state()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &WaterfallConfig<T::Scalar> {
        &self.config
    }

    /// Sets the caller-driven loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.config.loading = loading;
    }

    /// Returns the loading flag.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.config.loading
    }

    /// Enables or disables entrance transitions for new items.
    pub fn set_fade_in(&mut self, enable: bool) {
        self.config.enable_fade_in = enable;
    }

    /// Whether the host should render the columns at all.
    ///
    /// When this is `false` the host shows its empty placeholder instead.
    #[must_use]
    pub fn should_render_columns(&self) -> bool {
        self.has_data() || self.config.loading
    }

    /// Column lengths captured just before the most recent append.
    #[must_use]
    pub fn previous_lengths(&self) -> &[usize] {
        &self.previous_lengths
    }

    /// Returns `true` if the item at `column`/`index` arrived with the most recent append.
    #[must_use]
    pub fn is_new_item(&self, column: usize, index: usize) -> bool {
        let previous = self.previous_lengths.get(column).copied().unwrap_or(0);
        index >= previous && index < self.grid.column(column).len()
    }

    /// Stagger ordinal for the entrance transition of the item at `column`/`index`.
    ///
    /// New items count from 1 in the order they were appended to the column;
    /// older items report their index. `None` when entrance transitions are
    /// disabled or the position is empty.
    #[must_use]
    pub fn entrance_order(&self, column: usize, index: usize) -> Option<usize> {
        if !self.config.enable_fade_in || index >= self.grid.column(column).len() {
            return None;
        }
        let previous = self.previous_lengths.get(column).copied().unwrap_or(0);
        Some(if index >= previous {
            index + 1 - previous
        } else {
            index
        })
    }
}

fn resolve_key<T: WaterfallItem>(
    extractor: Option<&dyn Fn(&T, usize) -> ItemKey>,
    item: &T,
    position: usize,
) -> ItemKey {
    match extractor {
        Some(extract) => extract(item, position),
        None => default_key(item, position),
    }
}
