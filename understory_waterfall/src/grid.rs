// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-column item storage with identity-based deduplication.

use alloc::vec::Vec;
use core::hash::Hash;
use core::num::NonZeroUsize;

use hashbrown::HashSet;

use crate::{ColumnTotals, ItemKey, Scalar, fold_heights};

/// Location of an item within a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPosition {
    /// Column index in `0..num_columns`.
    pub column: usize,
    /// Index within the column.
    pub index: usize,
}

#[derive(Clone, Debug)]
struct Column<T, K> {
    items: Vec<T>,
    keys: Vec<K>,
    /// Submission position of each item, handed back to the identity function on re-keying.
    ordinals: Vec<usize>,
}

impl<T, K> Column<T, K> {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            keys: Vec::new(),
            ordinals: Vec::new(),
        }
    }
}

/// The authoritative per-column item sequences of a waterfall layout.
///
/// A grid always holds exactly `num_columns` columns. Every item carries an
/// identity of type `K`, derived when the item is appended and re-derived when
/// it is mutated, and identities are unique across all columns.
///
/// Updates are transitions: they consume the grid and return the next one.
/// Re-submitting an identity that is already present is a no-op for that item.
#[derive(Clone, Debug)]
pub struct Grid<T, K = ItemKey> {
    num_columns: NonZeroUsize,
    columns: Vec<Column<T, K>>,
    keys: HashSet<K>,
    submitted: usize,
}

impl<T, K: Hash + Eq + Clone> Grid<T, K> {
    /// Creates an empty grid with `num_columns` columns.
    #[must_use]
    pub fn new(num_columns: NonZeroUsize) -> Self {
        Self {
            num_columns,
            columns: (0..num_columns.get()).map(|_| Column::new()).collect(),
            keys: HashSet::new(),
            submitted: 0,
        }
    }

    /// Placeholder used while a transition owns the real grid. Holds no columns.
    pub(crate) fn vacant(num_columns: NonZeroUsize) -> Self {
        Self {
            num_columns,
            columns: Vec::new(),
            keys: HashSet::new(),
            submitted: 0,
        }
    }

    /// Returns an empty grid with the same number of columns.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::new(self.num_columns)
    }

    /// Number of columns.
    #[must_use]
    pub const fn num_columns(&self) -> usize {
        self.num_columns.get()
    }

    /// Number of items across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_any_data()
    }

    /// Returns `true` if any column holds at least one item.
    #[must_use]
    pub fn has_any_data(&self) -> bool {
        self.columns.iter().any(|c| !c.items.is_empty())
    }

    /// Number of items submitted through [`append_batch`](Self::append_batch)
    /// since this grid was created or reset, including dropped duplicates.
    ///
    /// This is the position handed to the next item's identity function.
    #[must_use]
    pub const fn submitted(&self) -> usize {
        self.submitted
    }

    /// Items of `column`, in insertion order. Out-of-range columns are empty.
    #[must_use]
    pub fn column(&self, column: usize) -> &[T] {
        self.columns
            .get(column)
            .map(|c| c.items.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over all columns in index order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.columns.iter().map(|c| c.items.as_slice())
    }

    /// Iterates over the length of each column.
    pub fn column_lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.columns.iter().map(|c| c.items.len())
    }

    /// Sum of item heights in `column`.
    pub fn column_total<S, H>(&self, column: usize, height_of: H) -> S
    where
        S: Scalar,
        H: Fn(&T) -> S,
    {
        fold_heights(self.column(column), height_of)
    }

    /// Returns `true` if an item with identity `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns the item at `position`, if any.
    #[must_use]
    pub fn get(&self, position: ItemPosition) -> Option<&T> {
        self.columns
            .get(position.column)
            .and_then(|c| c.items.get(position.index))
    }

    /// Returns the identity recorded for the item at `position`, if any.
    #[must_use]
    pub fn key_at(&self, position: ItemPosition) -> Option<&K> {
        self.columns
            .get(position.column)
            .and_then(|c| c.keys.get(position.index))
    }

    /// Iterates over every item with its position, column by column.
    pub fn positions(&self) -> impl Iterator<Item = (ItemPosition, &T)> + '_ {
        self.columns.iter().enumerate().flat_map(|(column, c)| {
            c.items
                .iter()
                .enumerate()
                .map(move |(index, item)| (ItemPosition { column, index }, item))
        })
    }

    /// Finds the first item matching `predicate`, scanning column by column.
    pub fn find<P>(&self, mut predicate: P) -> Option<ItemPosition>
    where
        P: FnMut(&T) -> bool,
    {
        self.positions()
            .find(|(_, item)| predicate(item))
            .map(|(position, _)| position)
    }

    /// Appends a batch of items, placing each into the shortest column.
    ///
    /// Column totals start from the current contents and are updated after
    /// each placement. Once the whole batch is placed, items are merged in
    /// batch order; an item whose identity is already present (in any column,
    /// or earlier in this batch) is dropped.
    ///
    /// `key_of` receives each item together with its submission position,
    /// counted across all batches since the grid was created or reset.
    #[must_use]
    pub fn append_batch<I, S, H, F>(mut self, items: I, height_of: H, mut key_of: F) -> Self
    where
        I: IntoIterator<Item = T>,
        S: Scalar,
        H: Fn(&T) -> S,
        F: FnMut(&T, usize) -> K,
    {
        let mut totals = ColumnTotals::seeded(&self, &height_of);
        let staged: Vec<(usize, usize, K, T)> = items
            .into_iter()
            .map(|item| {
                let column = totals.place(height_of(&item));
                let ordinal = self.submitted;
                let key = key_of(&item, ordinal);
                self.submitted += 1;
                (column, ordinal, key, item)
            })
            .collect();

        for (column, ordinal, key, item) in staged {
            if !self.keys.insert(key.clone()) {
                continue;
            }
            let column = &mut self.columns[column];
            column.items.push(item);
            column.keys.push(key);
            column.ordinals.push(ordinal);
        }
        self
    }

    /// Replaces the item at `position` with `mutation(item)`.
    ///
    /// The identity is re-derived from the replacement with `key_of`, which
    /// receives the item's original submission position. If the new identity
    /// belongs to a different item, the replacement is discarded.
    ///
    /// Returns the next grid and whether the replacement was committed.
    /// Out-of-range positions are a no-op.
    #[must_use]
    pub fn mutate_at<M, F>(
        mut self,
        position: ItemPosition,
        mutation: M,
        key_of: F,
    ) -> (Self, bool)
    where
        M: FnOnce(&T) -> T,
        F: FnOnce(&T, usize) -> K,
    {
        let Some(column) = self.columns.get_mut(position.column) else {
            return (self, false);
        };
        let Some(item) = column.items.get(position.index) else {
            return (self, false);
        };
        let replacement = mutation(item);
        let key = key_of(&replacement, column.ordinals[position.index]);
        let old_key = &column.keys[position.index];
        if key != *old_key {
            if self.keys.contains(&key) {
                return (self, false);
            }
            self.keys.remove(old_key);
            self.keys.insert(key.clone());
            column.keys[position.index] = key;
        }
        column.items[position.index] = replacement;
        (self, true)
    }

    /// Replaces the first item matching `predicate` with `mutation(item)`.
    ///
    /// At most one item changes; the grid is returned unchanged if nothing
    /// matches or the replacement's identity collides with another item.
    #[must_use]
    pub fn mutate<P, M, F>(self, predicate: P, mutation: M, key_of: F) -> Self
    where
        P: FnMut(&T) -> bool,
        M: FnOnce(&T) -> T,
        F: FnOnce(&T, usize) -> K,
    {
        match self.find(predicate) {
            Some(position) => self.mutate_at(position, mutation, key_of).0,
            None => self,
        }
    }

    /// Removes the item at `position`, shifting later items in its column up by one.
    ///
    /// Returns the next grid and the removed item, if the position was occupied.
    #[must_use]
    pub fn remove_at(mut self, position: ItemPosition) -> (Self, Option<T>) {
        let Some(column) = self.columns.get_mut(position.column) else {
            return (self, None);
        };
        if position.index >= column.items.len() {
            return (self, None);
        }
        let item = column.items.remove(position.index);
        let key = column.keys.remove(position.index);
        column.ordinals.remove(position.index);
        self.keys.remove(&key);
        (self, Some(item))
    }

    /// Removes the first item matching `predicate`. No-op if nothing matches.
    #[must_use]
    pub fn remove<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        match self.find(predicate) {
            Some(position) => self.remove_at(position).0,
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::NonZeroUsize;

    use super::{Grid, ItemPosition};

    #[derive(Clone, Debug, PartialEq)]
    struct Tile {
        id: u32,
        height: f32,
    }

    fn tile(id: u32, height: f32) -> Tile {
        Tile { id, height }
    }

    fn grid(columns: usize) -> Grid<Tile, u32> {
        Grid::new(NonZeroUsize::new(columns).unwrap())
    }

    fn append(grid: Grid<Tile, u32>, tiles: &[Tile]) -> Grid<Tile, u32> {
        grid.append_batch(tiles.iter().cloned(), |t| t.height, |t, _| t.id)
    }

    fn ids(grid: &Grid<Tile, u32>, column: usize) -> Vec<u32> {
        grid.column(column).iter().map(|t| t.id).collect()
    }

    #[test]
    fn new_and_reset_have_empty_columns() {
        let g = append(grid(3), &[tile(1, 10.0)]);
        assert!(g.has_any_data());
        let g = g.reset();
        assert_eq!(g.num_columns(), 3);
        assert_eq!(g.columns().len(), 3);
        assert!(!g.has_any_data());
        assert_eq!(g.submitted(), 0);
    }

    #[test]
    fn batch_placement_sees_items_placed_earlier_in_the_batch() {
        let g = append(
            grid(2),
            &[tile(1, 100.0), tile(2, 50.0), tile(3, 30.0), tile(4, 40.0)],
        );
        // 1 -> c0 (100), 2 -> c1 (50), 3 -> c1 (80), 4 -> c1 (120).
        assert_eq!(ids(&g, 0), [1]);
        assert_eq!(ids(&g, 1), [2, 3, 4]);
        assert_eq!(g.column_total(0, |t| t.height), 100.0);
        assert_eq!(g.column_total(1, |t| t.height), 120.0);
    }

    #[test]
    fn totals_are_seeded_from_existing_columns() {
        let g = append(grid(2), &[tile(1, 100.0), tile(2, 10.0)]);
        let g = append(g, &[tile(3, 20.0), tile(4, 20.0)]);
        assert_eq!(ids(&g, 0), [1]);
        assert_eq!(ids(&g, 1), [2, 3, 4]);
    }

    #[test]
    fn resubmission_is_idempotent() {
        let batch = [tile(1, 10.0), tile(2, 20.0), tile(3, 30.0)];
        let once = append(grid(2), &batch);
        let twice = append(append(grid(2), &batch), &batch);
        for c in 0..2 {
            assert_eq!(once.column(c), twice.column(c));
        }
        assert_eq!(twice.len(), 3);
    }

    #[test]
    fn duplicate_identity_is_dropped_not_updated() {
        let g = append(grid(2), &[tile(1, 10.0)]);
        let g = append(g, &[tile(1, 99.0), tile(2, 5.0)]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.column(0)[0], tile(1, 10.0));
        assert!(g.positions().all(|(_, t)| t.height != 99.0));
    }

    #[test]
    fn duplicates_within_a_batch_keep_first_occurrence() {
        let g = append(grid(2), &[tile(7, 10.0), tile(7, 20.0), tile(8, 5.0)]);
        // The dropped copy of 7 was staged in column 1 and still counted there,
        // so 8 lands in column 0.
        assert_eq!(g.len(), 2);
        assert_eq!(g.column(0), &[tile(7, 10.0), tile(8, 5.0)]);
        assert!(g.column(1).is_empty());
        assert_eq!(g.submitted(), 3);
    }

    #[test]
    fn mutate_changes_only_the_first_match_in_place() {
        let g = append(grid(2), &[tile(0, 10.0), tile(1, 10.0), tile(2, 10.0)]);
        let before = g.find(|t| t.id == 1).unwrap();
        let g = g.mutate(|t| t.id == 1, |t| tile(t.id, 99.0), |t, _| t.id);
        assert_eq!(g.find(|t| t.id == 1), Some(before));
        assert_eq!(g.get(before), Some(&tile(1, 99.0)));
        assert_eq!(g.get(ItemPosition { column: 0, index: 0 }), Some(&tile(0, 10.0)));
        assert_eq!(g.get(ItemPosition { column: 0, index: 1 }), Some(&tile(2, 10.0)));
    }

    #[test]
    fn mutate_without_match_is_a_no_op() {
        let g = append(grid(2), &[tile(1, 10.0)]);
        let g = g.mutate(|t| t.id == 42, |t| tile(t.id, 0.0), |t, _| t.id);
        assert_eq!(g.column(0), &[tile(1, 10.0)]);
    }

    #[test]
    fn mutation_rekeys_the_item() {
        let g = append(grid(1), &[tile(1, 10.0)]);
        let g = g.mutate(|t| t.id == 1, |t| tile(5, t.height), |t, _| t.id);
        let at = ItemPosition { column: 0, index: 0 };
        assert_eq!(g.key_at(at), Some(&5));
        assert!(g.contains_key(&5));
        assert!(!g.contains_key(&1));

        // The new identity is taken; the old one is free again.
        let g = append(g, &[tile(5, 20.0), tile(1, 30.0)]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.positions().filter(|(_, t)| t.id == 5).count(), 1);
        assert_eq!(g.positions().filter(|(_, t)| t.id == 1).count(), 1);
    }

    #[test]
    fn mutation_into_a_taken_identity_is_rejected() {
        let g = append(grid(2), &[tile(1, 10.0), tile(2, 10.0)]);
        let at = g.find(|t| t.id == 1).unwrap();
        let (g, committed) = g.mutate_at(at, |t| tile(2, t.height), |t, _| t.id);
        assert!(!committed);
        assert_eq!(g.get(at), Some(&tile(1, 10.0)));
        assert!(g.contains_key(&1));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn rekeying_passes_the_original_submission_position() {
        let g: Grid<Tile, usize> = Grid::new(NonZeroUsize::MIN);
        let g = g.append_batch([tile(0, 1.0), tile(0, 2.0)], |t| t.height, |_, p| p);
        let g = g.remove(|t| t.height < 1.5);
        let at = ItemPosition { column: 0, index: 0 };
        let (g, committed) = g.mutate_at(at, |t| tile(t.id, 3.0), |_, p| p);
        assert!(committed);
        assert_eq!(g.key_at(at), Some(&1));
    }

    #[test]
    fn remove_shifts_later_items() {
        let g = append(grid(1), &[tile(0, 1.0), tile(1, 1.0), tile(2, 1.0)]);
        let g = g.remove(|t| t.id == 1);
        assert_eq!(ids(&g, 0), [0, 2]);
        assert!(!g.contains_key(&1));

        let g = g.remove(|t| t.id == 42);
        assert_eq!(ids(&g, 0), [0, 2]);
    }

    #[test]
    fn removed_identity_can_be_appended_again() {
        let g = append(grid(2), &[tile(1, 10.0)]);
        let (g, removed) = g.remove_at(ItemPosition { column: 0, index: 0 });
        assert_eq!(removed, Some(tile(1, 10.0)));
        let g = append(g, &[tile(1, 10.0)]);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn out_of_range_positions_are_ignored() {
        let g = append(grid(2), &[tile(1, 10.0)]);
        let (g, removed) = g.remove_at(ItemPosition { column: 5, index: 0 });
        assert!(removed.is_none());
        let (g, removed) = g.remove_at(ItemPosition { column: 0, index: 3 });
        assert!(removed.is_none());
        assert_eq!(g.len(), 1);
        assert!(g.column(9).is_empty());
    }

    #[test]
    fn positions_scan_column_major() {
        let g = append(grid(2), &[tile(1, 10.0), tile(2, 10.0), tile(3, 10.0)]);
        let order: Vec<(usize, usize, u32)> = g
            .positions()
            .map(|(p, t)| (p.column, p.index, t.id))
            .collect();
        assert_eq!(order, [(0, 0, 1), (0, 1, 3), (1, 0, 2)]);
    }
}
