// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived layout metrics handed to the host virtualization primitive.

use crate::{Scalar, fold_heights};

/// Position and size of one item within its column.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemLayout<S: Scalar> {
    /// Sum of the heights of the items before `index`.
    pub offset: S,
    /// Height of the item itself.
    pub length: S,
    /// Index of the item within its column.
    pub index: usize,
}

/// Computes the layout of `column[index]` by summing the heights before it.
///
/// Returns `None` if `index` is out of bounds.
pub fn item_layout<T, S, H>(column: &[T], index: usize, height_of: H) -> Option<ItemLayout<S>>
where
    S: Scalar,
    H: Fn(&T) -> S,
{
    let item = column.get(index)?;
    Some(ItemLayout {
        offset: fold_heights(&column[..index], &height_of),
        length: height_of(item),
        index,
    })
}

/// Spacing applied around one column and its items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnInsets<S: Scalar> {
    /// Space before the column along the cross axis.
    pub leading: S,
    /// Space after the column along the cross axis. Only the last column has one.
    pub trailing: S,
    /// Space below each item.
    pub item_spacing: S,
}

/// Returns the insets for `column` in a grid of `num_columns` columns separated by `gap`.
#[must_use]
pub fn column_insets<S: Scalar>(column: usize, num_columns: usize, gap: S) -> ColumnInsets<S> {
    let is_last = column + 1 == num_columns;
    ColumnInsets {
        leading: gap,
        trailing: if is_last { gap } else { S::zero() },
        item_spacing: gap,
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemLayout, column_insets, item_layout};

    #[test]
    fn offsets_sum_preceding_heights() {
        let heights = [100.0_f32, 50.0, 75.0];
        assert_eq!(
            item_layout(&heights, 2, |h| *h),
            Some(ItemLayout {
                offset: 150.0,
                length: 75.0,
                index: 2,
            })
        );
        assert_eq!(item_layout(&heights, 0, |h| *h).map(|l| l.offset), Some(0.0));
        assert_eq!(item_layout(&heights, 3, |h| *h), None);
    }

    #[test]
    fn only_last_column_has_trailing_inset() {
        let first = column_insets(0, 3, 5.0_f32);
        assert_eq!((first.leading, first.trailing), (5.0, 0.0));
        let last = column_insets(2, 3, 5.0_f32);
        assert_eq!((last.leading, last.trailing), (5.0, 5.0));
        assert_eq!(last.item_spacing, 5.0);
    }
}
