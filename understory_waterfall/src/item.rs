// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item identity and height accessors.

use alloc::string::{String, ToString};
use core::fmt;

use crate::Scalar;

/// Identity of an item, used for deduplication and predicate lookup.
///
/// Integer and string identities are distinct: `ItemKey::Int(1)` and
/// `ItemKey::Str("1".into())` never compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKey {
    /// A numeric identity, typically a database id.
    Int(i64),
    /// A string identity.
    Str(String),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ItemKey {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ItemKey {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// An item that can be placed into a waterfall layout.
///
/// Only [`height`](WaterfallItem::height) is required. The identity used for
/// deduplication defaults to [`key`](WaterfallItem::key), then
/// [`id`](WaterfallItem::id), then the item's submission position (see
/// [`default_key`]).
pub trait WaterfallItem {
    /// Scalar type of the item's height.
    type Scalar: Scalar;

    /// Height of the item in the scroll direction, if known.
    ///
    /// `None` is treated as zero: the item still occupies a slot but does not
    /// contribute to column balancing.
    fn height(&self) -> Option<Self::Scalar>;

    /// Primary identity of the item.
    fn key(&self) -> Option<ItemKey> {
        None
    }

    /// Fallback identity, consulted when [`key`](WaterfallItem::key) is `None`.
    fn id(&self) -> Option<ItemKey> {
        None
    }
}

/// Resolves the identity of `item` the default way: `key`, else `id`, else the
/// stringified `position`.
///
/// The positional fallback is only stable for append-only streams. If batches
/// are reordered or re-submitted, items without a key or id will not be
/// recognized as duplicates.
pub fn default_key<T: WaterfallItem>(item: &T, position: usize) -> ItemKey {
    item.key()
        .or_else(|| item.id())
        .unwrap_or_else(|| ItemKey::Str(position.to_string()))
}

/// Returns the effective height of `item`: absent, negative, and non-finite
/// heights become zero.
pub fn height_of<T: WaterfallItem>(item: &T) -> T::Scalar {
    item.height().map_or_else(T::Scalar::zero, sanitize_height)
}

/// Clamps a caller-supplied height into the range the layout accepts.
pub(crate) fn sanitize_height<S: Scalar>(height: S) -> S {
    if !height.is_finite() {
        #[cfg(feature = "tracing")]
        tracing::warn!(height = height.to_f64(), "non-finite item height treated as zero");
        return S::zero();
    }
    if height.is_sign_negative() {
        S::zero()
    } else {
        height
    }
}

/// Sums the heights of `items` using `height_of`.
pub fn fold_heights<'a, T, S, H>(items: impl IntoIterator<Item = &'a T>, height_of: H) -> S
where
    T: 'a,
    S: Scalar,
    H: Fn(&T) -> S,
{
    items
        .into_iter()
        .fold(S::zero(), |acc, item| acc + height_of(item))
}
