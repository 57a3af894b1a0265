// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Waterfall: a renderer-agnostic masonry (waterfall) layout core.
//!
//! Items of varying height are packed into a fixed number of columns so that
//! column heights stay balanced. New batches can be appended at any time,
//! individual items can be mutated or removed by predicate, and scroll events
//! are turned into an edge-triggered "load more" signal.
//!
//! The core concepts are:
//!
//! - [`WaterfallItem`]: the trait your item type implements to expose its
//!   height and identity ([`ItemKey`]).
//! - [`shortest_column`] and [`ColumnTotals`]: greedy shortest-column
//!   assignment, with totals updated after every placement in a batch.
//! - [`Grid`]: the per-column item sequences. Identities are unique across the
//!   whole grid; re-submitting an item is a no-op. Updates consume the grid and
//!   return the next one.
//! - [`EdgeState`] and [`EdgeDetector`]: the pagination state machine over
//!   [`ScrollGeometry`] snapshots. One [`EndReached`] per approach to the bottom.
//! - [`Waterfall`]: a controller composing all of the above, plus
//!   [`item_layout`] offsets and fade-in bookkeeping for the host.
//!
//! This crate deliberately does **not** measure, render, or virtualize. Host
//! frameworks are responsible for:
//!
//! - Supplying item heights.
//! - Rendering each column (typically through a per-column virtual list fed
//!   with [`Waterfall::column`] and [`Waterfall::item_layout`]).
//! - Forwarding scroll positions to [`Waterfall::on_scroll`] and loading more
//!   items when it returns a signal.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_waterfall::{ItemKey, ScrollGeometry, Waterfall, WaterfallConfig, WaterfallItem};
//!
//! struct Card {
//!     id: i64,
//!     height: f64,
//! }
//!
//! impl WaterfallItem for Card {
//!     type Scalar = f64;
//!
//!     fn height(&self) -> Option<f64> {
//!         Some(self.height)
//!     }
//!
//!     fn id(&self) -> Option<ItemKey> {
//!         Some(self.id.into())
//!     }
//! }
//!
//! let mut waterfall = Waterfall::new(WaterfallConfig::new().with_num_columns(2)).unwrap();
//! waterfall.add_items([
//!     Card { id: 1, height: 200.0 },
//!     Card { id: 2, height: 300.0 },
//!     Card { id: 3, height: 100.0 },
//! ]);
//!
//! // Card 3 goes under card 1, the shorter column.
//! assert_eq!(waterfall.column(0).len(), 2);
//! assert_eq!(waterfall.item_layout(0, 1).unwrap().offset, 200.0);
//!
//! // Re-submitting an identity is a no-op.
//! waterfall.add_items([Card { id: 2, height: 999.0 }]);
//! assert_eq!(waterfall.grid().len(), 3);
//!
//! // Scrolling to the bottom asks for more, once.
//! let bottom = ScrollGeometry::new(400.0, 500.0, 900.0);
//! assert!(waterfall.on_scroll(&bottom).is_some());
//! assert!(waterfall.on_scroll(&bottom).is_none());
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` in optional dependencies.
//! - `libm`: no_std numeric support for Kurbo.
//! - `kurbo`: [`ScrollGeometry::from_kurbo`] for hosts using Kurbo geometry.
//! - `serde`: `Serialize`/`Deserialize` for configuration and geometry types.
//! - `tracing`: debug/trace events for appends, mutations, and pagination.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod assign;
mod config;
mod edge;
mod engine;
mod error;
mod grid;
mod item;
mod layout;
mod scalar;

pub use assign::{ColumnTotals, shortest_column};
pub use config::WaterfallConfig;
pub use edge::{
    EdgeDetector, EdgeState, EndReached, NEAR_TOP_GUARD, ScrollGeometry, has_left_bottom,
    is_near_bottom,
};
pub use engine::{KeyExtractor, ScrollRequest, Waterfall};
pub use error::WaterfallError;
pub use grid::{Grid, ItemPosition};
pub use item::{ItemKey, WaterfallItem, default_key, fold_heights, height_of};
pub use layout::{ColumnInsets, ItemLayout, column_insets, item_layout};
pub use scalar::Scalar;
