// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waterfall feed demo.
//!
//! Simulates a two-column photo feed: an initial page is laid out, the user
//! scrolls to the bottom, and every end-reached signal loads the next page.
//! A liked photo is updated in place and a reported one is removed.
//!
//! Run with `RUST_LOG=debug cargo run -p understory_demos --example waterfall_feed`
//! to see the layout's own events.

use tracing_subscriber::EnvFilter;
use understory_waterfall::{ItemKey, ScrollGeometry, Waterfall, WaterfallConfig, WaterfallItem};

const VIEWPORT: f64 = 800.0;
const PAGE_SIZE: i64 = 12;

#[derive(Clone, Debug)]
struct Photo {
    id: i64,
    height: f64,
    color: &'static str,
    likes: u32,
}

impl WaterfallItem for Photo {
    type Scalar = f64;

    fn height(&self) -> Option<f64> {
        Some(self.height)
    }

    fn key(&self) -> Option<ItemKey> {
        Some(self.id.to_string().into())
    }
}

fn page(index: i64) -> Vec<Photo> {
    const HEIGHTS: [f64; 10] = [
        200.0, 300.0, 100.0, 400.0, 200.0, 100.0, 150.0, 100.0, 250.0, 100.0,
    ];
    const COLORS: [&str; 6] = ["red", "blue", "green", "orange", "teal", "steelblue"];
    (0..PAGE_SIZE)
        .map(|i| {
            let id = index * PAGE_SIZE + i + 1;
            let slot = usize::try_from(id).unwrap_or_default();
            Photo {
                id,
                height: HEIGHTS[slot % HEIGHTS.len()],
                color: COLORS[slot % COLORS.len()],
                likes: 0,
            }
        })
        .collect()
}

fn content_length(waterfall: &Waterfall<Photo>) -> f64 {
    (0..waterfall.num_columns())
        .map(|c| {
            waterfall.column(c).len() as f64 * waterfall.config().gap
                + waterfall
                    .grid()
                    .column_total(c, understory_waterfall::height_of::<Photo>)
        })
        .fold(0.0, f64::max)
}

fn print_columns(waterfall: &Waterfall<Photo>) {
    for (c, column) in waterfall.columns().enumerate() {
        let ids: Vec<String> = column
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = if waterfall.is_new_item(c, i) { "*" } else { "" };
                format!("{}{marker}", p.id)
            })
            .collect();
        println!("  {}: [{}]", waterfall.column_key(c), ids.join(", "));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = WaterfallConfig::new().with_gap(10.0).with_fade_in(true);
    let mut waterfall = Waterfall::new(config).expect("default configuration is valid");

    let mut next_page = 0;
    waterfall.add_items(page(next_page));
    next_page += 1;
    println!("initial layout:");
    print_columns(&waterfall);

    // Scroll down in steps; each time the bottom is reached, load another page.
    let mut offset = 0.0;
    while next_page < 4 {
        let content = content_length(&waterfall);
        offset = (offset + 250.0_f64).min((content - VIEWPORT).max(0.0));
        let geometry = ScrollGeometry::new(VIEWPORT, offset, content);
        if let Some(signal) = waterfall.on_scroll(&geometry) {
            println!(
                "end reached at offset {offset} ({} from end), loading page {next_page}",
                signal.distance_from_end
            );
            waterfall.add_items(page(next_page));
            next_page += 1;
            print_columns(&waterfall);
        }
    }

    waterfall.mutate_item(|p| p.id == 5, |p| Photo { likes: p.likes + 1, ..p.clone() });
    if let Some(position) = waterfall.find_item(|p| p.id == 5) {
        let liked = &waterfall.column(position.column)[position.index];
        println!("photo {} ({}) now has {} like(s)", liked.id, liked.color, liked.likes);
    }

    if let Some(removed) = waterfall.remove_item(|p| p.id == 3) {
        println!("removed photo {}", removed.id);
    }

    let request = waterfall.scroll_to_top();
    println!("scroll to {} (animated: {})", request.offset, request.animated);
}
