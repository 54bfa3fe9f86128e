// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transformer basics.
//!
//! Attach a transformer to a rectangle, inspect its box and anchors, and
//! observe external changes through polling.
//!
//! Run:
//! - `cargo run -p trellis_demos --example transformer_basics`

use trellis_scene::{Geometry, SceneTree};
use trellis_transformer::Transformer;

fn main() {
    let mut tree = SceneTree::new();
    let rect = tree.insert(None, Geometry::rect(100.0, 60.0, 100.0, 100.0));

    let mut tr = Transformer::new();
    tr.attach_to(&tree, rect);

    let b = tr.bounding_box();
    println!("box: ({}, {}) {}x{} rot {}", b.x, b.y, b.width, b.height, b.rotation);
    for (handle, point) in tr.handle_layout() {
        let cursor = tr.cursor_at(point);
        println!(
            "  {handle:?} at ({:.1}, {:.1}) cursor {cursor:?}",
            point.x, point.y
        );
    }

    // The host rotates the node; the transformer notices on the next poll.
    tree.update_geometry(rect, |g| g.rotation = 45.0);
    let changed = tr.sync(&mut tree);
    println!("changed: {changed}, box rotation: {}", tr.bounding_box().rotation);
    assert!(changed, "external write should be observed");
}
