// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted drag session.
//!
//! Simulates grabbing the bottom-right anchor, resizing with the aspect
//! ratio locked, then rotating with snapping to quarter turns.
//!
//! Run:
//! - `cargo run -p trellis_demos --example transformer_drag`

use kurbo::Point;
use trellis_scene::{Geometry, SceneTree};
use trellis_transformer::{Transformer, TransformerConfig};

fn main() {
    let mut tree = SceneTree::new();
    let rect = tree.insert(None, Geometry::rect(50.0, 50.0, 100.0, 100.0));

    let mut tr = Transformer::with_config(TransformerConfig {
        keep_ratio: true,
        rotation_snaps: vec![0.0, 90.0, 180.0, 270.0],
        rotation_snap_tolerance: 8.0,
        ..TransformerConfig::default()
    });
    tr.attach_to(&tree, rect);

    // Resize via the bottom-right corner; keep_ratio keeps the square.
    for ev in tr.pointer_down(Point::new(150.0, 150.0)) {
        println!("event: {ev:?}");
    }
    for ev in tr.pointer_move(&mut tree, Point::new(250.0, 180.0)) {
        println!("event: {ev:?}");
    }
    for ev in tr.pointer_up(Point::new(250.0, 180.0)) {
        println!("event: {ev:?}");
    }
    let b = tr.bounding_box();
    println!("after resize: {}x{}", b.width, b.height);
    assert_eq!(b.width, b.height, "ratio is locked");

    // Rotate via the rotation anchor; 86° snaps to 90°.
    let rotater = tr
        .handle_layout()
        .into_iter()
        .find(|(h, _)| *h == trellis_transformer::Handle::Rotater)
        .map(|(_, p)| p)
        .expect("rotation anchor is enabled");
    let center = b.center();
    tr.pointer_down(rotater);
    let angle = 86.0_f64.to_radians();
    let target = Point::new(
        center.x + 200.0 * angle.sin(),
        center.y - 200.0 * angle.cos(),
    );
    tr.pointer_move(&mut tree, target);
    tr.stop_transform();

    let g = tree.geometry(rect).expect("node is alive");
    println!("rotation: {}", g.rotation);
    assert!(
        (g.rotation - 90.0).abs() < 1e-9,
        "snapped to the quarter turn"
    );

    println!("redraws requested: {}", tree.take_redraw_requests());
}
