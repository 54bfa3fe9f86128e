// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inverse problem: desired box → node attribute writes.
//!
//! Fitting derives the `{x, y, scale_x, scale_y, rotation}` attribute set
//! that makes a node's *visual* box coincide with a desired oriented box,
//! after stripping the configured padding. Sizes and offsets are never
//! written — scale absorbs all resizing, which is what keeps text and stroke
//! widths visually consistent in the host renderer.
//!
//! A desired box arriving with a negative dimension (a handle dragged across
//! its anchor) flips the corresponding scale sign: mirroring, not an error.

use kurbo::{Affine, Point, Vec2};

use trellis_geom::affine::decompose_continuous;
use trellis_geom::obox::{OrientedBox, rotate_vec};
use trellis_scene::{NodeId, SceneTree};

use crate::resolve;

fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Fit a single node into `desired`, padding stripped symmetrically.
///
/// The desired box's dimension signs are taken *relative to the node's
/// current scale signs*: fitting a mirrored node into a positive-width box
/// keeps it mirrored. For repeated fits against proposals measured from one
/// fixed reference (a drag session), use [`fit_node_with_signs`] with the
/// signs captured at that reference, or the mirror state flips on every
/// call while a proposal dimension stays negative.
///
/// Returns false (writing nothing) for a dead id.
pub fn fit_node(
    tree: &mut SceneTree,
    id: NodeId,
    desired: &OrientedBox,
    padding: f64,
    ignore_stroke: bool,
) -> bool {
    let Some(g) = tree.geometry(id).copied() else {
        return false;
    };
    fit_node_with_signs(
        tree,
        id,
        desired,
        padding,
        ignore_stroke,
        sign_or_one(g.scale_x),
        sign_or_one(g.scale_y),
    )
}

/// Fit a single node into `desired` against explicit reference scale signs.
///
/// Scale factors derive from the padded box over the node's local extent,
/// multiplied by `sign_x` / `sign_y` — the scale signs of the state the
/// desired box was measured against. A zero local dimension leaves that
/// axis's scale untouched instead of dividing by zero. The node position is
/// chosen so the local rect's center maps onto the padded box center, which
/// is correct for every scale-sign combination.
///
/// Returns false (writing nothing) for a dead id.
pub fn fit_node_with_signs(
    tree: &mut SceneTree,
    id: NodeId,
    desired: &OrientedBox,
    padding: f64,
    ignore_stroke: bool,
    sign_x: f64,
    sign_y: f64,
) -> bool {
    let Some(g) = tree.geometry(id).copied() else {
        return false;
    };
    let local = resolve::local_rect(tree, id, ignore_stroke);
    let inner = desired.inset(padding);

    let new_sx = if local.width() == 0.0 {
        g.scale_x
    } else {
        inner.width / local.width() * sign_x
    };
    let new_sy = if local.height() == 0.0 {
        g.scale_y
    } else {
        inner.height / local.height() * sign_y
    };

    let rotation = desired.rotation;
    let inner_center = inner.local_to_parent(Point::new(inner.width / 2.0, inner.height / 2.0));
    let local_center = local.center();
    let pivot_to_center = Vec2::new(
        (local_center.x - g.offset_x) * new_sx,
        (local_center.y - g.offset_y) * new_sy,
    );
    let pos = inner_center - rotate_vec(pivot_to_center, rotation);

    tree.update_geometry(id, |g| {
        g.x = pos.x;
        g.y = pos.y;
        g.scale_x = new_sx;
        g.scale_y = new_sy;
        g.rotation = rotation;
    })
}

/// Fit a set of sibling nodes into `desired` as one unit.
///
/// Computes the affine delta mapping `old_union` (axis-aligned, the union
/// box at the previous step) onto the padding-stripped desired box, then
/// pre-multiplies it onto every node's local transform and re-decomposes.
/// Relative layout inside the selection is preserved; skew a non-uniform
/// delta would introduce on rotated members is not representable in node
/// attributes and is discarded by the decomposition.
///
/// A zero-dimension `old_union` contributes a scale factor of 1 on that
/// axis rather than an infinite one.
pub fn fit_group(
    tree: &mut SceneTree,
    ids: &[NodeId],
    desired: &OrientedBox,
    old_union: &OrientedBox,
    padding: f64,
) {
    let inner = desired.inset(padding);
    let sx = if old_union.width == 0.0 {
        1.0
    } else {
        inner.width / old_union.width
    };
    let sy = if old_union.height == 0.0 {
        1.0
    } else {
        inner.height / old_union.height
    };
    let delta = Affine::translate(inner.origin().to_vec2())
        * Affine::rotate(inner.rotation.to_radians())
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(-old_union.origin().to_vec2());

    for &id in ids {
        let Some(g) = tree.geometry(id).copied() else {
            continue;
        };
        let new_m = delta * tree.local_transform(id);
        // The delta adds the desired box's rotation on top of the node's own.
        let d = decompose_continuous(new_m, g.rotation + inner.rotation);
        // The decomposition places the local origin; re-express for the
        // node's offset pivot.
        let pivot = rotate_vec(
            Vec2::new(g.offset_x * d.scale_x, g.offset_y * d.scale_y),
            d.rotation,
        );
        tree.update_geometry(id, |g| {
            g.x = d.x + pivot.x;
            g.y = d.y + pivot.y;
            g.scale_x = d.scale_x;
            g.scale_y = d.scale_y;
            g.rotation = d.rotation;
        });
    }
}
