// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward problem: node attributes → oriented box in target space.
//!
//! "Target space" is the coordinate frame the transform cage itself lives in,
//! normally the parent of the attached node(s). The resolver composes the
//! matrix chain from a node up to that frame, decomposes it (hinting the
//! decomposition with the summed attribute rotations, so a mirrored node
//! reports its attribute rotation and scale signs rather than an equivalent
//! half-turn), and reports a box with non-negative dimensions — mirroring is
//! visible only through the returned decomposition's scale signs.

use kurbo::{Point, Rect};

use trellis_geom::affine::{Decomposition, decompose_continuous};
use trellis_geom::obox::OrientedBox;
use trellis_scene::{NodeId, SceneTree, ShapeSize};

/// The node's untransformed rectangle in its own local space.
///
/// Rectangles span `(0, 0)`–`(w, h)`; circles are centered on the origin;
/// groups take the union of their children's local boxes mapped through the
/// children's transforms. Stroke inflates the rect by half its width on each
/// side unless `ignore_stroke` is set. The node's offset does not appear
/// here: it is part of the transform chain, not of the local extent.
pub fn local_rect(tree: &SceneTree, id: NodeId, ignore_stroke: bool) -> Rect {
    let Some(g) = tree.geometry(id) else {
        return Rect::ZERO;
    };
    let mut rect = match g.size {
        ShapeSize::Rect { width, height } => Rect::new(0.0, 0.0, width, height),
        ShapeSize::Circle { radius } => Rect::new(-radius, -radius, radius, radius),
        ShapeSize::Group => {
            let mut acc: Option<Rect> = None;
            for &child in tree.children(id) {
                let child_rect = local_rect(tree, child, ignore_stroke);
                if child_rect == Rect::ZERO {
                    // Empty subtree; contributes no extent.
                    continue;
                }
                let mapped = tree.local_transform(child).transform_rect_bbox(child_rect);
                acc = Some(match acc {
                    Some(r) => r.union(mapped),
                    None => mapped,
                });
            }
            return acc.unwrap_or(Rect::ZERO);
        }
    };
    if !ignore_stroke && g.stroke_width > 0.0 {
        rect = rect.inflate(g.stroke_width / 2.0, g.stroke_width / 2.0);
    }
    rect
}

/// Sum of attribute rotations from `id` up to, but excluding, `ancestor`.
///
/// Used as the decomposition hint: in the absence of skew-inducing ancestor
/// scales this is exactly the chain's rotation, and it stays within 90° of
/// it in every configuration a scene of attribute-transformed nodes can
/// express, which is all the hint needs.
fn chain_rotation(tree: &SceneTree, id: NodeId, ancestor: Option<NodeId>) -> f64 {
    let mut rotation = tree.geometry(id).map_or(0.0, |g| g.rotation);
    let mut cur = tree.parent(id);
    while let Some(p) = cur {
        if Some(p) == ancestor {
            break;
        }
        rotation += tree.geometry(p).map_or(0.0, |g| g.rotation);
        cur = tree.parent(p);
    }
    rotation
}

/// The node's oriented bounding box in `target` space.
///
/// Returns the box together with the decomposition of the node→target
/// matrix chain, resolved against the chain's attribute rotations; callers
/// read the decomposition's scale signs for mirror handling.
///
/// The box origin is the corner of the *visual* rectangle that plays
/// top-left in the box's own frame, so a mirrored node yields the same box
/// as its unmirrored twin.
pub fn oriented_box(
    tree: &SceneTree,
    id: NodeId,
    target: Option<NodeId>,
    ignore_stroke: bool,
) -> (OrientedBox, Decomposition) {
    let local = local_rect(tree, id, ignore_stroke);
    let m = tree.transform_to(id, target);
    let d = decompose_continuous(m, chain_rotation(tree, id, target));
    // Under a negative scale the transformed min corner lands on the far
    // side; pick the corner that stays the box's local top-left.
    let corner = Point::new(
        if d.scale_x >= 0.0 { local.x0 } else { local.x1 },
        if d.scale_y >= 0.0 { local.y0 } else { local.y1 },
    );
    let origin = m * corner;
    let b = OrientedBox::new(
        origin.x,
        origin.y,
        local.width() * d.scale_x.abs(),
        local.height() * d.scale_y.abs(),
        d.rotation,
    );
    (b, d)
}

/// The axis-aligned union of several nodes' boxes in `target` space.
///
/// Takes the min/max over all four corners of every node's oriented box;
/// the result never carries a rotation of its own (multi-node selections
/// are framed axis-aligned). Empty input yields the degenerate zero box.
pub fn union_box(
    tree: &SceneTree,
    ids: &[NodeId],
    target: Option<NodeId>,
    ignore_stroke: bool,
) -> OrientedBox {
    let mut acc: Option<Rect> = None;
    for &id in ids {
        if !tree.is_alive(id) {
            continue;
        }
        let (b, _) = oriented_box(tree, id, target, ignore_stroke);
        let aabb = b.aabb();
        acc = Some(match acc {
            Some(r) => r.union(aabb),
            None => aabb,
        });
    }
    acc.map_or(OrientedBox::ZERO, OrientedBox::from_rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_scene::Geometry;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn assert_box(b: &OrientedBox, x: f64, y: f64, w: f64, h: f64, rot: f64) {
        assert_close(b.x, x);
        assert_close(b.y, y);
        assert_close(b.width, w);
        assert_close(b.height, h);
        assert_close(b.rotation, rot);
    }

    #[test]
    fn identity_node_box_equals_attributes() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry::rect(100.0, 60.0, 100.0, 100.0));
        let (b, _) = oriented_box(&tree, n, None, false);
        assert_box(&b, 100.0, 60.0, 100.0, 100.0, 0.0);
    }

    #[test]
    fn scaled_rotated_node() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry {
            rotation: 90.0,
            scale_y: 1.5,
            ..Geometry::rect(150.0, 60.0, 100.0, 100.0)
        });
        let (b, _) = oriented_box(&tree, n, None, false);
        assert_box(&b, 150.0, 60.0, 100.0, 150.0, 90.0);
    }

    #[test]
    fn offset_shifts_box_without_resizing() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry {
            offset_x: 50.0,
            offset_y: 50.0,
            ..Geometry::rect(50.0, 50.0, 100.0, 100.0)
        });
        let (b, _) = oriented_box(&tree, n, None, false);
        assert_box(&b, 0.0, 0.0, 100.0, 100.0, 0.0);

        // Changing only the offset shifts the box by the rotated delta and
        // never its dimensions.
        tree.update_geometry(n, |g| {
            g.rotation = 90.0;
            g.offset_x = 0.0;
            g.offset_y = 0.0;
        });
        let (b0, _) = oriented_box(&tree, n, None, false);
        tree.update_geometry(n, |g| g.offset_x = 10.0);
        let (b1, _) = oriented_box(&tree, n, None, false);
        // A local −10 x-shift under 90° rotation moves the box by (0, −10).
        assert_close(b1.x - b0.x, 0.0);
        assert_close(b1.y - b0.y, -10.0);
        assert_close(b1.width, b0.width);
        assert_close(b1.height, b0.height);
    }

    #[test]
    fn circle_box_is_centered() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry::circle(40.0, 40.0, 40.0));
        let (b, _) = oriented_box(&tree, n, None, false);
        assert_box(&b, 0.0, 0.0, 80.0, 80.0, 0.0);
    }

    #[test]
    fn scaled_rotated_circle() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry {
            scale_x: 1.5,
            rotation: 90.0,
            ..Geometry::circle(100.0, 100.0, 40.0)
        });
        let (b, _) = oriented_box(&tree, n, None, false);
        assert_box(&b, 140.0, 40.0, 120.0, 80.0, 90.0);
    }

    #[test]
    fn mirrored_scale_reports_same_dimensions() {
        let mut tree = SceneTree::new();
        let plain = tree.insert(None, Geometry::rect(50.0, 160.0, 100.0, 100.0));
        let mirrored = tree.insert(None, Geometry {
            scale_y: -1.0,
            ..Geometry::rect(50.0, 160.0, 100.0, 100.0)
        });
        let (b0, _) = oriented_box(&tree, plain, None, false);
        let (b1, d1) = oriented_box(&tree, mirrored, None, false);
        assert_close(b1.width, b0.width);
        assert_close(b1.height, b0.height);
        assert_close(b1.rotation, 0.0);
        // The mirrored visual rect spans upward from y = 160.
        assert_box(&b1, 50.0, 60.0, 100.0, 100.0, 0.0);
        assert!(d1.scale_y < 0.0);
    }

    #[test]
    fn x_mirror_keeps_attribute_rotation() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry {
            scale_x: -1.0,
            ..Geometry::rect(100.0, 0.0, 100.0, 100.0)
        });
        // The matrix is also expressible as a 180° turn with scale_y = -1;
        // the attribute-rotation hint picks the mirrored representation.
        let (b, d) = oriented_box(&tree, n, None, false);
        assert_box(&b, 0.0, 0.0, 100.0, 100.0, 0.0);
        assert!(d.scale_x < 0.0);
        assert!(d.scale_y > 0.0);
    }

    #[test]
    fn group_union_in_own_space_ignores_group_rotation() {
        let mut tree = SceneTree::new();
        let group = tree.insert(None, Geometry {
            rotation: 45.0,
            ..Geometry::group(50.0, 50.0)
        });
        let a = tree.insert(Some(group), Geometry::rect(0.0, 0.0, 100.0, 100.0));
        let b = tree.insert(Some(group), Geometry::rect(50.0, 50.0, 100.0, 100.0));
        let union = union_box(&tree, &[a, b], Some(group), false);
        assert_box(&union, 0.0, 0.0, 150.0, 150.0, 0.0);
    }

    #[test]
    fn group_box_in_parent_space_carries_group_rotation() {
        let mut tree = SceneTree::new();
        let group = tree.insert(None, Geometry::group(50.0, 50.0));
        let _a = tree.insert(Some(group), Geometry::rect(0.0, 0.0, 100.0, 100.0));
        let _b = tree.insert(Some(group), Geometry::rect(50.0, 50.0, 100.0, 100.0));
        let (b, _) = oriented_box(&tree, group, None, false);
        assert_box(&b, 50.0, 50.0, 150.0, 150.0, 0.0);

        tree.update_geometry(group, |g| g.rotation = 90.0);
        let (rotated, _) = oriented_box(&tree, group, None, false);
        assert_close(rotated.rotation, 90.0);
        assert_close(rotated.width, 150.0);
        assert_close(rotated.height, 150.0);
    }

    #[test]
    fn group_with_negative_child_extent() {
        let mut tree = SceneTree::new();
        let group = tree.insert(None, Geometry::group(100.0, 100.0));
        let _a = tree.insert(Some(group), Geometry::rect(-50.0, -50.0, 50.0, 50.0));
        let _b = tree.insert(Some(group), Geometry::rect(0.0, 0.0, 50.0, 50.0));
        let (b, _) = oriented_box(&tree, group, None, false);
        assert_box(&b, 50.0, 50.0, 100.0, 100.0, 0.0);
    }

    #[test]
    fn stroke_inflates_unless_ignored() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry {
            stroke_width: 4.0,
            ..Geometry::rect(10.0, 10.0, 100.0, 50.0)
        });
        let with = local_rect(&tree, n, false);
        assert_close(with.width(), 104.0);
        assert_close(with.x0, -2.0);
        let without = local_rect(&tree, n, true);
        assert_close(without.width(), 100.0);
    }

    #[test]
    fn union_of_zero_nodes_is_degenerate() {
        let tree = SceneTree::new();
        assert_eq!(union_box(&tree, &[], None, false), OrientedBox::ZERO);
    }
}
