// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An oriented bounding box: a rectangle with position, size, and rotation.
//!
//! The box lives in the coordinate space of its owner's parent (the "target
//! space" of a transform cage) and is the currency between the bounding-box
//! resolver, the fit solver, and handle layout. A *published* box always has
//! non-negative dimensions; mirroring is expressed through node scale signs,
//! never through the box. Boxes under construction during a drag may pass
//! through negative dimensions on their way into the fit solver, which is how
//! dragging a handle across its anchor mirrors the node.

use kurbo::{Point, Rect, Vec2};

/// Rotate a vector by an angle in degrees.
pub fn rotate_vec(v: Vec2, deg: f64) -> Vec2 {
    let u = Vec2::from_angle(deg.to_radians());
    Vec2::new(v.x * u.x - v.y * u.y, v.x * u.y + v.y * u.x)
}

/// A rectangle with position, width, height, and rotation (degrees).
///
/// `(x, y)` is the rotated rectangle's origin corner (the local top-left),
/// not its axis-aligned minimum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientedBox {
    /// Origin corner x, in parent space.
    pub x: f64,
    /// Origin corner y, in parent space.
    pub y: f64,
    /// Extent along the box-local x axis.
    pub width: f64,
    /// Extent along the box-local y axis.
    pub height: f64,
    /// Rotation in degrees about the origin corner.
    pub rotation: f64,
}

impl OrientedBox {
    /// The degenerate box at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
        rotation: 0.0,
    };

    /// Create a box from explicit parts.
    pub const fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation,
        }
    }

    /// An axis-aligned box covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height(), 0.0)
    }

    /// The origin corner in parent space.
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map a box-local point into parent space.
    pub fn local_to_parent(&self, p: Point) -> Point {
        self.origin() + rotate_vec(p.to_vec2(), self.rotation)
    }

    /// Map a parent-space point into box-local coordinates.
    pub fn parent_to_local(&self, p: Point) -> Point {
        let v = rotate_vec(p - self.origin(), -self.rotation);
        Point::new(v.x, v.y)
    }

    /// The box center in parent space.
    pub fn center(&self) -> Point {
        self.local_to_parent(Point::new(self.width / 2.0, self.height / 2.0))
    }

    /// The four corners in parent space, origin corner first, local winding.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.local_to_parent(Point::new(0.0, 0.0)),
            self.local_to_parent(Point::new(self.width, 0.0)),
            self.local_to_parent(Point::new(self.width, self.height)),
            self.local_to_parent(Point::new(0.0, self.height)),
        ]
    }

    /// Axis-aligned bounds of the rotated box, in parent space.
    pub fn aabb(&self) -> Rect {
        let [a, b, c, d] = self.corners();
        Rect::new(
            a.x.min(b.x).min(c.x).min(d.x),
            a.y.min(b.y).min(c.y).min(d.y),
            a.x.max(b.x).max(c.x).max(d.x),
            a.y.max(b.y).max(c.y).max(d.y),
        )
    }

    /// Grow the box by `padding` on every side, keeping rotation.
    pub fn outset(&self, padding: f64) -> Self {
        let origin = self.local_to_parent(Point::new(
            -padding * self.width.signum_or_one(),
            -padding * self.height.signum_or_one(),
        ));
        Self::new(
            origin.x,
            origin.y,
            self.width.grow_magnitude(2.0 * padding),
            self.height.grow_magnitude(2.0 * padding),
            self.rotation,
        )
    }

    /// Shrink the box by `padding` on every side, keeping rotation.
    ///
    /// Dimension magnitudes clamp at zero rather than crossing it; the sign
    /// of a negative (mirrored, under-construction) dimension is preserved.
    pub fn inset(&self, padding: f64) -> Self {
        let origin = self.local_to_parent(Point::new(
            padding * self.width.signum_or_one(),
            padding * self.height.signum_or_one(),
        ));
        Self::new(
            origin.x,
            origin.y,
            self.width.shrink_magnitude(2.0 * padding),
            self.height.shrink_magnitude(2.0 * padding),
            self.rotation,
        )
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.rotation.is_finite()
    }

    /// True when the box has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Sign-aware magnitude adjustments for possibly-mirrored dimensions.
trait DimExt {
    fn signum_or_one(self) -> f64;
    fn grow_magnitude(self, by: f64) -> f64;
    fn shrink_magnitude(self, by: f64) -> f64;
}

impl DimExt for f64 {
    fn signum_or_one(self) -> f64 {
        if self < 0.0 { -1.0 } else { 1.0 }
    }

    fn grow_magnitude(self, by: f64) -> f64 {
        (self.abs() + by).max(0.0) * self.signum_or_one()
    }

    fn shrink_magnitude(self, by: f64) -> f64 {
        (self.abs() - by).max(0.0) * self.signum_or_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_pt(p: Point, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "{p:?}");
    }

    #[test]
    fn corners_of_axis_aligned_box() {
        let b = OrientedBox::new(10.0, 20.0, 100.0, 50.0, 0.0);
        let [a, c, d, e] = b.corners();
        assert_pt(a, 10.0, 20.0);
        assert_pt(c, 110.0, 20.0);
        assert_pt(d, 110.0, 70.0);
        assert_pt(e, 10.0, 70.0);
    }

    #[test]
    fn rotation_maps_local_points() {
        let b = OrientedBox::new(100.0, 0.0, 80.0, 40.0, 90.0);
        // Local +x maps to parent +y under a 90° rotation.
        assert_pt(b.local_to_parent(Point::new(80.0, 0.0)), 100.0, 80.0);
        assert_pt(b.parent_to_local(Point::new(100.0, 80.0)), 80.0, 0.0);
    }

    #[test]
    fn center_of_rotated_box() {
        let b = OrientedBox::new(0.0, 0.0, 100.0, 100.0, 90.0);
        assert_pt(b.center(), -50.0, 50.0);
    }

    #[test]
    fn inset_strips_padding_symmetrically() {
        let b = OrientedBox::new(0.0, 0.0, 120.0, 120.0, 0.0);
        let inner = b.inset(10.0);
        assert_pt(inner.origin(), 10.0, 10.0);
        assert_eq!(inner.width, 100.0);
        assert_eq!(inner.height, 100.0);
    }

    #[test]
    fn inset_clamps_at_zero_size() {
        let b = OrientedBox::new(0.0, 0.0, 10.0, 10.0, 0.0);
        let inner = b.inset(20.0);
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
    }

    #[test]
    fn inset_respects_rotation() {
        let b = OrientedBox::new(120.0, 0.0, 120.0, 120.0, 90.0);
        let inner = b.inset(10.0);
        // Rotated (10, 10) is (-10, 10) in parent space.
        assert_pt(inner.origin(), 110.0, 10.0);
        assert_eq!(inner.width, 100.0);
    }

    #[test]
    fn outset_inverts_inset() {
        let b = OrientedBox::new(5.0, 6.0, 70.0, 30.0, 33.0);
        let round = b.outset(4.0).inset(4.0);
        assert_pt(round.origin(), 5.0, 6.0);
        assert!((round.width - 70.0).abs() < 1e-9);
        assert!((round.height - 30.0).abs() < 1e-9);
    }

    #[test]
    fn mirrored_dimension_keeps_sign_through_inset() {
        let b = OrientedBox::new(0.0, 0.0, -50.0, 40.0, 0.0);
        let inner = b.inset(5.0);
        assert_eq!(inner.width, -40.0);
        assert_eq!(inner.height, 30.0);
        assert_pt(inner.origin(), -5.0, 5.0);
    }

    #[test]
    fn aabb_of_rotated_square() {
        let b = OrientedBox::new(0.0, 0.0, 100.0, 100.0, 90.0);
        let r = b.aabb();
        assert!((r.x0 - -100.0).abs() < 1e-9);
        assert!((r.y0 - 0.0).abs() < 1e-9);
        assert!((r.width() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_and_finite_checks() {
        assert!(OrientedBox::ZERO.is_degenerate());
        assert!(OrientedBox::ZERO.is_finite());
        let nan = OrientedBox::new(f64::NAN, 0.0, 1.0, 1.0, 0.0);
        assert!(!nan.is_finite());
    }
}
