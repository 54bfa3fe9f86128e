// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identifiers and geometry attributes.

/// Identifier for a node in a [`SceneTree`](crate::SceneTree).
///
/// A small copyable handle made of a slot index and a generation counter.
/// Removing a node frees its slot; a reused slot gets a higher generation, so
/// a stale `NodeId` can never alias a different live node. Use
/// [`SceneTree::is_alive`](crate::SceneTree::is_alive) to check liveness —
/// this doubles as the destruction notification for observers holding ids.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The size descriptor of a node, selected per shape kind.
///
/// The local (untransformed) rectangle of a node follows from its variant:
/// a `Rect` spans `(0, 0)` to `(width, height)`, a `Circle` is centered on
/// the local origin with `width = height = 2 · radius`, and a `Group` has no
/// intrinsic size — its extent is the union of its children.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeSize {
    /// A rectangular shape with explicit width and height.
    Rect {
        /// Native width before scaling.
        width: f64,
        /// Native height before scaling.
        height: f64,
    },
    /// A circular shape; the local origin is the circle center.
    Circle {
        /// Circle radius before scaling.
        radius: f64,
    },
    /// A container whose extent is derived from its children.
    Group,
}

impl Default for ShapeSize {
    fn default() -> Self {
        Self::Rect {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Geometry attributes of a node.
///
/// `(x, y)` positions the node's offset point in parent space; `offset_x` /
/// `offset_y` pick the local pivot used for rotation and scale. `rotation`
/// is in degrees. `stroke_width` inflates the node's visual rectangle by half
/// the stroke on each side (tools may opt out of counting it).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    /// Position x of the offset point, in parent space.
    pub x: f64,
    /// Position y of the offset point, in parent space.
    pub y: f64,
    /// Size descriptor for the node's shape kind.
    pub size: ShapeSize,
    /// Scale along the local x axis. May be negative (mirror).
    pub scale_x: f64,
    /// Scale along the local y axis. May be negative (mirror).
    pub scale_y: f64,
    /// Rotation in degrees about the offset point.
    pub rotation: f64,
    /// Pivot x in local coordinates.
    pub offset_x: f64,
    /// Pivot y in local coordinates.
    pub offset_y: f64,
    /// Stroke width; zero for unstroked shapes.
    pub stroke_width: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size: ShapeSize::default(),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            stroke_width: 0.0,
        }
    }
}

impl Geometry {
    /// A rectangle of the given size at a position.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            size: ShapeSize::Rect { width, height },
            ..Self::default()
        }
    }

    /// A circle of the given radius centered at a position.
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            size: ShapeSize::Circle { radius },
            ..Self::default()
        }
    }

    /// An empty group at a position.
    pub fn group(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: ShapeSize::Group,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity_like() {
        let g = Geometry::default();
        assert_eq!(g.scale_x, 1.0);
        assert_eq!(g.scale_y, 1.0);
        assert_eq!(g.rotation, 0.0);
        assert_eq!(g.size, ShapeSize::Rect {
            width: 0.0,
            height: 0.0
        });
    }

    #[test]
    fn constructors_pick_variants() {
        assert_eq!(
            Geometry::circle(1.0, 2.0, 3.0).size,
            ShapeSize::Circle { radius: 3.0 }
        );
        assert_eq!(Geometry::group(0.0, 0.0).size, ShapeSize::Group);
    }
}
