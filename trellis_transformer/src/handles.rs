// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle identities, anchor layout, hit testing, and cursors.
//!
//! Anchor positions are pure functions of the current box and configuration —
//! they are derived on demand and never stored. All positions are computed on
//! the padded box in box-local (unrotated) space, then rotated by the box
//! rotation and translated to the box origin.

use alloc::vec::Vec;
use kurbo::Point;

use trellis_geom::OrientedBox;
use trellis_geom::angle::normalize_deg;

use crate::config::TransformerConfig;

/// One of the nine interactive anchors around the box.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Handle {
    /// Corner anchor, scales both axes anchored at the bottom-right.
    TopLeft,
    /// Edge anchor, scales the y axis anchored at the bottom edge.
    TopCenter,
    /// Corner anchor, scales both axes anchored at the bottom-left.
    TopRight,
    /// Edge anchor, scales the x axis anchored at the right edge.
    MiddleLeft,
    /// Edge anchor, scales the x axis anchored at the left edge.
    MiddleRight,
    /// Corner anchor, scales both axes anchored at the top-right.
    BottomLeft,
    /// Edge anchor, scales the y axis anchored at the top edge.
    BottomCenter,
    /// Corner anchor, scales both axes anchored at the top-left.
    BottomRight,
    /// Rotation anchor, offset beyond the top-center anchor.
    Rotater,
}

impl Handle {
    /// All nine handles in layout order.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
        Self::Rotater,
    ];

    /// The flag bit for this handle.
    pub const fn flag(self) -> HandleFlags {
        match self {
            Self::TopLeft => HandleFlags::TOP_LEFT,
            Self::TopCenter => HandleFlags::TOP_CENTER,
            Self::TopRight => HandleFlags::TOP_RIGHT,
            Self::MiddleLeft => HandleFlags::MIDDLE_LEFT,
            Self::MiddleRight => HandleFlags::MIDDLE_RIGHT,
            Self::BottomLeft => HandleFlags::BOTTOM_LEFT,
            Self::BottomCenter => HandleFlags::BOTTOM_CENTER,
            Self::BottomRight => HandleFlags::BOTTOM_RIGHT,
            Self::Rotater => HandleFlags::ROTATER,
        }
    }

    /// True for the four corner anchors.
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

bitflags::bitflags! {
    /// The set of anchors a transformer offers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HandleFlags: u16 {
        /// Top-left corner anchor.
        const TOP_LEFT      = 0b0_0000_0001;
        /// Top edge anchor.
        const TOP_CENTER    = 0b0_0000_0010;
        /// Top-right corner anchor.
        const TOP_RIGHT     = 0b0_0000_0100;
        /// Left edge anchor.
        const MIDDLE_LEFT   = 0b0_0000_1000;
        /// Right edge anchor.
        const MIDDLE_RIGHT  = 0b0_0001_0000;
        /// Bottom-left corner anchor.
        const BOTTOM_LEFT   = 0b0_0010_0000;
        /// Bottom edge anchor.
        const BOTTOM_CENTER = 0b0_0100_0000;
        /// Bottom-right corner anchor.
        const BOTTOM_RIGHT  = 0b0_1000_0000;
        /// Rotation anchor.
        const ROTATER       = 0b1_0000_0000;
        /// The eight resize anchors.
        const RESIZE = Self::TOP_LEFT.bits()
            | Self::TOP_CENTER.bits()
            | Self::TOP_RIGHT.bits()
            | Self::MIDDLE_LEFT.bits()
            | Self::MIDDLE_RIGHT.bits()
            | Self::BOTTOM_LEFT.bits()
            | Self::BOTTOM_CENTER.bits()
            | Self::BOTTOM_RIGHT.bits();
        /// Every anchor.
        const ALL = Self::RESIZE.bits() | Self::ROTATER.bits();
    }
}

impl Default for HandleFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Pointer cursor for a handle: eight compass resize directions plus the
/// rotation crosshair. Hosts map these onto their cursor vocabulary.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cursor {
    /// Vertical resize at the top edge.
    NResize,
    /// Diagonal resize toward the top-right.
    NeResize,
    /// Horizontal resize at the right edge.
    EResize,
    /// Diagonal resize toward the bottom-right.
    SeResize,
    /// Vertical resize at the bottom edge.
    SResize,
    /// Diagonal resize toward the bottom-left.
    SwResize,
    /// Horizontal resize at the left edge.
    WResize,
    /// Diagonal resize toward the top-left.
    NwResize,
    /// Rotation anchor cursor.
    Crosshair,
}

/// Anchor position for `handle` in the box's parent space.
///
/// Anchors sit on the box grown by `padding`. The rotater sits
/// `rotate_anchor_offset` beyond the top-center anchor — or beyond the
/// *bottom*-center one when `flip_y` is set, which is how a mirrored
/// (negative-scale-y) node moves its rotation handle to the other side
/// without changing the box's reported rotation.
pub fn anchor_point(
    handle: Handle,
    b: &OrientedBox,
    padding: f64,
    rotate_anchor_offset: f64,
    flip_y: bool,
) -> Point {
    let (w, h, p) = (b.width, b.height, padding);
    let local = match handle {
        Handle::TopLeft => Point::new(-p, -p),
        Handle::TopCenter => Point::new(w / 2.0, -p),
        Handle::TopRight => Point::new(w + p, -p),
        Handle::MiddleLeft => Point::new(-p, h / 2.0),
        Handle::MiddleRight => Point::new(w + p, h / 2.0),
        Handle::BottomLeft => Point::new(-p, h + p),
        Handle::BottomCenter => Point::new(w / 2.0, h + p),
        Handle::BottomRight => Point::new(w + p, h + p),
        Handle::Rotater => {
            if flip_y {
                Point::new(w / 2.0, h + p + rotate_anchor_offset)
            } else {
                Point::new(w / 2.0, -p - rotate_anchor_offset)
            }
        }
    };
    b.local_to_parent(local)
}

/// Anchor positions for every enabled handle.
///
/// Empty when the box is degenerate (nothing attached renders no handles)
/// or not finite.
pub fn layout(
    b: &OrientedBox,
    config: &TransformerConfig,
    flip_y: bool,
) -> Vec<(Handle, Point)> {
    if b.is_degenerate() || !b.is_finite() {
        return Vec::new();
    }
    Handle::ALL
        .iter()
        .filter(|h| config.enabled_handles.contains(h.flag()))
        .filter(|h| **h != Handle::Rotater || config.rotate_enabled)
        .map(|&h| {
            (
                h,
                anchor_point(h, b, config.padding, config.rotate_anchor_offset, flip_y),
            )
        })
        .collect()
}

/// The enabled handle under `point`, if any.
///
/// The nearest anchor within `config.anchor_size` wins.
pub fn hit_handle(
    b: &OrientedBox,
    config: &TransformerConfig,
    flip_y: bool,
    point: Point,
) -> Option<Handle> {
    let mut best: Option<(Handle, f64)> = None;
    for (h, anchor) in layout(b, config, flip_y) {
        let dist = (point - anchor).hypot();
        if dist <= config.anchor_size && best.is_none_or(|(_, d)| dist < d) {
            best = Some((h, dist));
        }
    }
    best.map(|(h, _)| h)
}

/// Compass direction of a resize handle, degrees clockwise from north.
const fn base_direction(handle: Handle) -> Option<f64> {
    match handle {
        Handle::TopLeft => Some(315.0),
        Handle::TopCenter => Some(0.0),
        Handle::TopRight => Some(45.0),
        Handle::MiddleRight => Some(90.0),
        Handle::BottomRight => Some(135.0),
        Handle::BottomCenter => Some(180.0),
        Handle::BottomLeft => Some(225.0),
        Handle::MiddleLeft => Some(270.0),
        Handle::Rotater => None,
    }
}

/// Cursor for a handle on a box rotated by `rotation_deg`.
///
/// The handle's compass direction is mirrored by any scale flips, then
/// rotated by the box rotation bucketed to the nearest 45°, so the cursor's
/// drag axis tracks the visual edge it sits on.
pub fn cursor_for(handle: Handle, rotation_deg: f64, flip_x: bool, flip_y: bool) -> Cursor {
    let Some(mut dir) = base_direction(handle) else {
        return Cursor::Crosshair;
    };
    if flip_x {
        dir = normalize_deg(360.0 - dir);
    }
    if flip_y {
        dir = normalize_deg(180.0 - dir);
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is in [0.5, 8.5) before the cast"
    )]
    let bucket = (normalize_deg(rotation_deg) / 45.0 + 0.5) as i32 % 8;
    #[allow(
        clippy::cast_possible_truncation,
        reason = "dir is an exact multiple of 45 in [0, 360)"
    )]
    let steps = (bucket + dir as i32 / 45) % 8;
    match steps {
        0 => Cursor::NResize,
        1 => Cursor::NeResize,
        2 => Cursor::EResize,
        3 => Cursor::SeResize,
        4 => Cursor::SResize,
        5 => Cursor::SwResize,
        6 => Cursor::WResize,
        _ => Cursor::NwResize,
    }
}
