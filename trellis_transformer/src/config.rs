// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transformer configuration.

use alloc::boxed::Box;
use alloc::vec::Vec;

use trellis_geom::OrientedBox;

use crate::handles::HandleFlags;

/// Constrains a proposed box during a drag: `(proposed, old) → constrained`.
///
/// The returned box is authoritative. An invalid result (any non-finite
/// component, or a dimension that goes negative once padding is stripped)
/// fails open: the drag step becomes a no-op and the previous box is kept.
pub type BoundBoxFn = Box<dyn Fn(&OrientedBox, &OrientedBox) -> OrientedBox>;

/// Configuration of a [`Transformer`](crate::Transformer).
///
/// Immutable during a drag session:
/// [`set_config`](crate::Transformer::set_config) is refused while a drag is
/// active.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformerConfig {
    /// Distance between the node box and the anchors, ≥ 0.
    pub padding: f64,
    /// Whether the rotation anchor is offered at all.
    pub rotate_enabled: bool,
    /// Preferred rotations in degrees; empty disables snapping.
    pub rotation_snaps: Vec<f64>,
    /// Snap activation distance in degrees.
    pub rotation_snap_tolerance: f64,
    /// Which anchors are offered.
    pub enabled_handles: HandleFlags,
    /// Lock corner drags to the start box's aspect ratio.
    pub keep_ratio: bool,
    /// Exclude stroke widths from node extents.
    pub ignore_stroke: bool,
    /// Distance of the rotation anchor beyond the top edge.
    pub rotate_anchor_offset: f64,
    /// Anchor hit radius.
    pub anchor_size: f64,
    /// Optional box constraint applied to every drag proposal.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub bound_box_fn: Option<BoundBoxFn>,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            rotate_enabled: true,
            rotation_snaps: Vec::new(),
            rotation_snap_tolerance: 5.0,
            enabled_handles: HandleFlags::ALL,
            keep_ratio: false,
            ignore_stroke: false,
            rotate_anchor_offset: 50.0,
            anchor_size: 10.0,
            bound_box_fn: None,
        }
    }
}

impl core::fmt::Debug for TransformerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransformerConfig")
            .field("padding", &self.padding)
            .field("rotate_enabled", &self.rotate_enabled)
            .field("rotation_snaps", &self.rotation_snaps)
            .field("rotation_snap_tolerance", &self.rotation_snap_tolerance)
            .field("enabled_handles", &self.enabled_handles)
            .field("keep_ratio", &self.keep_ratio)
            .field("ignore_stroke", &self.ignore_stroke)
            .field("rotate_anchor_offset", &self.rotate_anchor_offset)
            .field("anchor_size", &self.anchor_size)
            .field("bound_box_fn", &self.bound_box_fn.as_ref().map(|_| "…"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = TransformerConfig::default();
        assert_eq!(c.padding, 0.0);
        assert!(c.rotate_enabled);
        assert!(c.rotation_snaps.is_empty());
        assert_eq!(c.rotation_snap_tolerance, 5.0);
        assert_eq!(c.enabled_handles, HandleFlags::ALL);
        assert_eq!(c.rotate_anchor_offset, 50.0);
        assert_eq!(c.anchor_size, 10.0);
        assert!(c.bound_box_fn.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialization_skips_bound_box_fn() {
        let mut c = TransformerConfig::default();
        c.bound_box_fn = Some(alloc::boxed::Box::new(|p: &OrientedBox, _: &OrientedBox| *p));
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("bound_box_fn"));
        let back: TransformerConfig = serde_json::from_str(&json).unwrap();
        assert!(back.bound_box_fn.is_none());
    }
}
