// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Degree arithmetic: normalization, signed differences, snap resolution.

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 { r + 360.0 } else { r }
}

/// Shortest signed difference `to − from` in degrees, in `[-180, 180)`.
pub fn signed_diff_deg(from: f64, to: f64) -> f64 {
    let d = normalize_deg(to - from);
    if d >= 180.0 { d - 360.0 } else { d }
}

/// Snap `value` to the nearest entry of `snaps` within `tolerance` degrees.
///
/// Distances are measured on the circle (360° wrap-around), but the returned
/// angle stays in `value`'s own turn: snapping `-90.1°` to a `270°` snap entry
/// yields `-90°`, not `270°`, so accumulated rotation is not discarded.
/// Returns `value` unchanged when no entry is within tolerance.
pub fn snap_deg(value: f64, snaps: &[f64], tolerance: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    for &snap in snaps {
        let diff = signed_diff_deg(value, snap);
        let dist = diff.abs();
        if dist <= tolerance && best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, value + diff));
        }
    }
    best.map_or(value, |(_, snapped)| snapped)
}
