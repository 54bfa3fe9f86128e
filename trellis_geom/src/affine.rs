// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compose and decompose affine transforms in node-attribute terms.
//!
//! Drawable nodes carry their transform as attributes — position, rotation,
//! non-uniform scale, and an offset acting as the rotate/scale pivot — rather
//! than as a raw matrix. [`compose`] folds those attributes into a
//! [`kurbo::Affine`]; [`decompose`] extracts them back out of an arbitrary
//! (non-skewing) matrix chain.
//!
//! Decomposition of a mirrored matrix is ambiguous: `(θ, sx, sy)` and
//! `(θ + 180°, −sx, −sy)` denote the same matrix. [`decompose_continuous`]
//! resolves the ambiguity against a rotation hint — typically the rotation
//! the caller expects from node attributes — so an x-mirrored node reports
//! `(θ, −sx, sy)` rather than a spurious half turn, and a node crossing a
//! scale zero does not appear to spin.

use kurbo::{Affine, Vec2};

/// The determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Error returned by [`invert`] for a matrix with no usable inverse.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SingularMatrix;

impl core::fmt::Display for SingularMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "matrix is singular (determinant ≈ 0)")
    }
}

impl core::error::Error for SingularMatrix {}

/// Attribute form of a (non-skewing) affine transform.
///
/// Produced by [`decompose`] / [`decompose_continuous`] and consumed by node
/// attribute writers. `rotation` is in degrees. `scale_x` is non-negative in
/// the raw decomposition; any mirroring lands on the sign of `scale_y` (or on
/// both signs when a rotation hint flips the representation).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decomposition {
    /// Translation x.
    pub x: f64,
    /// Translation y.
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Scale along the (rotated) x axis.
    pub scale_x: f64,
    /// Scale along the (rotated) y axis.
    pub scale_y: f64,
}

/// Compose a transform from node attributes.
///
/// Equivalent to `translate(x, y) · rotate(rotation) · scale(sx, sy) ·
/// translate(−offset)`: the offset point of the node's local geometry maps to
/// `(x, y)` and acts as the pivot for rotation and scale.
pub fn compose(
    x: f64,
    y: f64,
    rotation_deg: f64,
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
) -> Affine {
    Affine::translate(Vec2::new(x, y))
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::scale_non_uniform(scale_x, scale_y)
        * Affine::translate(Vec2::new(-offset_x, -offset_y))
}

/// Invert a matrix, failing on a near-zero determinant.
pub fn invert(m: Affine) -> Result<Affine, SingularMatrix> {
    if m.determinant().abs() < SINGULAR_EPSILON {
        Err(SingularMatrix)
    } else {
        Ok(m.inverse())
    }
}

/// Invert a matrix, falling back to the identity when singular.
///
/// Interactive callers prefer a harmless identity over an error: a degenerate
/// configuration keeps the UI responsive instead of propagating NaN.
pub fn safe_invert(m: Affine) -> Affine {
    invert(m).unwrap_or(Affine::IDENTITY)
}

/// Decompose a matrix into attribute form.
///
/// Rotation is the angle of the first basis vector; `scale_x` is that
/// vector's length (≥ 0) and `scale_y` carries the determinant sign, so a
/// mirrored matrix reports a negative `scale_y` rather than a rotated one.
/// Skew present in the input is not representable and is discarded.
pub fn decompose(m: Affine) -> Decomposition {
    let [a, b, c, d, e, f] = m.as_coeffs();
    let basis_x = Vec2::new(a, b);
    let scale_x = basis_x.hypot();
    if scale_x < SINGULAR_EPSILON {
        // First basis collapsed; the second still defines a vertical extent.
        return Decomposition {
            x: e,
            y: f,
            rotation: 0.0,
            scale_x: 0.0,
            scale_y: Vec2::new(c, d).hypot(),
        };
    }
    let det = a * d - b * c;
    Decomposition {
        x: e,
        y: f,
        rotation: basis_x.atan2().to_degrees(),
        scale_x,
        scale_y: det / scale_x,
    }
}

/// Decompose, resolving the mirror ambiguity against a rotation hint.
///
/// Of the two equivalent representations `(θ, sx, sy)` and
/// `(θ + 180°, −sx, −sy)`, returns the one whose rotation is circularly
/// nearer `hint_rotation_deg`. Passing the rotation expected from node
/// attributes keeps an x-mirrored node at its attribute rotation with a
/// negative `scale_x` (the raw decomposition would report it as rotated
/// 180° with a negative `scale_y`), and keeps the extracted rotation
/// continuous across scale-sign changes between frames.
pub fn decompose_continuous(m: Affine, hint_rotation_deg: f64) -> Decomposition {
    let mut d = decompose(m);
    if crate::angle::signed_diff_deg(hint_rotation_deg, d.rotation).abs() > 90.0 {
        d.rotation = crate::angle::normalize_deg(d.rotation + 180.0);
        d.scale_x = -d.scale_x;
        d.scale_y = -d.scale_y;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn compose_decompose_round_trip() {
        let m = compose(10.0, 20.0, 30.0, 2.0, 0.5, 0.0, 0.0);
        let d = decompose(m);
        assert_close(d.x, 10.0);
        assert_close(d.y, 20.0);
        assert_close(d.rotation, 30.0);
        assert_close(d.scale_x, 2.0);
        assert_close(d.scale_y, 0.5);
    }

    #[test]
    fn offset_shifts_translation() {
        // With rotation 0 and scale 1, the offset simply shifts the origin.
        let m = compose(100.0, 100.0, 0.0, 1.0, 1.0, 40.0, 10.0);
        let d = decompose(m);
        assert_close(d.x, 60.0);
        assert_close(d.y, 90.0);
    }

    #[test]
    fn mirror_lands_on_scale_y() {
        let m = compose(0.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0);
        let d = decompose(m);
        assert_close(d.rotation, 0.0);
        assert_close(d.scale_x, 1.0);
        assert_close(d.scale_y, -1.0);
    }

    #[test]
    fn hint_recovers_x_mirror_attributes() {
        // The raw decomposition reports an x-mirror as a half turn.
        let m = compose(0.0, 0.0, 0.0, -1.0, 1.0, 0.0, 0.0);
        let raw = decompose(m);
        assert_close(raw.rotation, 180.0);
        assert_close(raw.scale_y, -1.0);
        // A hint at the attribute rotation recovers the attribute signs.
        let d = decompose_continuous(m, 0.0);
        assert_close(d.rotation, 0.0);
        assert_close(d.scale_x, -1.0);
        assert_close(d.scale_y, 1.0);
        // A hint near the half turn keeps the raw representation.
        let far = decompose_continuous(m, 170.0);
        assert_close(far.rotation, 180.0);
        assert_close(far.scale_y, -1.0);
    }

    #[test]
    fn hint_recovers_rotated_x_mirror() {
        let m = compose(10.0, -3.0, 45.0, -1.25, 0.75, 0.0, 0.0);
        let d = decompose_continuous(m, 45.0);
        assert_close(d.rotation, 45.0);
        assert_close(d.scale_x, -1.25);
        assert_close(d.scale_y, 0.75);
    }

    #[test]
    fn hint_keeps_y_mirror_unflipped() {
        let m = compose(0.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0);
        let d = decompose_continuous(m, 0.0);
        assert_close(d.rotation, 0.0);
        assert_close(d.scale_x, 1.0);
        assert_close(d.scale_y, -1.0);
    }

    #[test]
    fn invert_rejects_singular() {
        let m = Affine::scale_non_uniform(0.0, 1.0);
        assert_eq!(invert(m), Err(SingularMatrix));
        assert_eq!(safe_invert(m), Affine::IDENTITY);
    }

    #[test]
    fn invert_round_trips_points() {
        let m = compose(5.0, -3.0, 72.0, 1.25, 0.75, 2.0, 2.0);
        let inv = invert(m).unwrap();
        let p = kurbo::Point::new(17.0, -4.0);
        let q = inv * (m * p);
        assert_close(q.x, p.x);
        assert_close(q.y, p.y);
    }

    #[test]
    fn degenerate_first_basis() {
        let d = decompose(Affine::scale_non_uniform(0.0, 3.0));
        assert_close(d.scale_x, 0.0);
        assert_close(d.scale_y, 3.0);
        assert_close(d.rotation, 0.0);
    }
}
