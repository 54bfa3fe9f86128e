// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Geom: Kurbo-native helpers for oriented boxes and attribute-style transforms.
//!
//! This crate is the geometric substrate shared by the Trellis workspace.
//!
//! - [`affine`] composes a [`kurbo::Affine`] from the usual drawable-node
//!   attributes (position, rotation, scale, offset) and decomposes one back,
//!   with a rotation hint that resolves the mirror ambiguity, so mirrored
//!   scales do not show up as a spurious 180° rotation.
//! - [`obox`] provides [`OrientedBox`](obox::OrientedBox), a rectangle with a
//!   rotation, expressed in its parent's coordinate space. This is the value
//!   type a transform cage publishes and fits nodes into.
//! - [`angle`] holds small degree arithmetic helpers, including snap-list
//!   resolution for rotation handles.
//!
//! Angles on every public surface of this workspace are **degrees**; radians
//! appear only inside function bodies where kurbo needs them.
//!
//! This crate is `no_std`.

#![no_std]

pub mod affine;
pub mod angle;
pub mod obox;

pub use affine::Decomposition;
pub use obox::OrientedBox;
