// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Transformer: an on-canvas transform cage for drawable nodes.
//!
//! Given one or more target nodes in a [`trellis_scene::SceneTree`], this
//! crate computes their oriented bounding box, lays out eight resize anchors
//! plus a rotation anchor around it, and — as a pointer drags an anchor —
//! solves the inverse problem: which node attributes (position, scale,
//! rotation) reproduce the dragged box, honoring padding, aspect lock,
//! rotation snapping, and mirrored (negative) scale.
//!
//! ## Structure
//!
//! - [`resolve`] — forward problem: node attributes → oriented box in the
//!   cage's target space, including multi-node unions.
//! - [`fit`] — inverse problem: desired box → node attribute writes.
//! - [`handles`] — anchor identities, layout, hit testing, cursors.
//! - [`config`] — the immutable-per-drag configuration set.
//! - [`Transformer`] — the facade owning the drag state machine.
//!
//! ## Interaction model
//!
//! The transformer is synchronous and event-driven. Pointer callbacks return
//! the emitted [`TransformerEvent`]s instead of invoking registered
//! listeners, and scene changes are observed by polling geometry epochs via
//! [`Transformer::sync`] — one coalesced recomputation per frame, never a
//! per-attribute callback storm. Attribute writes always happen before the
//! single redraw request a step issues.
//!
//! ```
//! use trellis_scene::{Geometry, SceneTree};
//! use trellis_transformer::Transformer;
//!
//! let mut tree = SceneTree::new();
//! let rect = tree.insert(None, Geometry::rect(100.0, 60.0, 100.0, 100.0));
//!
//! let mut tr = Transformer::new();
//! tr.attach_to(&tree, rect);
//! let b = tr.bounding_box();
//! assert_eq!((b.x, b.y, b.width, b.height), (100.0, 60.0, 100.0, 100.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod fit;
pub mod handles;
pub mod resolve;

mod transformer;

pub use config::TransformerConfig;
pub use handles::{Cursor, Handle, HandleFlags};
pub use transformer::{Transformer, TransformerEvent};
