// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: a minimal retained node substrate for interactive tools.
//!
//! This crate supplies the services an on-canvas control needs from its host
//! render pipeline, and nothing more:
//!
//! - A hierarchy of drawable nodes with stable generational [`NodeId`]s.
//! - Per-node [`Geometry`] attributes (position, size descriptor, scale,
//!   rotation, offset, stroke width) with getter/setter access.
//! - A coalesced change signal: every geometry write bumps the node's
//!   **geometry epoch**. Observers poll epochs once per frame instead of
//!   registering per-attribute callbacks, so a burst of writes produces a
//!   single observable change.
//! - Ancestry traversal and attribute-derived transform chains.
//! - Redraw-request accounting ([`SceneTree::request_redraw`]) so callers and
//!   tests can assert how many redraws an interaction asked for.
//!
//! It is *not* a renderer, a layout engine, or a spatial index: there is no
//! display list, no damage tracking, no hit acceleration. Tools that need
//! those concerns bring their own.
//!
//! Node destruction is implicit notification: a removed node's id stops being
//! alive ([`SceneTree::is_alive`]), and stale ids never alias a later node.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::SceneTree;
pub use types::{Geometry, NodeId, ShapeSize};
