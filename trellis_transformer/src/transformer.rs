// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transformer facade: attachment, the drag state machine, change
//! observation.

use alloc::vec;
use alloc::vec::Vec;
use kurbo::{Point, Vec2};

use trellis_geom::angle::{signed_diff_deg, snap_deg};
use trellis_geom::obox::{OrientedBox, rotate_vec};
use trellis_scene::{NodeId, SceneTree};

use crate::config::TransformerConfig;
use crate::handles::{self, Cursor, Handle};
use crate::{fit, resolve};

/// Emitted by the pointer methods; the host forwards these to listeners.
///
/// Events carry no payload; the active anchor is observable through
/// [`Transformer::active_handle`] while a session runs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransformerEvent {
    /// A drag session began on a handle.
    TransformStart,
    /// Node attributes were written by a drag step.
    Transform,
    /// The drag session ended. Emitted at most once per session.
    TransformEnd,
}

/// An active drag, measured against the box captured at pointer-down.
///
/// Each move re-derives the proposal from `start_outer` and the current
/// pointer, so a step rejected by the bound-box constraint leaves nothing
/// stale behind.
struct DragSession {
    handle: Handle,
    /// The padded box at pointer-down, in target space.
    start_outer: OrientedBox,
    /// Attribute scale signs at pointer-down. Proposals are measured
    /// against `start_outer`, so fits must stay relative to these rather
    /// than the live signs, or crossing an anchor flips the mirror on
    /// every subsequent move.
    sign_x: f64,
    sign_y: f64,
    /// Rotation accumulated across moves, free of ±180° wrapping.
    rotation_accum: f64,
    /// Pointer angle around the box center at the last step, degrees.
    last_angle: f64,
}

/// A transform cage over one or more nodes of a [`SceneTree`].
///
/// The transformer owns no scene state beyond the ids it watches. It reads
/// the tree to resolve its box and writes node attributes back through
/// [`fit`]; everything else (its box, handle layout, flip flags) is derived.
///
/// All coordinates taken and returned are in *target space*: the parent of
/// the attached node(s), or world space for roots.
pub struct Transformer {
    config: TransformerConfig,
    target: Option<NodeId>,
    nodes: Vec<NodeId>,
    /// Geometry epochs last acted on, one per attached node.
    watches: Vec<(NodeId, u64)>,
    bbox: OrientedBox,
    flip_x: bool,
    flip_y: bool,
    /// Attribute scale signs of the single attached node, `(1, 1)` otherwise.
    attr_signs: (f64, f64),
    session: Option<DragSession>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Transformer")
            .field("nodes", &self.nodes)
            .field("bbox", &self.bbox)
            .field("flip_x", &self.flip_x)
            .field("flip_y", &self.flip_y)
            .field("transforming", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl Transformer {
    /// A detached transformer with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TransformerConfig::default())
    }

    /// A detached transformer with `config`.
    pub fn with_config(config: TransformerConfig) -> Self {
        Self {
            config,
            target: None,
            nodes: Vec::new(),
            watches: Vec::new(),
            bbox: OrientedBox::ZERO,
            flip_x: false,
            flip_y: false,
            attr_signs: (1.0, 1.0),
            session: None,
        }
    }

    /// Attach to a single node. The cage lives in the node's parent space.
    ///
    /// Replaces any previous attachment and cancels an active drag without
    /// an end event. Dead ids leave the transformer detached.
    pub fn attach_to(&mut self, tree: &SceneTree, id: NodeId) {
        self.set_nodes(tree, &[id]);
    }

    /// Attach to several nodes at once, framed by their axis-aligned union.
    ///
    /// The target space is the first node's parent; callers are expected to
    /// pass siblings. Dead ids are dropped.
    pub fn set_nodes(&mut self, tree: &SceneTree, ids: &[NodeId]) {
        self.session = None;
        self.nodes = ids.iter().copied().filter(|&id| tree.is_alive(id)).collect();
        self.target = self.nodes.first().and_then(|&id| tree.parent(id));
        self.refresh(tree);
    }

    /// Detach from all nodes.
    ///
    /// Cancels an active drag *without* emitting [`TransformerEvent::TransformEnd`]:
    /// detaching mid-drag abandons the session rather than completing it.
    pub fn detach(&mut self) {
        self.session = None;
        self.nodes.clear();
        self.watches.clear();
        self.target = None;
        self.bbox = OrientedBox::ZERO;
        self.flip_x = false;
        self.flip_y = false;
        self.attr_signs = (1.0, 1.0);
    }

    /// The attached node ids.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// True while a drag session is active.
    pub fn is_transforming(&self) -> bool {
        self.session.is_some()
    }

    /// The handle grabbed by the active drag session, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        self.session.as_ref().map(|s| s.handle)
    }

    /// The current box in target space. Degenerate when detached.
    pub fn bounding_box(&self) -> OrientedBox {
        self.bbox
    }

    /// Anchor positions for every enabled handle, in target space.
    pub fn handle_layout(&self) -> Vec<(Handle, Point)> {
        handles::layout(&self.bbox, &self.config, self.flip_y)
    }

    /// The cursor to show at `point`, if it hits an enabled handle.
    pub fn cursor_at(&self, point: Point) -> Option<Cursor> {
        handles::hit_handle(&self.bbox, &self.config, self.flip_y, point)
            .map(|h| handles::cursor_for(h, self.bbox.rotation, self.flip_x, self.flip_y))
    }

    /// The active configuration.
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Replace the configuration. Refused (returning false) during a drag.
    pub fn set_config(&mut self, tree: &SceneTree, config: TransformerConfig) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.config = config;
        self.refresh(tree);
        true
    }

    /// Recompute the box from the tree and request a redraw.
    pub fn force_update(&mut self, tree: &mut SceneTree) {
        self.refresh(tree);
        tree.request_redraw();
    }

    /// Poll the attached nodes for external changes, once per frame.
    ///
    /// Compares geometry epochs against the ones last acted on; any burst of
    /// attribute writes since the last call coalesces into one recomputation
    /// and one redraw request. Nodes removed from the tree are dropped from
    /// the attachment, and a node death during a drag cancels the session
    /// without an end event. Returns true if anything changed.
    pub fn sync(&mut self, tree: &mut SceneTree) -> bool {
        if self.watches.is_empty() {
            return false;
        }
        let mut any_dead = false;
        let mut changed = false;
        for &(id, epoch) in &self.watches {
            match tree.geometry_epoch(id) {
                Some(e) => changed |= e != epoch,
                None => {
                    any_dead = true;
                    changed = true;
                }
            }
        }
        if !changed {
            return false;
        }
        if any_dead {
            self.session = None;
            self.nodes.retain(|&id| tree.is_alive(id));
        }
        self.refresh(tree);
        tree.request_redraw();
        true
    }

    /// Begin a drag if `point` hits an enabled handle.
    pub fn pointer_down(&mut self, point: Point) -> Vec<TransformerEvent> {
        if self.session.is_some() {
            return Vec::new();
        }
        let Some(handle) = handles::hit_handle(&self.bbox, &self.config, self.flip_y, point)
        else {
            return Vec::new();
        };
        let start_outer = self.bbox.outset(self.config.padding);
        let last_angle = (point - start_outer.center()).atan2().to_degrees();
        self.session = Some(DragSession {
            handle,
            start_outer,
            sign_x: self.attr_signs.0,
            sign_y: self.attr_signs.1,
            rotation_accum: 0.0,
            last_angle,
        });
        vec![TransformerEvent::TransformStart]
    }

    /// Advance the active drag to `point`, writing node attributes.
    ///
    /// Emits [`TransformerEvent::Transform`] when attributes were written; a
    /// step rejected by the bound-box constraint emits nothing.
    pub fn pointer_move(&mut self, tree: &mut SceneTree, point: Point) -> Vec<TransformerEvent> {
        let Some(session) = &mut self.session else {
            return Vec::new();
        };
        let (sign_x, sign_y) = (session.sign_x, session.sign_y);
        let proposal = if session.handle == Handle::Rotater {
            let center = session.start_outer.center();
            let angle = (point - center).atan2().to_degrees();
            session.rotation_accum += signed_diff_deg(session.last_angle, angle);
            session.last_angle = angle;
            let desired = session.start_outer.rotation + session.rotation_accum;
            let rotation = snap_deg(
                desired,
                &self.config.rotation_snaps,
                self.config.rotation_snap_tolerance,
            );
            rotate_about_center(&session.start_outer, rotation)
        } else {
            resize_proposal(session, point, &self.config)
        };
        if self.apply_box(tree, &proposal, sign_x, sign_y) {
            vec![TransformerEvent::Transform]
        } else {
            Vec::new()
        }
    }

    /// End the active drag.
    pub fn pointer_up(&mut self, _point: Point) -> Vec<TransformerEvent> {
        self.stop_transform()
    }

    /// End the active drag programmatically.
    ///
    /// Emits exactly one [`TransformerEvent::TransformEnd`]; idempotent when
    /// no drag is active.
    pub fn stop_transform(&mut self) -> Vec<TransformerEvent> {
        if self.session.take().is_some() {
            vec![TransformerEvent::TransformEnd]
        } else {
            Vec::new()
        }
    }

    /// Constrain `proposed`, write node attributes, and re-resolve.
    ///
    /// The write and the redraw request happen in that order, so a host
    /// redrawing on request always sees the new attributes.
    fn apply_box(
        &mut self,
        tree: &mut SceneTree,
        proposed: &OrientedBox,
        sign_x: f64,
        sign_y: f64,
    ) -> bool {
        let p = self.config.padding;
        let constrained = match &self.config.bound_box_fn {
            Some(f) => {
                let old = self.bbox.outset(p);
                let c = f(proposed, &old);
                if !constrained_box_is_valid(&c, p) {
                    return false;
                }
                c
            }
            None => *proposed,
        };
        match self.nodes.as_slice() {
            [] => return false,
            &[id] => {
                fit::fit_node_with_signs(
                    tree,
                    id,
                    &constrained,
                    p,
                    self.config.ignore_stroke,
                    sign_x,
                    sign_y,
                );
            }
            ids => {
                fit::fit_group(tree, ids, &constrained, &self.bbox, p);
            }
        }
        self.refresh(tree);
        tree.request_redraw();
        true
    }

    /// Re-resolve the box, flip flags, and watched epochs from the tree.
    fn refresh(&mut self, tree: &SceneTree) {
        self.nodes.retain(|&id| tree.is_alive(id));
        match self.nodes.as_slice() {
            [] => {
                self.bbox = OrientedBox::ZERO;
                self.flip_x = false;
                self.flip_y = false;
                self.attr_signs = (1.0, 1.0);
            }
            &[id] => {
                let (b, d) =
                    resolve::oriented_box(tree, id, self.target, self.config.ignore_stroke);
                self.bbox = b;
                self.flip_x = d.scale_x < 0.0;
                self.flip_y = d.scale_y < 0.0;
                self.attr_signs = tree
                    .geometry(id)
                    .map_or((1.0, 1.0), |g| (sign_or_one(g.scale_x), sign_or_one(g.scale_y)));
            }
            ids => {
                self.bbox =
                    resolve::union_box(tree, ids, self.target, self.config.ignore_stroke);
                self.flip_x = false;
                self.flip_y = false;
                self.attr_signs = (1.0, 1.0);
            }
        }
        self.watches = self
            .nodes
            .iter()
            .map(|&id| (id, tree.geometry_epoch(id).unwrap_or(0)))
            .collect();
    }
}

/// `b` rotated to `rotation` about its own center, dimensions kept.
fn rotate_about_center(b: &OrientedBox, rotation: f64) -> OrientedBox {
    let center = b.center();
    let half = rotate_vec(Vec2::new(b.width / 2.0, b.height / 2.0), rotation);
    OrientedBox::new(center.x - half.x, center.y - half.y, b.width, b.height, rotation)
}

fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// A bound-box-fn result is honored only if it is usable; otherwise the
/// drag step fails open (no write).
fn constrained_box_is_valid(b: &OrientedBox, padding: f64) -> bool {
    b.is_finite() && b.width.abs() >= 2.0 * padding && b.height.abs() >= 2.0 * padding
}

/// The resize proposal for the current pointer, in target space.
///
/// Works in the start box's local frame: the grabbed edge(s) follow the
/// pointer, the opposite edge(s) stay anchored. A dimension dragged across
/// its anchor goes negative, which downstream becomes a mirrored scale.
fn resize_proposal(session: &DragSession, point: Point, config: &TransformerConfig) -> OrientedBox {
    let outer = &session.start_outer;
    let lp = outer.parent_to_local(point);
    let (mut x0, mut y0, mut x1, mut y1) = (0.0, 0.0, outer.width, outer.height);
    match session.handle {
        Handle::TopLeft => {
            x0 = lp.x;
            y0 = lp.y;
        }
        Handle::TopCenter => y0 = lp.y,
        Handle::TopRight => {
            x1 = lp.x;
            y0 = lp.y;
        }
        Handle::MiddleLeft => x0 = lp.x,
        Handle::MiddleRight => x1 = lp.x,
        Handle::BottomLeft => {
            x0 = lp.x;
            y1 = lp.y;
        }
        Handle::BottomCenter => y1 = lp.y,
        Handle::BottomRight => {
            x1 = lp.x;
            y1 = lp.y;
        }
        Handle::Rotater => unreachable!("rotation is not a resize"),
    }

    if config.keep_ratio
        && session.handle.is_corner()
        && outer.width != 0.0
        && outer.height != 0.0
    {
        let ratio = (outer.width / outer.height).abs();
        let w = x1 - x0;
        let h = y1 - y0;
        // The axis with the larger relative change wins; the other follows.
        if (w / outer.width).abs() > (h / outer.height).abs() {
            let new_h = w.abs() / ratio * sign_or_one(h);
            match session.handle {
                Handle::TopLeft | Handle::TopRight => y0 = y1 - new_h,
                _ => y1 = y0 + new_h,
            }
        } else {
            let new_w = h.abs() * ratio * sign_or_one(w);
            match session.handle {
                Handle::TopLeft | Handle::BottomLeft => x0 = x1 - new_w,
                _ => x1 = x0 + new_w,
            }
        }
    }

    let origin = outer.local_to_parent(Point::new(x0, y0));
    OrientedBox::new(origin.x, origin.y, x1 - x0, y1 - y0, outer.rotation)
}
