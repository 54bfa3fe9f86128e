// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene tree: structure, attribute access, transform chains.

use alloc::vec::Vec;
use kurbo::Affine;
use trellis_geom::affine;

use crate::types::{Geometry, NodeId};

/// A hierarchy of drawable nodes with geometry attributes.
///
/// Nodes are stored in a slot arena; [`NodeId`]s are generational so removal
/// invalidates outstanding ids instead of letting them alias reused slots.
pub struct SceneTree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    redraw_requests: u64,
}

impl core::fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("SceneTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("redraw_requests", &self.redraw_requests)
            .finish_non_exhaustive()
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    geometry: Geometry,
    epoch: u64,
}

impl SceneTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            redraw_requests: 0,
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, geometry: Geometry) -> NodeId {
        let node = Node {
            generation: 0, // patched below
            parent: None,
            children: Vec::new(),
            geometry,
            epoch: 1,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node { generation, ..node });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node { generation, ..node }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            if self.is_alive(p) {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
                if let Some(n) = self.node_mut(id) {
                    n.parent = Some(p);
                }
            }
        }
        id
    }

    /// Remove a node and its whole subtree. Stale ids become dead.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(pn) = self.node_mut(parent) {
                pn.children.retain(|c| *c != id);
            }
        }
        let children = self
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The parent of a node, or `None` for roots and dead ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// The children of a node, empty for leaves and dead ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Read a node's geometry.
    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.node(id).map(|n| &n.geometry)
    }

    /// Replace a node's geometry. Bumps the geometry epoch.
    ///
    /// Returns false (and does nothing) for a dead id.
    pub fn set_geometry(&mut self, id: NodeId, geometry: Geometry) -> bool {
        self.update_geometry(id, |g| *g = geometry)
    }

    /// Mutate a node's geometry in place. Bumps the geometry epoch.
    ///
    /// Returns false (and does nothing) for a dead id.
    pub fn update_geometry(&mut self, id: NodeId, f: impl FnOnce(&mut Geometry)) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                f(&mut n.geometry);
                n.epoch += 1;
                true
            }
            None => false,
        }
    }

    /// The node's geometry epoch: bumped on every write, never reset.
    ///
    /// Observers record the epoch they last acted on and compare once per
    /// frame; a burst of attribute writes coalesces into one observable
    /// change. `None` for dead ids.
    pub fn geometry_epoch(&self, id: NodeId) -> Option<u64> {
        self.node(id).map(|n| n.epoch)
    }

    /// The node's transform relative to its parent, composed from attributes.
    ///
    /// Identity for dead ids.
    pub fn local_transform(&self, id: NodeId) -> Affine {
        self.node(id).map_or(Affine::IDENTITY, |n| {
            let g = &n.geometry;
            affine::compose(
                g.x, g.y, g.rotation, g.scale_x, g.scale_y, g.offset_x, g.offset_y,
            )
        })
    }

    /// The transform from `id`'s local space into an ancestor's space.
    ///
    /// Multiplies local transforms from `id` up to, but excluding,
    /// `ancestor`. `None` means root (world) space. If `ancestor` is never
    /// reached the full chain to the root is returned.
    pub fn transform_to(&self, id: NodeId, ancestor: Option<NodeId>) -> Affine {
        let mut m = self.local_transform(id);
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if Some(p) == ancestor {
                break;
            }
            m = self.local_transform(p) * m;
            cur = self.parent(p);
        }
        m
    }

    /// Ask the host to redraw. Calls are counted, not deduplicated.
    pub fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    /// Total number of redraw requests issued so far.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// Return the pending redraw-request count and reset it to zero.
    pub fn take_redraw_requests(&mut self) -> u64 {
        core::mem::take(&mut self.redraw_requests)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeSize;
    use kurbo::Point;

    #[test]
    fn insert_remove_and_generations() {
        let mut tree = SceneTree::new();
        let a = tree.insert(None, Geometry::rect(0.0, 0.0, 10.0, 10.0));
        assert!(tree.is_alive(a));
        tree.remove(a);
        assert!(!tree.is_alive(a));

        // Slot reuse yields a distinct id; the stale id stays dead.
        let b = tree.insert(None, Geometry::rect(0.0, 0.0, 5.0, 5.0));
        assert_ne!(a, b);
        assert!(!tree.is_alive(a));
        assert!(tree.is_alive(b));
    }

    #[test]
    fn remove_takes_subtree() {
        let mut tree = SceneTree::new();
        let g = tree.insert(None, Geometry::group(0.0, 0.0));
        let child = tree.insert(Some(g), Geometry::rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tree.parent(child), Some(g));
        tree.remove(g);
        assert!(!tree.is_alive(child));
    }

    #[test]
    fn epoch_bumps_on_writes_only() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry::rect(0.0, 0.0, 10.0, 10.0));
        let e0 = tree.geometry_epoch(n).unwrap();
        assert!(tree.update_geometry(n, |g| g.x = 5.0));
        assert!(tree.update_geometry(n, |g| g.y = 5.0));
        let e1 = tree.geometry_epoch(n).unwrap();
        assert_eq!(e1, e0 + 2);
        // Reads do not bump.
        let _ = tree.geometry(n);
        assert_eq!(tree.geometry_epoch(n), Some(e1));
        // Dead ids refuse writes.
        tree.remove(n);
        assert!(!tree.update_geometry(n, |g| g.x = 1.0));
    }

    #[test]
    fn local_transform_applies_offset_and_scale() {
        let mut tree = SceneTree::new();
        let n = tree.insert(None, Geometry {
            x: 100.0,
            y: 100.0,
            size: ShapeSize::Rect {
                width: 10.0,
                height: 10.0,
            },
            scale_x: 2.0,
            offset_x: 5.0,
            offset_y: 5.0,
            ..Geometry::default()
        });
        let m = tree.local_transform(n);
        // The offset point (5, 5) maps to the node position.
        let p = m * Point::new(5.0, 5.0);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn transform_to_stops_below_ancestor() {
        let mut tree = SceneTree::new();
        let outer = tree.insert(None, Geometry::group(100.0, 0.0));
        let inner = tree.insert(Some(outer), Geometry::group(10.0, 0.0));
        let leaf = tree.insert(Some(inner), Geometry::rect(1.0, 0.0, 5.0, 5.0));

        let to_inner = tree.transform_to(leaf, Some(inner));
        assert!((to_inner * Point::ORIGIN).x - 1.0 < 1e-9);

        let to_outer = tree.transform_to(leaf, Some(outer));
        let p = to_outer * Point::ORIGIN;
        assert!((p.x - 11.0).abs() < 1e-9);

        let to_world = tree.transform_to(leaf, None);
        let q = to_world * Point::ORIGIN;
        assert!((q.x - 111.0).abs() < 1e-9);
    }

    #[test]
    fn redraw_accounting() {
        let mut tree = SceneTree::new();
        tree.request_redraw();
        tree.request_redraw();
        assert_eq!(tree.redraw_requests(), 2);
        assert_eq!(tree.take_redraw_requests(), 2);
        assert_eq!(tree.redraw_requests(), 0);
    }
}
