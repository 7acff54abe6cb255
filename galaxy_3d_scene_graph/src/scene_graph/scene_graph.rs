/// SceneGraph - arena of nodes addressed by stable keys.
///
/// Structural edits take `&mut self`; bound queries and traversals take
/// `&self`, so a traversal can never observe a half-applied edit. Bounds are
/// computed lazily and cached per node. Every edit that can change a bound
/// invalidates the edited node and, synchronously, all of its ancestors.

use std::sync::Arc;
use glam::Mat4;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::bounding::{BoundingBox, BoundingSphere};
use crate::error::Result;
use crate::{engine_bail, engine_trace};
use crate::scene_graph::{
    Billboard, ChildEdge, ComputeBoundCallback, Drawable, Node, NodeKey, NodeKind, NodeMask,
    PipelineState, ReferenceFrame, Transform,
};
use crate::visitor::{NodeVisitor, TraversalMode};

/// Scene graph
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: SlotMap::with_key() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterate over all node keys
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.keys()
    }

    /// Get a node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Get a node by key, failing with InvalidArgument for an unknown key
    pub fn get(&self, key: NodeKey) -> Result<&Node> {
        match self.nodes.get(key) {
            Some(node) => Ok(node),
            None => engine_bail!("galaxy3d::SceneGraph", InvalidArgument, "unknown node key {:?}", key),
        }
    }

    fn get_mut(&mut self, key: NodeKey) -> Result<&mut Node> {
        match self.nodes.get_mut(key) {
            Some(node) => Ok(node),
            None => engine_bail!("galaxy3d::SceneGraph", InvalidArgument, "unknown node key {:?}", key),
        }
    }

    // ===== CREATION =====

    pub fn create_group(&mut self, name: &str) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Group))
    }

    pub fn create_transform(&mut self, name: &str, transform: Transform) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Transform(transform)))
    }

    pub fn create_geode(&mut self, name: &str) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Geode))
    }

    pub fn create_billboard(&mut self, name: &str, billboard: Billboard) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Billboard(billboard)))
    }

    /// Insert a drawable node (named after the drawable)
    pub fn create_drawable(&mut self, drawable: Drawable) -> NodeKey {
        let name = drawable.name().to_string();
        self.nodes.insert(Node::new(&name, NodeKind::Drawable(drawable)))
    }

    /// Remove a node. It is detached from its parents (which get dirtied) and
    /// its children lose it as a parent; the children themselves stay in the
    /// graph.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<()> {
        let parents = self.get(key)?.parents.clone();
        for parent in parents {
            self.dirty_bound(parent);
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|edge| edge.node != key);
            }
        }

        if let Some(node) = self.nodes.remove(key) {
            for edge in &node.children {
                if let Some(child) = self.nodes.get_mut(edge.node) {
                    child.parents.retain(|p| *p != key);
                }
            }
            engine_trace!("galaxy3d::SceneGraph", "Removed {} '{}'", node.kind.type_name(), node.name);
        }
        Ok(())
    }

    // ===== STRUCTURE =====

    /// Append `child` to `parent`.
    ///
    /// Returns `Ok(false)` without change if `child` is already a child of
    /// `parent`. Fails for unknown keys, for edges a node variant does not
    /// accept (a drawable under a plain group, a non-drawable under a geode,
    /// anything under a drawable) and for edges that would close a cycle.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<bool> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;

        if parent_node.kind.is_drawable() {
            engine_bail!(
                "galaxy3d::SceneGraph",
                InvalidArgument,
                "drawable '{}' cannot have children",
                parent_node.name
            );
        }
        if parent_node.kind.is_geode() && !child_node.kind.is_drawable() {
            engine_bail!(
                "galaxy3d::SceneGraph",
                InvalidArgument,
                "{} '{}' only accepts drawables, got {} '{}'",
                parent_node.kind.type_name(),
                parent_node.name,
                child_node.kind.type_name(),
                child_node.name
            );
        }
        if !parent_node.kind.is_geode() && child_node.kind.is_drawable() {
            engine_bail!(
                "galaxy3d::SceneGraph",
                InvalidArgument,
                "drawable '{}' must be added to a geode, not to {} '{}'",
                child_node.name,
                parent_node.kind.type_name(),
                parent_node.name
            );
        }

        if parent_node.has_child(child) {
            return Ok(false);
        }

        if parent == child || self.is_ancestor(child, parent) {
            engine_bail!(
                "galaxy3d::SceneGraph",
                InvalidArgument,
                "adding '{}' under '{}' would create a cycle",
                child_node.name,
                parent_node.name
            );
        }

        self.get_mut(parent)?.children.push(ChildEdge { node: child, active: true });
        self.get_mut(child)?.parents.push(parent);
        self.dirty_bound(parent);
        Ok(true)
    }

    /// Remove `child` from `parent`. Returns `Ok(false)` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<bool> {
        let parent_node = self.get_mut(parent)?;
        let Some(position) = parent_node.children.iter().position(|edge| edge.node == child) else {
            return Ok(false);
        };
        parent_node.children.remove(position);

        if let Some(child_node) = self.nodes.get_mut(child) {
            if let Some(index) = child_node.parents.iter().position(|p| *p == parent) {
                child_node.parents.remove(index);
            }
        }
        self.dirty_bound(parent);
        Ok(true)
    }

    fn check_geode(&self, geode: NodeKey) -> Result<()> {
        let node = self.get(geode)?;
        if !node.kind.is_geode() {
            engine_bail!(
                "galaxy3d::SceneGraph",
                InvalidArgument,
                "{} '{}' is not a geode",
                node.kind.type_name(),
                node.name
            );
        }
        Ok(())
    }

    /// Append a drawable to a geode (or billboard)
    pub fn add_drawable(&mut self, geode: NodeKey, drawable: NodeKey) -> Result<bool> {
        self.check_geode(geode)?;
        self.add_child(geode, drawable)
    }

    pub fn remove_drawable(&mut self, geode: NodeKey, drawable: NodeKey) -> Result<bool> {
        self.check_geode(geode)?;
        self.remove_child(geode, drawable)
    }

    /// Key of the drawable at `index` in a geode
    pub fn drawable(&self, geode: NodeKey, index: usize) -> Result<NodeKey> {
        self.check_geode(geode)?;
        let node = self.get(geode)?;
        match node.children.get(index) {
            Some(edge) => Ok(edge.node),
            None => engine_bail!(
                "galaxy3d::SceneGraph",
                InvalidArgument,
                "drawable index {} out of range for '{}' ({} drawables)",
                index,
                node.name,
                node.children.len()
            ),
        }
    }

    pub fn num_drawables(&self, geode: NodeKey) -> Result<usize> {
        self.check_geode(geode)?;
        Ok(self.get(geode)?.children.len())
    }

    /// Enable / disable a child edge for `TraverseActiveChildren` visitors
    pub fn set_child_active(&mut self, parent: NodeKey, child: NodeKey, active: bool) -> Result<()> {
        let node = self.get_mut(parent)?;
        match node.children.iter_mut().find(|edge| edge.node == child) {
            Some(edge) => {
                edge.active = active;
                Ok(())
            }
            None => {
                let name = node.name.clone();
                engine_bail!(
                    "galaxy3d::SceneGraph",
                    InvalidArgument,
                    "{:?} is not a child of '{}'",
                    child,
                    name
                )
            }
        }
    }

    pub fn parents(&self, key: NodeKey) -> Result<&[NodeKey]> {
        Ok(&self.get(key)?.parents)
    }

    fn is_ancestor(&self, candidate: NodeKey, key: NodeKey) -> bool {
        let mut visited = FxHashSet::default();
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                for &parent in &node.parents {
                    if parent == candidate {
                        return true;
                    }
                    pending.push(parent);
                }
            }
        }
        false
    }

    /// Every root-to-node path ending at `key` (one per distinct ancestry)
    pub fn parental_node_paths(&self, key: NodeKey) -> Result<Vec<Vec<NodeKey>>> {
        self.get(key)?;
        let mut paths = Vec::new();
        let mut suffix = vec![key];
        self.collect_parental_paths(key, &mut suffix, &mut paths);
        Ok(paths)
    }

    fn collect_parental_paths(&self, key: NodeKey, suffix: &mut Vec<NodeKey>, paths: &mut Vec<Vec<NodeKey>>) {
        let parents = self.nodes.get(key).map(|n| n.parents.as_slice()).unwrap_or(&[]);
        if parents.is_empty() {
            paths.push(suffix.iter().rev().copied().collect());
            return;
        }
        for &parent in parents {
            suffix.push(parent);
            self.collect_parental_paths(parent, suffix, paths);
            suffix.pop();
        }
    }

    /// Accumulated local-to-world matrix of a root-first node path
    pub fn compute_local_to_world(&self, path: &[NodeKey]) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        for key in path {
            if let Some(transform) = self.nodes.get(*key).and_then(|n| n.as_transform()) {
                transform.compute_local_to_world_matrix(&mut matrix);
            }
        }
        matrix
    }

    /// Accumulated world-to-local matrix of a root-first node path
    pub fn compute_world_to_local(&self, path: &[NodeKey]) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        for key in path {
            if let Some(transform) = self.nodes.get(*key).and_then(|n| n.as_transform()) {
                transform.compute_world_to_local_matrix(&mut matrix);
            }
        }
        matrix
    }

    // ===== ATTRIBUTES =====

    pub fn set_name(&mut self, key: NodeKey, name: &str) -> Result<()> {
        self.get_mut(key)?.name = name.to_string();
        Ok(())
    }

    pub fn set_node_mask(&mut self, key: NodeKey, mask: NodeMask) -> Result<()> {
        self.get_mut(key)?.node_mask = mask;
        Ok(())
    }

    /// Attach (or clear) the pipeline state override of a node
    pub fn set_pipeline_state(&mut self, key: NodeKey, state: Option<Arc<PipelineState>>) -> Result<()> {
        self.get_mut(key)?.pipeline_state = state;
        Ok(())
    }

    pub fn set_initial_bound(&mut self, key: NodeKey, bb: BoundingBox) -> Result<()> {
        self.get_mut(key)?.initial_bound = bb;
        self.dirty_bound(key);
        Ok(())
    }

    pub fn set_compute_bound_callback(
        &mut self,
        key: NodeKey,
        callback: Option<ComputeBoundCallback>,
    ) -> Result<()> {
        self.get_mut(key)?.compute_bound_callback = callback;
        self.dirty_bound(key);
        Ok(())
    }

    fn transform_mut(&mut self, key: NodeKey) -> Result<&mut Transform> {
        let node = self.get_mut(key)?;
        match &mut node.kind {
            NodeKind::Transform(transform) => Ok(transform),
            other => {
                let kind = other.type_name();
                engine_bail!(
                    "galaxy3d::SceneGraph",
                    InvalidArgument,
                    "{} '{}' is not a transform",
                    kind,
                    node.name
                )
            }
        }
    }

    pub fn set_transform_matrix(&mut self, key: NodeKey, matrix: Mat4) -> Result<()> {
        self.transform_mut(key)?.matrix = matrix;
        self.dirty_bound(key);
        Ok(())
    }

    pub fn set_reference_frame(&mut self, key: NodeKey, frame: ReferenceFrame) -> Result<()> {
        self.transform_mut(key)?.reference_frame = frame;
        self.dirty_bound(key);
        Ok(())
    }

    pub fn set_billboard(&mut self, key: NodeKey, billboard: Billboard) -> Result<()> {
        let node = self.get_mut(key)?;
        match &mut node.kind {
            NodeKind::Billboard(current) => {
                *current = billboard;
                Ok(())
            }
            other => {
                let kind = other.type_name();
                engine_bail!(
                    "galaxy3d::SceneGraph",
                    InvalidArgument,
                    "{} '{}' is not a billboard",
                    kind,
                    node.name
                )
            }
        }
    }

    /// Edit a drawable's content in place, then dirty its bound and ancestors
    pub fn drawable_mut<R>(&mut self, key: NodeKey, f: impl FnOnce(&mut Drawable) -> R) -> Result<R> {
        let node = self.get_mut(key)?;
        let result = match &mut node.kind {
            NodeKind::Drawable(drawable) => f(drawable),
            other => {
                let kind = other.type_name();
                engine_bail!(
                    "galaxy3d::SceneGraph",
                    InvalidArgument,
                    "{} '{}' is not a drawable",
                    kind,
                    node.name
                )
            }
        };
        self.dirty_bound(key);
        Ok(result)
    }

    // ===== BOUNDS =====

    /// Invalidate the cached bound of `key` and of every ancestor.
    ///
    /// Walks all parent paths (a node shared by several parents dirties all
    /// of them); each node is visited once.
    pub fn dirty_bound(&self, key: NodeKey) {
        let mut visited = FxHashSet::default();
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                node.bound.invalidate();
                pending.extend(node.parents.iter().copied());
            }
        }
    }

    /// Bounding box of a node in its parent's coordinate space
    pub fn bounding_box(&self, key: NodeKey) -> Result<BoundingBox> {
        let node = self.get(key)?;
        Ok(self.node_bound(node, key))
    }

    /// Sphere enclosing `bounding_box(key)`
    pub fn bounding_sphere(&self, key: NodeKey) -> Result<BoundingSphere> {
        Ok(BoundingSphere::from_box(&self.bounding_box(key)?))
    }

    fn node_bound(&self, node: &Node, key: NodeKey) -> BoundingBox {
        if let Some(bb) = node.bound.get() {
            return bb;
        }

        let bb = match &node.compute_bound_callback {
            Some(callback) => node.initial_bound.union(&callback(self, key)),
            None => match &node.kind {
                NodeKind::Transform(transform) => node
                    .initial_bound
                    .union(&self.children_bound(node))
                    .transformed(&transform.matrix),
                NodeKind::Drawable(drawable) => node.initial_bound.union(&drawable.compute_bounding_box()),
                _ => node.initial_bound.union(&self.children_bound(node)),
            },
        };

        node.bound.set(bb);
        bb
    }

    /// Union of the child bounds, skipping absolute-frame transforms
    fn children_bound(&self, node: &Node) -> BoundingBox {
        let mut bb = BoundingBox::EMPTY;
        for edge in &node.children {
            let Some(child) = self.nodes.get(edge.node) else {
                continue;
            };
            if let Some(transform) = child.as_transform() {
                if transform.reference_frame == ReferenceFrame::Absolute {
                    continue;
                }
            }
            bb.expand_by_box(&self.node_bound(child, edge.node));
        }
        bb
    }

    // ===== TRAVERSAL =====

    /// Double dispatch entry point.
    ///
    /// Mask test, then push `key` on the visitor's node path, run the
    /// variant-specific `apply_*`, and pop the path even if the apply failed.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, key: NodeKey, visitor: &mut V) -> Result<()> {
        let node = self.get(key)?;
        if !visitor.valid_node_mask(node) {
            return Ok(());
        }

        visitor.push_onto_node_path(key);
        let result = match &node.kind {
            NodeKind::Group => visitor.apply_group(self, key),
            NodeKind::Transform(_) => visitor.apply_transform(self, key),
            NodeKind::Geode => visitor.apply_geode(self, key),
            NodeKind::Billboard(_) => visitor.apply_billboard(self, key),
            NodeKind::Drawable(_) => visitor.apply_drawable(self, key),
        };
        visitor.pop_from_node_path();
        result
    }

    /// Visit the children of `key` in order, per the visitor's traversal mode
    pub fn traverse<V: NodeVisitor + ?Sized>(&self, key: NodeKey, visitor: &mut V) -> Result<()> {
        let node = self.get(key)?;
        match visitor.traversal_mode() {
            TraversalMode::TraverseNone => Ok(()),
            TraversalMode::TraverseAllChildren => {
                for edge in &node.children {
                    self.accept(edge.node, visitor)?;
                }
                Ok(())
            }
            TraversalMode::TraverseActiveChildren => {
                for edge in node.children.iter().filter(|edge| edge.active) {
                    self.accept(edge.node, visitor)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
