/// Node types for the scene graph.
///
/// A node lives in the `SceneGraph` arena and is addressed by a stable
/// `NodeKey`. Children are owned edges, parents are plain keys used only to
/// walk upward when a bound must be invalidated.

use std::fmt;
use std::sync::{Arc, RwLock};
use bitflags::bitflags;
use slotmap::new_key_type;
use crate::bounding::BoundingBox;
use crate::scene_graph::{Billboard, Drawable, PipelineState, SceneGraph, Transform};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a node within a SceneGraph.
    ///
    /// Keys remain valid even after other nodes are removed.
    /// A key becomes invalid only when its own node is removed.
    pub struct NodeKey;
}

// ===== NODE MASK =====

bitflags! {
    /// Per-node bit field tested against a visitor's traversal mask.
    ///
    /// A node is visited when `node_mask & traversal_mask` is non-zero.
    /// Bits other than the named ones are free for application use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeMask: u32 {
        /// Visited by the cull/batch visitor
        const CULL = 1 << 0;
        /// Every bit set
        const ALL = u32::MAX;
    }
}

impl Default for NodeMask {
    fn default() -> Self {
        NodeMask::ALL
    }
}

// ===== CALLBACKS =====

/// Replaces the default content bound of a node.
///
/// The result is unioned with the node's initial bound.
pub type ComputeBoundCallback = Arc<dyn Fn(&SceneGraph, NodeKey) -> BoundingBox + Send + Sync>;

// ===== CHILD EDGE =====

/// Edge from a group to one of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEdge {
    /// Child node
    pub node: NodeKey,
    /// Visited by `TraversalMode::TraverseActiveChildren` when set
    pub active: bool,
}

// ===== BOUND CACHE =====

/// Lazily computed bounding box with a freshness flag (`None` = dirty).
///
/// Guarded by a RwLock so that independent traversals may query bounds of
/// a shared graph concurrently.
#[derive(Debug, Default)]
pub struct BoundCache {
    cached: RwLock<Option<BoundingBox>>,
}

impl BoundCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<BoundingBox> {
        match self.cached.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, bb: BoundingBox) {
        match self.cached.write() {
            Ok(mut guard) => *guard = Some(bb),
            Err(poisoned) => *poisoned.into_inner() = Some(bb),
        }
    }

    /// Mark stale. Returns true if a value was cached.
    pub fn invalidate(&self) -> bool {
        match self.cached.write() {
            Ok(mut guard) => guard.take().is_some(),
            Err(poisoned) => poisoned.into_inner().take().is_some(),
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.get().is_some()
    }
}

impl Clone for BoundCache {
    fn clone(&self) -> Self {
        Self { cached: RwLock::new(self.get()) }
    }
}

// ===== NODE KIND =====

/// Variant-specific part of a node
pub enum NodeKind {
    /// Plain grouping node
    Group,
    /// Group with a local matrix
    Transform(Transform),
    /// Group whose children are drawables
    Geode,
    /// Geode whose drawables are oriented toward the viewer
    Billboard(Billboard),
    /// Leaf holding renderable content
    Drawable(Drawable),
}

impl NodeKind {
    /// Short variant name for logs
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Transform(_) => "Transform",
            NodeKind::Geode => "Geode",
            NodeKind::Billboard(_) => "Billboard",
            NodeKind::Drawable(_) => "Drawable",
        }
    }

    /// Geode and Billboard only accept drawable children
    pub fn is_geode(&self) -> bool {
        matches!(self, NodeKind::Geode | NodeKind::Billboard(_))
    }

    pub fn is_drawable(&self) -> bool {
        matches!(self, NodeKind::Drawable(_))
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Transform(t) => f.debug_tuple("Transform").field(t).finish(),
            NodeKind::Billboard(b) => f.debug_tuple("Billboard").field(b).finish(),
            NodeKind::Drawable(d) => f.debug_tuple("Drawable").field(&d.name()).finish(),
            other => f.write_str(other.type_name()),
        }
    }
}

// ===== NODE =====

/// A node of the scene graph
pub struct Node {
    pub(crate) name: String,
    pub(crate) node_mask: NodeMask,
    pub(crate) pipeline_state: Option<Arc<PipelineState>>,
    pub(crate) parents: Vec<NodeKey>,
    pub(crate) children: Vec<ChildEdge>,
    pub(crate) initial_bound: BoundingBox,
    pub(crate) compute_bound_callback: Option<ComputeBoundCallback>,
    pub(crate) bound: BoundCache,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            node_mask: NodeMask::default(),
            pipeline_state: None,
            parents: Vec::new(),
            children: Vec::new(),
            initial_bound: BoundingBox::EMPTY,
            compute_bound_callback: None,
            bound: BoundCache::new(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_mask(&self) -> NodeMask {
        self.node_mask
    }

    /// Pipeline state override attached to this node
    pub fn pipeline_state(&self) -> Option<&Arc<PipelineState>> {
        self.pipeline_state.as_ref()
    }

    /// Non-owning parent keys
    pub fn parents(&self) -> &[NodeKey] {
        &self.parents
    }

    /// Ordered child edges
    pub fn children(&self) -> &[ChildEdge] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn initial_bound(&self) -> &BoundingBox {
        &self.initial_bound
    }

    pub fn compute_bound_callback(&self) -> Option<&ComputeBoundCallback> {
        self.compute_bound_callback.as_ref()
    }

    /// True while the cached bound reflects the current content
    pub fn bound_is_fresh(&self) -> bool {
        self.bound.is_fresh()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_transform(&self) -> Option<&Transform> {
        match &self.kind {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_billboard(&self) -> Option<&Billboard> {
        match &self.kind {
            NodeKind::Billboard(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            NodeKind::Drawable(d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn has_child(&self, child: NodeKey) -> bool {
        self.children.iter().any(|edge| edge.node == child)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("node_mask", &self.node_mask)
            .field("kind", &self.kind)
            .field("parents", &self.parents)
            .field("children", &self.children)
            .finish()
    }
}
