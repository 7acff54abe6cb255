/// Render groups - per-frame batches produced by the cull visitor.
///
/// A `RenderGroup` is an ordered list of `RenderGroupState`, one per distinct
/// (pipeline state identity, topology, vertex layout) triple seen during the
/// traversal, in first-seen order. Each state holds the elements (one per
/// surviving drawable) to draw with that state.

use std::fmt;
use std::sync::Arc;
use glam::Mat4;
use rdst::{RadixKey, RadixSort};
use rustc_hash::FxHashMap;
use crate::graphics_device::{Buffer, PrimitiveTopology, VertexLayout};
use crate::scene_graph::{NodeKey, PipelineState, PrimitiveSet};

// ===== RENDER GROUP KEY =====

/// Batching key. The pipeline state is compared by `Arc` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderGroupKey {
    pipeline_state: usize,
    topology: PrimitiveTopology,
    vertex_layout: VertexLayout,
}

impl RenderGroupKey {
    pub fn new(
        pipeline_state: &Arc<PipelineState>,
        topology: PrimitiveTopology,
        vertex_layout: &VertexLayout,
    ) -> Self {
        Self {
            pipeline_state: Arc::as_ptr(pipeline_state) as usize,
            topology,
            vertex_layout: vertex_layout.clone(),
        }
    }
}

// ===== RENDER GROUP ELEMENT =====

/// One drawable instance inside a render group state
pub struct RenderGroupElement {
    /// Model-view matrix (billboard orientation included)
    pub model_view_matrix: Mat4,
    pub vertex_buffer: Option<Arc<dyn Buffer>>,
    pub index_buffer: Option<Arc<dyn Buffer>>,
    /// Surviving primitive sets of the drawable that use this state
    pub primitive_sets: Vec<Arc<PrimitiveSet>>,
    /// Source drawable node
    pub drawable: NodeKey,
    /// View-space z of the drawable's bound center (more negative = farther)
    pub view_depth: f32,
}

impl fmt::Debug for RenderGroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderGroupElement")
            .field("drawable", &self.drawable)
            .field("primitive_sets", &self.primitive_sets.len())
            .field("has_vertex_buffer", &self.vertex_buffer.is_some())
            .field("has_index_buffer", &self.index_buffer.is_some())
            .field("view_depth", &self.view_depth)
            .finish()
    }
}

// ===== RENDER GROUP STATE =====

/// Elements sharing one pipeline state, topology and vertex layout
pub struct RenderGroupState {
    pipeline_state: Arc<PipelineState>,
    topology: PrimitiveTopology,
    vertex_layout: VertexLayout,
    elements: Vec<RenderGroupElement>,
}

impl RenderGroupState {
    pub fn pipeline_state(&self) -> &Arc<PipelineState> {
        &self.pipeline_state
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    pub fn elements(&self) -> &[RenderGroupElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [RenderGroupElement] {
        &mut self.elements
    }

    /// Append an element and return its index
    pub fn push_element(&mut self, element: RenderGroupElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    fn sort_back_to_front(&mut self) {
        if self.elements.len() < 2 {
            return;
        }

        let mut keys: Vec<DepthKey> = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| DepthKey::new(element.view_depth, index))
            .collect();
        keys.radix_sort_unstable();

        let mut slots: Vec<Option<RenderGroupElement>> = self.elements.drain(..).map(Some).collect();
        self.elements = keys.iter().filter_map(|key| slots[key.index].take()).collect();
    }
}

impl fmt::Debug for RenderGroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderGroupState")
            .field("pipeline_state", &Arc::as_ptr(&self.pipeline_state))
            .field("topology", &self.topology)
            .field("elements", &self.elements)
            .finish()
    }
}

/// Radix sort key: ascending view-space z puts the farthest element first
#[derive(Debug, Clone, Copy)]
struct DepthKey {
    /// Float bits remapped so that unsigned order matches float order
    ordered_bits: u32,
    index: usize,
}

impl DepthKey {
    fn new(depth: f32, index: usize) -> Self {
        let bits = depth.to_bits();
        let ordered_bits = if bits & 0x8000_0000 != 0 { !bits } else { bits | 0x8000_0000 };
        Self { ordered_bits, index }
    }
}

impl RadixKey for DepthKey {
    const LEVELS: usize = 4;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.ordered_bits >> (level * 8)) as u8
    }
}

// ===== RENDER GROUP =====

/// Ordered collection of render group states
#[derive(Default)]
pub struct RenderGroup {
    states: Vec<RenderGroupState>,
    index: FxHashMap<RenderGroupKey, usize>,
}

impl RenderGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every state (start of a traversal)
    pub fn reset(&mut self) {
        self.states.clear();
        self.index.clear();
    }

    /// Index of the state for this key, created empty on first use
    pub fn get_or_create_state(
        &mut self,
        pipeline_state: &Arc<PipelineState>,
        topology: PrimitiveTopology,
        vertex_layout: &VertexLayout,
    ) -> usize {
        let key = RenderGroupKey::new(pipeline_state, topology, vertex_layout);
        if let Some(&index) = self.index.get(&key) {
            return index;
        }

        let index = self.states.len();
        self.states.push(RenderGroupState {
            pipeline_state: Arc::clone(pipeline_state),
            topology,
            vertex_layout: vertex_layout.clone(),
            elements: Vec::new(),
        });
        self.index.insert(key, index);
        index
    }

    pub fn states(&self) -> &[RenderGroupState] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&RenderGroupState> {
        self.states.get(index)
    }

    pub fn state_mut(&mut self, index: usize) -> Option<&mut RenderGroupState> {
        self.states.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Total number of elements over all states
    pub fn element_count(&self) -> usize {
        self.states.iter().map(|s| s.elements.len()).sum()
    }

    /// Reorder each state's elements farthest first
    pub fn sort_back_to_front(&mut self) {
        for state in &mut self.states {
            state.sort_back_to_front();
        }
    }
}

impl fmt::Debug for RenderGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.states.iter()).finish()
    }
}

#[cfg(test)]
#[path = "render_group_tests.rs"]
mod tests;
