/// PrimitiveSet - one draw range of a drawable's geometry.
///
/// Owned by exactly one Drawable. Shared read-only with the render groups
/// of the current frame through `Arc`; edits go through `Arc::make_mut`, so
/// a frame holding the old set keeps seeing the old range.

use std::fmt;
use std::sync::Arc;
use crate::bounding::BoundingBox;
use crate::error::Result;
use crate::graphics_device::{CommandList, PrimitiveTopology};
use crate::scene_graph::{BoundCache, DrawableGeometry};

/// Replaces the geometry-derived bound of a primitive set
pub type PrimitiveSetBoundCallback =
    Arc<dyn Fn(&PrimitiveSet, &dyn DrawableGeometry) -> BoundingBox + Send + Sync>;

/// Range of vertices / indices drawn by a primitive set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawRange {
    /// Non-indexed draw of `count` vertices starting at `first`
    DrawArrays { first: u32, count: u32 },
    /// Indexed draw of `index_count` indices starting at `first_index`,
    /// `base_vertex` added to every index
    DrawElements { first_index: u32, index_count: u32, base_vertex: i32 },
}

impl DrawRange {
    /// Number of vertices or indices consumed by the draw
    pub fn count(&self) -> u32 {
        match self {
            DrawRange::DrawArrays { count, .. } => *count,
            DrawRange::DrawElements { index_count, .. } => *index_count,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, DrawRange::DrawElements { .. })
    }
}

/// Primitive set
#[derive(Clone)]
pub struct PrimitiveSet {
    topology: PrimitiveTopology,
    range: DrawRange,
    initial_bound: BoundingBox,
    compute_bound_callback: Option<PrimitiveSetBoundCallback>,
    bound: BoundCache,
}

impl PrimitiveSet {
    pub fn new(topology: PrimitiveTopology, range: DrawRange) -> Self {
        Self {
            topology,
            range,
            initial_bound: BoundingBox::EMPTY,
            compute_bound_callback: None,
            bound: BoundCache::new(),
        }
    }

    /// Non-indexed set
    pub fn draw_arrays(topology: PrimitiveTopology, first: u32, count: u32) -> Self {
        Self::new(topology, DrawRange::DrawArrays { first, count })
    }

    /// Indexed set
    pub fn draw_elements(
        topology: PrimitiveTopology,
        first_index: u32,
        index_count: u32,
        base_vertex: i32,
    ) -> Self {
        Self::new(topology, DrawRange::DrawElements { first_index, index_count, base_vertex })
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn range(&self) -> DrawRange {
        self.range
    }

    pub fn initial_bound(&self) -> &BoundingBox {
        &self.initial_bound
    }

    pub fn set_topology(&mut self, topology: PrimitiveTopology) {
        self.topology = topology;
    }

    pub fn set_range(&mut self, range: DrawRange) {
        self.range = range;
        self.dirty_bound();
    }

    pub fn set_initial_bound(&mut self, bb: BoundingBox) {
        self.initial_bound = bb;
        self.dirty_bound();
    }

    pub fn set_compute_bound_callback(&mut self, callback: Option<PrimitiveSetBoundCallback>) {
        self.compute_bound_callback = callback;
        self.dirty_bound();
    }

    pub fn dirty_bound(&self) {
        self.bound.invalidate();
    }

    pub fn bound_is_fresh(&self) -> bool {
        self.bound.is_fresh()
    }

    /// Cached bound: initial ∪ (callback or the geometry bound of the range)
    pub fn bounding_box(&self, geometry: &dyn DrawableGeometry) -> BoundingBox {
        if let Some(bb) = self.bound.get() {
            return bb;
        }

        let content = match &self.compute_bound_callback {
            Some(callback) => callback(self, geometry),
            None => geometry.compute_bounding_box(&self.range),
        };
        let bb = self.initial_bound.union(&content);

        self.bound.set(bb);
        bb
    }

    /// Record the draw call of this range (buffers must already be bound)
    pub fn draw(&self, cmd: &mut dyn CommandList) -> Result<()> {
        match self.range {
            DrawRange::DrawArrays { first, count } => cmd.draw(count, first),
            DrawRange::DrawElements { first_index, index_count, base_vertex } => {
                cmd.draw_indexed(index_count, first_index, base_vertex)
            }
        }
    }
}

impl fmt::Debug for PrimitiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field("topology", &self.topology)
            .field("range", &self.range)
            .field("initial_bound", &self.initial_bound)
            .field("has_callback", &self.compute_bound_callback.is_some())
            .finish()
    }
}
