/// CullVisitor - per-frame frustum culling and render batching.
///
/// Usage per frame:
///
/// ```text
/// reset() -> set_view_matrix() / set_projection_matrix() -> prepare()
///         -> graph.accept(root, &mut visitor)
/// ```
///
/// or `cull(graph, root)` which runs the whole sequence. The result is read
/// from `opaque_render_group()` and `transparent_render_group()`.
///
/// Only geodes and their content are tested against the frustum. Groups and
/// transforms are always entered: the bound of a group skips children under
/// an absolute transform, so it cannot be used to reject the whole subtree.

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use crate::bounding::BoundingBox;
use crate::culling::Polytope;
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use crate::scene_graph::{Billboard, Node, NodeKey, PipelineState, SceneGraph};
use crate::visitor::{NodeVisitor, TraversalMode, VisitorCore};
use crate::{engine_debug, engine_err};
use super::{CullSettings, RenderGroup, RenderGroupElement};

/// Cull/batch visitor
pub struct CullVisitor {
    core: VisitorCore,
    settings: CullSettings,
    graphics_device: Option<Arc<Mutex<dyn GraphicsDevice>>>,
    opaque_render_group: RenderGroup,
    transparent_render_group: RenderGroup,
    model_matrix_stack: Vec<Mat4>,
    pipeline_state_stack: Vec<Arc<PipelineState>>,
    default_pipeline_state: Arc<PipelineState>,
    culling_frustum: Polytope,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    render_element_count: usize,
}

impl CullVisitor {
    pub fn new(settings: CullSettings) -> Self {
        let mut core = VisitorCore::new(settings.traversal_mode);
        core.traversal_mask = settings.traversal_mask;

        Self {
            core,
            settings,
            graphics_device: None,
            opaque_render_group: RenderGroup::new(),
            transparent_render_group: RenderGroup::new(),
            model_matrix_stack: vec![Mat4::IDENTITY],
            pipeline_state_stack: Vec::new(),
            default_pipeline_state: Arc::new(PipelineState::default()),
            culling_frustum: Polytope::new(),
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            render_element_count: 0,
        }
    }

    /// Visitor that configures drawable device buffers on `device`
    pub fn with_graphics_device(settings: CullSettings, device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        let mut visitor = Self::new(settings);
        visitor.graphics_device = Some(device);
        visitor
    }

    pub fn set_graphics_device(&mut self, device: Option<Arc<Mutex<dyn GraphicsDevice>>>) {
        self.graphics_device = device;
    }

    pub fn graphics_device(&self) -> Option<&Arc<Mutex<dyn GraphicsDevice>>> {
        self.graphics_device.as_ref()
    }

    /// True when a graphics device is attached
    pub fn valid(&self) -> bool {
        self.graphics_device.is_some()
    }

    pub fn settings(&self) -> &CullSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CullSettings) {
        self.settings = settings;
        self.core.traversal_mode = settings.traversal_mode;
        self.core.traversal_mask = settings.traversal_mask;
    }

    /// State used when neither the node nor any ancestor carries one
    pub fn default_pipeline_state(&self) -> &Arc<PipelineState> {
        &self.default_pipeline_state
    }

    // ===== FRAME SETUP =====

    /// Clear the output and the traversal stacks
    pub fn reset(&mut self) {
        self.model_matrix_stack.clear();
        self.model_matrix_stack.push(Mat4::IDENTITY);
        self.pipeline_state_stack.clear();
        self.opaque_render_group.reset();
        self.transparent_render_group.reset();
        self.render_element_count = 0;
        self.culling_frustum.reset_plane_test_count();
        self.core.clear_node_path();
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view_matrix = view;
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection_matrix = projection;
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Build the culling volume from `projection * view`
    pub fn prepare(&mut self) {
        let view_projection = self.projection_matrix * self.view_matrix;
        self.culling_frustum.set_view_projection(&view_projection);
    }

    /// Run one complete frame pass from `root`
    pub fn cull(&mut self, graph: &SceneGraph, root: NodeKey) -> Result<()> {
        self.reset();
        self.prepare();
        graph.accept(root, self)?;

        if self.settings.sort_transparent_back_to_front {
            self.transparent_render_group.sort_back_to_front();
        }

        engine_debug!(
            "galaxy3d::CullVisitor",
            "Culled frame: {} elements in {} opaque / {} transparent states, {} plane tests",
            self.render_element_count,
            self.opaque_render_group.len(),
            self.transparent_render_group.len(),
            self.culling_frustum.plane_test_count()
        );
        Ok(())
    }

    // ===== OUTPUT =====

    pub fn opaque_render_group(&self) -> &RenderGroup {
        &self.opaque_render_group
    }

    pub fn transparent_render_group(&self) -> &RenderGroup {
        &self.transparent_render_group
    }

    /// Number of elements created since the last reset
    pub fn render_element_count(&self) -> usize {
        self.render_element_count
    }

    pub fn culling_frustum(&self) -> &Polytope {
        &self.culling_frustum
    }

    /// Accumulated model (local-to-world) matrix at the current node
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix_stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Accumulated model-view matrix at the current node
    pub fn model_view_matrix(&self) -> Mat4 {
        self.view_matrix * self.model_matrix()
    }

    // ===== INTERNALS =====

    /// True if `bb` (local to `model`) lies outside the frustum
    fn is_culled(&mut self, bb: &BoundingBox, model: &Mat4) -> bool {
        self.settings.frustum_culling && !self.culling_frustum.contains_transformed(bb, model)
    }

    fn resolve_pipeline_state(&self, node: &Node) -> Arc<PipelineState> {
        node.pipeline_state()
            .or_else(|| self.pipeline_state_stack.last())
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.default_pipeline_state))
    }

    /// Eye position in the local space of `model_view`
    fn eye_local(&self, node: &Node, model_view: &Mat4) -> Result<Vec3> {
        let determinant = model_view.determinant();
        if !determinant.is_finite() || determinant.abs() < f32::MIN_POSITIVE {
            return Err(engine_err!(
                "galaxy3d::CullVisitor",
                SingularMatrix,
                "model-view of billboard '{}' is not invertible (det = {})",
                node.name(),
                determinant
            ));
        }
        Ok(model_view.inverse().transform_point3(Vec3::ZERO))
    }

    /// Classify and batch the drawables of a geode or billboard.
    ///
    /// With `billboard` set, each element gets `model_view * orientation`
    /// and the per-drawable / per-primitive-set cull tests are skipped.
    fn batch_drawables(
        &mut self,
        graph: &SceneGraph,
        node: &Node,
        pipeline_state: &Arc<PipelineState>,
        model: &Mat4,
        billboard: Option<(&Billboard, Vec3)>,
    ) -> Result<()> {
        let model_view = self.view_matrix * *model;
        let active_only = self.core.traversal_mode == TraversalMode::TraverseActiveChildren;

        for edge in node.children() {
            if active_only && !edge.active {
                continue;
            }
            let drawable_node = graph.get(edge.node)?;
            if !self.valid_node_mask(drawable_node) {
                continue;
            }
            if drawable_node.as_drawable().is_none() {
                continue;
            }

            let drawable_bound = graph.bounding_box(edge.node)?;
            let element_matrix = match billboard {
                Some((billboard, eye_local)) => {
                    model_view * billboard.compute_matrix(&model_view, eye_local)
                }
                None => {
                    if self.is_culled(&drawable_bound, model) {
                        continue;
                    }
                    model_view
                }
            };

            self.culling_frustum.push_current_mask();
            let result = self.batch_drawable(
                edge.node,
                drawable_node,
                pipeline_state,
                model,
                element_matrix,
                &drawable_bound,
                billboard.is_none(),
            );
            self.culling_frustum.pop_current_mask();
            result?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn batch_drawable(
        &mut self,
        key: NodeKey,
        drawable_node: &Node,
        pipeline_state: &Arc<PipelineState>,
        model: &Mat4,
        element_matrix: Mat4,
        drawable_bound: &BoundingBox,
        cull_content: bool,
    ) -> Result<()> {
        let Some(drawable) = drawable_node.as_drawable() else {
            return Ok(());
        };

        let state = drawable_node
            .pipeline_state()
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(pipeline_state));

        if let Some(device) = &self.graphics_device {
            let mut device = device.lock().map_err(|_| {
                engine_err!("galaxy3d::CullVisitor", BackendError, "graphics device lock poisoned")
            })?;
            drawable.configure_device_buffers(&mut *device)?;
        }
        let vertex_buffer = drawable.vertex_buffer();
        let index_buffer = drawable.index_buffer();

        let view_depth = if drawable_bound.valid() {
            element_matrix.transform_point3(drawable_bound.center()).z
        } else {
            element_matrix.w_axis.z
        };

        let transparent = state.is_transparent();
        // state index -> element index, one element per state per drawable
        let mut element_cache: FxHashMap<usize, usize> = FxHashMap::default();

        for (index, primitive_set) in drawable.primitive_sets().iter().enumerate() {
            if cull_content {
                if let Some(bound) = drawable.primitive_set_bounding_box(index) {
                    if self.is_culled(&bound, model) {
                        continue;
                    }
                }
            }

            let group = if transparent {
                &mut self.transparent_render_group
            } else {
                &mut self.opaque_render_group
            };
            let state_index =
                group.get_or_create_state(&state, primitive_set.topology(), drawable.vertex_layout());
            let Some(render_state) = group.state_mut(state_index) else {
                continue;
            };

            let element_index = match element_cache.get(&state_index) {
                Some(&element_index) => element_index,
                None => {
                    let element_index = render_state.push_element(RenderGroupElement {
                        model_view_matrix: element_matrix,
                        vertex_buffer: vertex_buffer.clone(),
                        index_buffer: index_buffer.clone(),
                        primitive_sets: Vec::new(),
                        drawable: key,
                        view_depth,
                    });
                    element_cache.insert(state_index, element_index);
                    self.render_element_count += 1;
                    element_index
                }
            };

            if let Some(element) = render_state.elements_mut().get_mut(element_index) {
                element.primitive_sets.push(Arc::clone(primitive_set));
            }
        }

        Ok(())
    }
}

impl Default for CullVisitor {
    fn default() -> Self {
        Self::new(CullSettings::default())
    }
}

impl NodeVisitor for CullVisitor {
    fn core(&self) -> &VisitorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut VisitorCore {
        &mut self.core
    }

    /// Push the node's pipeline state (if any) around the traversal
    fn apply_node(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        match graph.get(key)?.pipeline_state() {
            Some(state) => {
                self.pipeline_state_stack.push(Arc::clone(state));
                let result = self.traverse(graph, key);
                self.pipeline_state_stack.pop();
                result
            }
            None => self.traverse(graph, key),
        }
    }

    fn apply_transform(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        let mut matrix = self.model_matrix();
        if let Some(transform) = graph.get(key)?.as_transform() {
            transform.compute_local_to_world_matrix(&mut matrix);
        }

        self.model_matrix_stack.push(matrix);
        let result = self.apply_node(graph, key);
        self.model_matrix_stack.pop();
        result
    }

    fn apply_geode(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        let node = graph.get(key)?;
        let model = self.model_matrix();
        if self.is_culled(&graph.bounding_box(key)?, &model) {
            return Ok(());
        }

        let state = self.resolve_pipeline_state(node);

        self.culling_frustum.push_current_mask();
        let result = self.batch_drawables(graph, node, &state, &model, None);
        self.culling_frustum.pop_current_mask();
        result
    }

    fn apply_billboard(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        let node = graph.get(key)?;
        let model = self.model_matrix();
        if self.is_culled(&graph.bounding_box(key)?, &model) {
            return Ok(());
        }

        let Some(billboard) = node.as_billboard().copied() else {
            return self.apply_geode(graph, key);
        };
        let state = self.resolve_pipeline_state(node);
        let eye_local = self.eye_local(node, &(self.view_matrix * model))?;

        self.culling_frustum.push_current_mask();
        let result = self.batch_drawables(graph, node, &state, &model, Some((&billboard, eye_local)));
        self.culling_frustum.pop_current_mask();
        result
    }
}

#[cfg(test)]
#[path = "cull_visitor_tests.rs"]
mod tests;
