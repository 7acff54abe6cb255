/// Scene graph module - node arena, node variants and drawable content
///
/// Structure:
/// - SceneGraph: arena of nodes (slotmap) with structural edits, lazy
///   bound caching and visitor dispatch
/// - Node / NodeKind: Group, Transform, Geode, Billboard, Drawable
/// - Drawable: primitive sets over a DrawableGeometry provider
/// - PipelineState: render state shared by identity

pub mod node;
pub mod transform;
pub mod billboard;
pub mod primitive_set;
pub mod geometry;
pub mod drawable;
pub mod pipeline_state;
pub mod scene_graph;

pub use node::*;
pub use transform::*;
pub use billboard::*;
pub use primitive_set::*;
pub use geometry::*;
pub use drawable::*;
pub use pipeline_state::*;
pub use scene_graph::*;
