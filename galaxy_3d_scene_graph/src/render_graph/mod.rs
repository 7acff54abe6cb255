//! Render graph module
//!
//! Output side of the per-frame traversal: the cull visitor walks the scene
//! graph, drops what lies outside the view volume and batches the surviving
//! primitive sets into an opaque and a transparent `RenderGroup`, ready for
//! an external draw-submission stage.

mod cull_settings;
mod cull_visitor;
mod render_group;

pub use cull_settings::CullSettings;
pub use cull_visitor::CullVisitor;
pub use render_group::{RenderGroup, RenderGroupElement, RenderGroupKey, RenderGroupState};
