/*!
# Galaxy 3D Scene Graph

Retained-mode scene graph with frustum culling and render batching.

The application builds a directed acyclic graph of nodes (groups, transforms,
geodes, billboards and drawables). Each frame a `CullVisitor` walks the graph,
rejects whatever lies outside the view volume and batches the surviving
primitive sets into an opaque and a transparent `RenderGroup`, keyed by
pipeline state, topology and vertex layout.

## Architecture

- **SceneGraph**: node arena (slotmap keys), structural edits, cached bounds
- **NodeVisitor**: double-dispatch traversal with path, mask and mode
- **Polytope**: convex plane set with a coherency mask stack
- **CullVisitor**: per-frame cull + batch pass producing render groups
- **GraphicsDevice**: device-facing traits the drawables upload through

Draw submission is left to the caller: it iterates the render groups and
binds the pipeline state, buffers and primitive sets of each element.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod bounding;
pub mod culling;
pub mod graphics_device;
pub mod scene_graph;
pub mod visitor;
pub mod render_graph;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Global services (logger)
    pub use crate::engine::Engine;

    // Scene graph entry points
    pub use crate::scene_graph::{NodeKey, SceneGraph};
    pub use crate::render_graph::CullVisitor;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Bounding volumes
    pub mod bounding {
        pub use crate::bounding::*;
    }

    // Culling volumes
    pub mod culling {
        pub use crate::culling::*;
    }

    // Device-facing traits and descriptors
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Nodes, drawables and pipeline states
    pub mod scene {
        pub use crate::scene_graph::*;
    }

    // Traversal
    pub mod visitor {
        pub use crate::visitor::*;
    }

    // Cull output
    pub mod render {
        pub use crate::render_graph::*;
    }
}

// Re-export math library at crate root
pub use glam;
