/// Culling module - half-space planes and the convex polytope culler

pub mod plane;
pub mod polytope;

pub use plane::*;
pub use polytope::*;
