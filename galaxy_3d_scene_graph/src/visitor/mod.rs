/// Visitor module - double-dispatch traversal of the scene graph

pub mod node_visitor;
pub mod compute_bounds_visitor;

pub use node_visitor::*;
pub use compute_bounds_visitor::*;
