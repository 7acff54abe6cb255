//! Bounding volumes - axis-aligned box and sphere value types.

mod bounding_box;
mod bounding_sphere;

pub use bounding_box::BoundingBox;
pub use bounding_sphere::BoundingSphere;

#[cfg(test)]
#[path = "bounding_tests.rs"]
mod tests;
