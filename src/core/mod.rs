//! Core geometric primitives.
//!
//! Pure functions and value types with no knowledge of entities or scenes.

pub mod vec2;
pub mod geometry;

// Re-export core types
pub use vec2::Vec2;
pub use geometry::{
    circles_overlap, capsule_circle_overlap, capsule_capsule_overlap, segments_cross,
    polygon_circle_overlap, polygon_capsule_overlap, polygon_polygon_overlap,
};
