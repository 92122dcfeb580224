// src/lib.rs
//! Sapling procedural tree generator
//!
//! Grows deterministic trees from a compact parameter set and delivers them
//! as GPU-ready trunk and twig meshes.

pub mod error;
pub mod geometry;
pub mod math;
pub mod prelude;
pub mod tree;

// Re-export main types for convenience
pub use error::{Result, TreeError};
pub use geometry::TreeMesh;
pub use tree::{generate, Tree, TreeProperties};
