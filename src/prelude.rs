//! # Sapling Prelude
//!
//! Commonly used types for generating trees and consuming their meshes.
//!
//! ## Usage
//!
//! ```rust
//! use sapling::prelude::*;
//!
//! let mesh = generate(&TreeProperties { seed: 99, ..Default::default() })?;
//! let vertices: Vec<TreeVertex> = mesh.trunk.to_vertices();
//! assert_eq!(vertices.len(), mesh.trunk.vertex_count());
//! # Ok::<(), TreeError>(())
//! ```

// Generation entry points
pub use crate::tree::{generate, Tree, TreeProperties};
pub use crate::tree::{Branch, BranchId, BranchKind, Skeleton};

// Output buffers
pub use crate::geometry::{Aabb, MeshBudget, MeshSection, TreeMesh, TreeVertex};

pub use crate::error::{PropertyIssue, TreeError};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
