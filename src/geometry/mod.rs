//! # Generated Geometry
//!
//! Flat mesh buffers produced by the tree generator. A tree is delivered as
//! two [`MeshSection`]s so hosts can bind a bark material to the trunk and an
//! alpha-tested leaf material to the twigs.
//!
//! ## Usage
//!
//! ```rust
//! use sapling::tree::{generate, TreeProperties};
//!
//! let mesh = generate(&TreeProperties::default())?;
//! println!(
//!     "trunk: {} vertices, {} triangles",
//!     mesh.trunk.vertex_count(),
//!     mesh.trunk.triangle_count()
//! );
//! let gpu_vertices = mesh.twigs.to_vertices();
//! let bytes: &[u8] = bytemuck::cast_slice(&gpu_vertices);
//! assert_eq!(bytes.len(), gpu_vertices.len() * std::mem::size_of::<sapling::geometry::TreeVertex>());
//! # Ok::<(), sapling::TreeError>(())
//! ```

pub mod bounds;
pub mod vertex;

pub use bounds::Aabb;
pub use vertex::TreeVertex;

/// One mesh section: parallel per-vertex arrays plus a triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSection {
    /// Vertex positions (x, y, z), Y up
    pub vertices: Vec<[f32; 3]>,
    /// Per-vertex normals (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices, three per face (counter-clockwise seen from outside)
    pub indices: Vec<u32>,
}

impl MeshSection {
    /// Create an empty section with exact room for the given sizes
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(faces * 3),
        }
    }

    /// Get the number of vertices in this section
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this section
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate triangles as index triples
    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|face| [face[0], face[1], face[2]])
    }

    /// Append a vertex and return its index
    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    pub(crate) fn push_face(&mut self, face: [u32; 3]) {
        self.indices.extend_from_slice(&face);
    }

    /// Local bounding box of the section, `None` when it has no vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_vertices(&self.vertices)
    }

    /// Interleave the parallel arrays into GPU-ready vertex records
    pub fn to_vertices(&self) -> Vec<TreeVertex> {
        (0..self.vertices.len())
            .map(|i| TreeVertex {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coord: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

/// Exact buffer sizes of one section, as computed by the sizing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub vertices: usize,
    pub faces: usize,
}

impl std::ops::AddAssign for SectionCounts {
    fn add_assign(&mut self, other: Self) {
        self.vertices += other.vertices;
        self.faces += other.faces;
    }
}

/// Buffer sizes of both sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshBudget {
    pub trunk: SectionCounts,
    pub twigs: SectionCounts,
}

impl std::ops::AddAssign for MeshBudget {
    fn add_assign(&mut self, other: Self) {
        self.trunk += other.trunk;
        self.twigs += other.twigs;
    }
}

/// A generated tree: trunk tubes and twig cards
#[derive(Debug, Clone, PartialEq)]
pub struct TreeMesh {
    pub trunk: MeshSection,
    pub twigs: MeshSection,
    /// Sizes reserved by the sizing pass before the UV seam fix
    pub budget: MeshBudget,
    /// Trunk vertices appended by the UV seam fix
    pub seam_vertices: usize,
}

impl TreeMesh {
    /// Bounding box around both sections
    pub fn bounds(&self) -> Option<Aabb> {
        match (self.trunk.bounds(), self.twigs.bounds()) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshSection {
        let mut section = MeshSection::with_capacity(4, 2);
        section.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        section.push_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]);
        section.push_vertex([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]);
        section.push_vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
        section.push_face([0, 1, 2]);
        section.push_face([2, 3, 0]);
        section
    }

    #[test]
    fn test_section_counts() {
        let section = quad();
        assert_eq!(section.vertex_count(), 4);
        assert_eq!(section.triangle_count(), 2);
        let faces: Vec<[u32; 3]> = section.faces().collect();
        assert_eq!(faces, vec![[0, 1, 2], [2, 3, 0]]);
    }

    #[test]
    fn test_to_vertices_interleaves() {
        let vertices = quad().to_vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[2].tex_coord, [1.0, 1.0]);
        assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_section_has_no_bounds() {
        assert!(MeshSection::default().bounds().is_none());
        assert!(MeshSection::default().is_empty());
    }

    #[test]
    fn test_tree_mesh_bounds_merge_sections() {
        let mut twigs = MeshSection::default();
        twigs.push_vertex([-2.0, 3.0, 0.5], [0.0, 1.0, 0.0], [0.0, 0.0]);
        let mesh = TreeMesh {
            trunk: quad(),
            twigs,
            budget: MeshBudget::default(),
            seam_vertices: 0,
        };
        let bounds = mesh.bounds().expect("mesh has vertices");
        assert_eq!(bounds.min, [-2.0, 0.0, 0.0].into());
        assert_eq!(bounds.max, [1.0, 3.0, 0.5].into());
    }

    #[test]
    fn test_budget_accumulates() {
        let mut budget = MeshBudget::default();
        budget += MeshBudget {
            trunk: SectionCounts { vertices: 12, faces: 24 },
            twigs: SectionCounts { vertices: 8, faces: 4 },
        };
        budget.trunk += SectionCounts { vertices: 1, faces: 12 };
        assert_eq!(budget.trunk, SectionCounts { vertices: 13, faces: 36 });
        assert_eq!(budget.twigs.faces, 4);
    }
}
