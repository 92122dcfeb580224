//! # Vertex Data Structures
//!
//! GPU-compatible vertex format for uploading generated tree sections.

/// An interleaved tree vertex with position, normal and texture coordinate.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout, so a slice of vertices can be handed to a GPU buffer through
/// [`bytemuck::cast_slice`].
///
/// # Examples
///
/// ```rust
/// use sapling::geometry::TreeVertex;
///
/// let vertex = TreeVertex {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
///     tex_coord: [0.5, 0.0],
/// };
/// assert_eq!(bytemuck::bytes_of(&vertex).len(), TreeVertex::STRIDE);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TreeVertex {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Texture coordinates [u, v]
    pub tex_coord: [f32; 2],
}

impl TreeVertex {
    /// Size of one vertex in bytes
    pub const STRIDE: usize = std::mem::size_of::<TreeVertex>();
    /// Byte offset of the normal attribute
    pub const NORMAL_OFFSET: usize = std::mem::size_of::<[f32; 3]>();
    /// Byte offset of the texture coordinate attribute
    pub const TEX_COORD_OFFSET: usize = 2 * std::mem::size_of::<[f32; 3]>();
}
