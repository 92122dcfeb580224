//! Post passes over an emitted trunk section: smooth normals and the
//! texture seam fix.

use std::collections::HashMap;

use cgmath::{InnerSpace, Zero};

use crate::geometry::MeshSection;
use crate::math::{from_array, normalize_or_zero, to_array, Vec3};

/// Faces whose U coordinates spread wider than this cross the texture seam
pub const SEAM_SPAN: f32 = 0.5;

/// Replace every normal with the normalized average of the unit normals of
/// the faces using the vertex. Vertices on no face get a zero normal.
pub fn apply_normals(section: &mut MeshSection) {
    let mut sums = vec![Vec3::zero(); section.vertex_count()];
    for [a, b, c] in section.faces() {
        let pa = from_array(section.vertices[a as usize]);
        let pb = from_array(section.vertices[b as usize]);
        let pc = from_array(section.vertices[c as usize]);
        let normal = normalize_or_zero((pb - pa).cross(pc - pa));
        for index in [a, b, c] {
            sums[index as usize] += normal;
        }
    }
    section.normals = sums
        .into_iter()
        .map(|sum| to_array(normalize_or_zero(sum)))
        .collect();
}

/// Give faces that wrap around the texture seam their own `u = 1` copies of
/// the vertices sitting at `u = 0`.
///
/// Each offending vertex is duplicated once, in order of first appearance.
/// Returns the number of vertices appended.
pub fn fix_seams(section: &mut MeshSection) -> usize {
    let first_new = section.vertex_count() as u32;
    let mut twins: HashMap<u32, u32> = HashMap::new();
    let mut originals = Vec::new();
    let mut redirects = Vec::new();

    for (face_index, face) in section.indices.chunks_exact(3).enumerate() {
        let us = [
            section.tex_coords[face[0] as usize][0],
            section.tex_coords[face[1] as usize][0],
            section.tex_coords[face[2] as usize][0],
        ];
        let low = us.iter().copied().fold(f32::INFINITY, f32::min);
        let high = us.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if high - low <= SEAM_SPAN {
            continue;
        }
        for (corner, &index) in face.iter().enumerate() {
            if us[corner] != 0.0 {
                continue;
            }
            let twin = *twins.entry(index).or_insert_with(|| {
                originals.push(index);
                first_new + originals.len() as u32 - 1
            });
            redirects.push((face_index * 3 + corner, twin));
        }
    }

    if originals.is_empty() {
        return 0;
    }

    section.vertices.reserve_exact(originals.len());
    section.normals.reserve_exact(originals.len());
    section.tex_coords.reserve_exact(originals.len());
    for &original in &originals {
        let original = original as usize;
        let [_, v] = section.tex_coords[original];
        let position = section.vertices[original];
        let normal = section.normals[original];
        section.push_vertex(position, normal, [1.0, v]);
    }
    for (slot, twin) in redirects {
        section.indices[slot] = twin;
    }

    log::trace!("seam fix duplicated {} vertices", originals.len());
    originals.len()
}

/// Whether every normal has unit length or is exactly zero
pub fn normals_are_unit(section: &MeshSection) -> bool {
    section.normals.iter().all(|n| {
        let n = from_array(*n);
        n == Vec3::zero() || (n.magnitude() - 1.0).abs() < 1e-4
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit square strip wrapped into a triangular prism with `u` in [0, 1)
    fn prism() -> MeshSection {
        let mut section = MeshSection::default();
        for (k, angle) in [0.0f32, 120.0, 240.0].iter().enumerate() {
            let (sin, cos) = angle.to_radians().sin_cos();
            let u = k as f32 / 3.0;
            section.push_vertex([cos, 0.0, sin], [0.0; 3], [u, 0.0]);
            section.push_vertex([cos, 1.0, sin], [0.0; 3], [u, 1.0]);
        }
        for k in 0..3u32 {
            let (low, high) = (2 * k, 2 * k + 1);
            let (next_low, next_high) = (2 * ((k + 1) % 3), 2 * ((k + 1) % 3) + 1);
            section.push_face([high, next_high, low]);
            section.push_face([next_high, next_low, low]);
        }
        section
    }

    #[test]
    fn test_normals_point_away_from_axis() {
        let mut section = prism();
        apply_normals(&mut section);
        assert!(normals_are_unit(&section));
        for (position, normal) in section.vertices.iter().zip(&section.normals) {
            let radial = Vec3::new(position[0], 0.0, position[2]);
            assert!(from_array(*normal).dot(radial).abs() > 0.5);
        }
    }

    #[test]
    fn test_unused_vertex_gets_zero_normal() {
        let mut section = prism();
        section.push_vertex([5.0, 5.0, 5.0], [1.0, 0.0, 0.0], [0.0, 0.0]);
        apply_normals(&mut section);
        assert_eq!(section.normals[6], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_seam_faces_get_twins() {
        let mut section = prism();
        apply_normals(&mut section);
        let before = section.vertex_count();

        let added = fix_seams(&mut section);
        // the last quad joins u = 2/3 back to u = 0 at both heights,
        // reaching the upper vertex first
        assert_eq!(added, 2);
        assert_eq!(section.vertex_count(), before + 2);
        assert_eq!(section.vertices[before], section.vertices[1]);
        assert_eq!(section.normals[before], section.normals[1]);
        assert_eq!(section.tex_coords[before], [1.0, 1.0]);
        assert_eq!(section.vertices[before + 1], section.vertices[0]);
        assert_eq!(section.tex_coords[before + 1], [1.0, 0.0]);

        for face in section.faces() {
            let us: Vec<f32> = face.iter().map(|&i| section.tex_coords[i as usize][0]).collect();
            let span = us.iter().copied().fold(f32::NEG_INFINITY, f32::max)
                - us.iter().copied().fold(f32::INFINITY, f32::min);
            assert!(span <= SEAM_SPAN, "face {:?} still wraps", face);
        }
    }

    #[test]
    fn test_seam_fix_is_idempotent() {
        let mut section = prism();
        fix_seams(&mut section);
        let fixed = section.clone();
        assert_eq!(fix_seams(&mut section), 0);
        assert_eq!(section, fixed);
    }

    #[test]
    fn test_narrow_faces_untouched() {
        let mut section = MeshSection::default();
        section.push_vertex([0.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0]);
        section.push_vertex([1.0, 0.0, 0.0], [0.0; 3], [0.25, 0.0]);
        section.push_vertex([0.0, 1.0, 0.0], [0.0; 3], [0.1, 1.0]);
        section.push_face([0, 1, 2]);
        let original = section.clone();
        assert_eq!(fix_seams(&mut section), 0);
        assert_eq!(section, original);
    }
}
