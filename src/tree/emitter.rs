//! # Mesh Emitter
//!
//! Turns a [`Skeleton`] into trunk and twig buffers in two walks over the same
//! [`Skeleton::preorder`] sequence:
//!
//! 1. **Sizing**: [`measure`] sums every branch's [`footprint`] so the
//!    buffers can be allocated exactly once
//! 2. **Emission**: [`emit`] writes the geometry and verifies it filled the
//!    reservation exactly
//!
//! ## Geometry per branch
//!
//! - **Root**: a ground ring around the origin
//! - **Fork**: a ring at the head (`ring0`) plus a saddle arc between the
//!   two children. `ring1` and `ring2` are the openings the children attach
//!   to. `ring2` holds the saddle arc vertices and `ring1` carries its own
//!   copies of them, so each opening keeps a monotonic U around it.
//! - **Leaf**: a tip vertex closing the tube with a fan, and a double-sided
//!   twig card
//!
//! Every fork and leaf is stitched to the opening below it: the ground ring
//! for the root, otherwise the parent's `ring1` (first child) or `ring2`
//! (second child).
//!
//! U runs around each ring as `(position + phase) / segments`, where a
//! fork's phase is picked when its `ring0` is aligned to the ring below.
//! Paired band vertices therefore share their U and only the one face pair
//! at the wrap needs the seam fix.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::InnerSpace;

use super::skeleton::{BranchId, BranchRings, Skeleton};
use super::TreeProperties;
use crate::error::{Result, SectionKind, TreeError};
use crate::geometry::{MeshBudget, MeshSection, SectionCounts};
use crate::math::{axis_angle, from_array, normalize_or_zero, scale_in_direction, to_array, Vec3};

/// Vertices in one twig card (front and back quad)
pub const TWIG_VERTICES: usize = 8;
/// Triangles in one twig card
pub const TWIG_FACES: usize = 4;

/// Vertices of the triangle closing an odd fork's saddle gap
const GAP_PATCH_VERTICES: usize = 3;

/// Placeholder normal until the normal pass runs
const UNSET_NORMAL: [f32; 3] = [0.0, 0.0, 0.0];

/// Vertex layout of a fork for a given ring size
#[derive(Debug, Clone, Copy)]
struct RingLayout {
    segments: usize,
    /// Index of the second pinch vertex in `ring0`
    half: usize,
    /// Vertices on the saddle arc between the two children
    saddle: usize,
}

impl RingLayout {
    fn new(segments: u32) -> Self {
        let segments = segments as usize;
        let half = segments / 2;
        Self {
            segments,
            half,
            saddle: segments - half - 1,
        }
    }

    /// `ring1` takes `half - 1` saddle positions and `ring2` takes all of them.
    /// They only differ for odd ring sizes, which leave one triangle open
    /// between the two child openings.
    fn has_gap(&self) -> bool {
        self.saddle != self.half - 1
    }

    /// Ring, saddle, `ring1` saddle copies and the gap patch
    fn fork_vertices(&self) -> usize {
        let patch = if self.has_gap() { GAP_PATCH_VERTICES } else { 0 };
        self.segments + self.saddle + (self.half - 1) + patch
    }
}

/// Buffer contribution of a single branch.
///
/// Shared by the sizing pass and the checks of the emission pass.
pub fn footprint(skeleton: &Skeleton, id: BranchId, segments: u32) -> MeshBudget {
    let layout = RingLayout::new(segments);
    let s = layout.segments;
    let branch = skeleton.branch(id);

    let mut budget = MeshBudget::default();
    if branch.parent.is_none() {
        budget.trunk.vertices += s;
    }
    if branch.is_leaf() {
        budget.trunk += SectionCounts { vertices: 1, faces: s };
        budget.twigs += SectionCounts {
            vertices: TWIG_VERTICES,
            faces: TWIG_FACES,
        };
    } else {
        budget.trunk += SectionCounts {
            vertices: layout.fork_vertices(),
            faces: 2 * s + usize::from(layout.has_gap()),
        };
    }
    budget
}

/// Sizing pass: exact vertex and face counts of both sections
pub fn measure(skeleton: &Skeleton, segments: u32) -> MeshBudget {
    let mut budget = MeshBudget::default();
    for id in skeleton.preorder() {
        budget += footprint(skeleton, id, segments);
    }
    budget
}

/// Emission pass: write the trunk and twig sections for a skeleton sized by
/// [`measure`].
///
/// Ring indices are stored back into each branch's [`BranchRings`]. Trunk
/// normals are left unset for the normal pass.
pub fn emit(
    skeleton: &mut Skeleton,
    props: &TreeProperties,
    budget: &MeshBudget,
) -> Result<(MeshSection, MeshSection)> {
    let mut emitter = Emitter {
        props,
        layout: RingLayout::new(props.segments),
        trunk: MeshSection::with_capacity(budget.trunk.vertices, budget.trunk.faces),
        twigs: MeshSection::with_capacity(budget.twigs.vertices, budget.twigs.faces),
        stem_v: vec![0.0; skeleton.len()],
        ring_phase: vec![0; skeleton.len()],
    };

    for id in skeleton.preorder() {
        emitter.emit_branch(skeleton, id);
    }

    let Emitter { trunk, twigs, .. } = emitter;
    check_written(SectionKind::Trunk, "vertex", budget.trunk.vertices, trunk.vertex_count())?;
    check_written(SectionKind::Trunk, "face", budget.trunk.faces, trunk.triangle_count())?;
    check_written(SectionKind::Twigs, "vertex", budget.twigs.vertices, twigs.vertex_count())?;
    check_written(SectionKind::Twigs, "face", budget.twigs.faces, twigs.triangle_count())?;

    Ok((trunk, twigs))
}

fn check_written(section: SectionKind, what: &'static str, expected: usize, written: usize) -> Result<()> {
    debug_assert_eq!(
        expected, written,
        "{} {} count diverged between sizing and emission",
        section, what
    );
    if expected == written {
        Ok(())
    } else {
        Err(TreeError::SizingMismatch {
            section,
            what,
            expected,
            written,
        })
    }
}

/// Directions spanning a fork joint
struct ForkFrame {
    head: Vec3,
    /// Direction of the segment ending at the joint
    axis: Vec3,
    /// From the first child's head back to the joint
    axis1: Vec3,
    /// From the second child's head back to the joint
    axis2: Vec3,
    /// Normal of the plane holding both children
    tangent: Vec3,
}

struct Emitter<'a> {
    props: &'a TreeProperties,
    layout: RingLayout,
    trunk: MeshSection,
    twigs: MeshSection,
    /// Cumulative V coordinate at each branch head
    stem_v: Vec<f32>,
    /// U phase of each fork's `ring0` and `ring2`
    ring_phase: Vec<usize>,
}

impl Emitter<'_> {
    fn emit_branch(&mut self, skeleton: &mut Skeleton, id: BranchId) {
        let branch = skeleton.branch(id);
        let head = branch.head;
        let base = skeleton.stem_base(id);
        let below_v = branch.parent.map_or(0.0, |parent| self.stem_v[parent]);
        let v = below_v + (head - base).magnitude() * self.props.v_multiplier;
        self.stem_v[id] = v;

        let s = self.layout.segments;
        let mut rings = BranchRings::default();
        let (below, below_phase) = match branch.parent {
            None => {
                rings.base = self.ground_ring(branch.ring_radius());
                (rings.base.clone(), 0)
            }
            Some(parent) => {
                let opening = &skeleton.branch(parent).rings;
                let phase = self.ring_phase[parent];
                if skeleton.is_first_child(id) {
                    (opening.ring1.clone(), (phase + self.layout.half) % s)
                } else {
                    (opening.ring2.clone(), phase)
                }
            }
        };

        match branch.children {
            Some([first, second]) => {
                let first = skeleton.branch(first);
                let second = skeleton.branch(second);
                let frame = ForkFrame {
                    head,
                    axis: normalize_or_zero(head - base),
                    axis1: normalize_or_zero(head - first.head),
                    axis2: normalize_or_zero(head - second.head),
                    tangent: branch.tangent,
                };
                let trunk_joint = branch.is_trunk() || first.is_trunk();
                let patch = self.fork_rings(&mut rings, &frame, branch.ring_radius(), trunk_joint, v);

                let offset = self.stitch_band(&below, base, &rings.ring0, head);
                let phase = (offset + below_phase) % s;
                self.ring_phase[id] = phase;
                self.assign_ring_u(&rings, patch, phase);
            }
            None => {
                let tip = self.trunk.push_vertex(to_array(head), UNSET_NORMAL, [0.5, v]);
                rings.end = Some(tip);
                self.stitch_fan(&below, base, tip);
                self.twig_card(skeleton, id);
            }
        }

        skeleton.branch_mut(id).rings = rings;
    }

    fn position(&self, index: u32) -> Vec3 {
        from_array(self.trunk.vertices[index as usize])
    }

    /// Ring around the origin the trunk grows out of
    fn ground_ring(&mut self, radius: f32) -> Vec<u32> {
        let s = self.layout.segments;
        let segment_angle = TAU / s as f32;
        let radius = radius / self.props.radius_falloff_rate;
        (0..s)
            .map(|i| {
                let offset = axis_angle(-Vec3::unit_x(), Vec3::unit_y(), -segment_angle * i as f32);
                self.trunk.push_vertex(
                    to_array(offset * radius),
                    UNSET_NORMAL,
                    [i as f32 / s as f32, 0.0],
                )
            })
            .collect()
    }

    /// Emit the joint rings of a fork into `rings`, returning the gap patch
    /// of an odd ring size.
    ///
    /// U is left at zero until the fork is aligned.
    fn fork_rings(
        &mut self,
        rings: &mut BranchRings,
        frame: &ForkFrame,
        radius: f32,
        trunk_joint: bool,
        v: f32,
    ) -> Option<[u32; 3]> {
        let RingLayout {
            segments: s,
            half,
            saddle,
        } = self.layout;
        let segment_angle = TAU / s as f32;
        let uv = [0.0, v];

        let tangent = frame.tangent;
        let bisector = normalize_or_zero(-frame.axis1 - frame.axis2);
        let saddle_axis = normalize_or_zero(tangent.cross(bisector));
        let shift = Vec3::new(frame.axis2.x, 0.0, frame.axis2.z) * (-self.props.max_radius / 2.0);
        let center = frame.head + shift;
        let scale = if trunk_joint {
            1.0 / self.props.taper_rate
        } else {
            self.props.radius_falloff_rate
        };
        let radius = radius * scale;

        // Keep the half swept around the second child in the plane of the
        // incoming segment
        let swept = axis_angle(tangent, frame.axis2, FRAC_PI_2);
        let planar = normalize_or_zero(tangent.cross(frame.axis));
        let alignment = swept.dot(planar);
        let flatten = if alignment.abs() > 1e-3 { 1.0 / alignment } else { 1.0 };

        let mut ring0 = Vec::with_capacity(s);
        let mut ring1 = Vec::with_capacity(s);
        let mut ring2 = Vec::with_capacity(s);

        let pinch0 = self.trunk.push_vertex(
            to_array(center + tangent * radius),
            UNSET_NORMAL,
            uv,
        );
        ring0.push(pinch0);
        ring2.push(pinch0);

        for i in 1..half {
            let offset = axis_angle(tangent, frame.axis2, segment_angle * i as f32);
            let offset = scale_in_direction(offset, planar, flatten);
            let index = self
                .trunk
                .push_vertex(to_array(center + offset * radius), UNSET_NORMAL, uv);
            ring0.push(index);
            ring2.push(index);
        }

        let pinch1 = self.trunk.push_vertex(
            to_array(center - tangent * radius),
            UNSET_NORMAL,
            uv,
        );
        ring0.push(pinch1);
        ring1.push(pinch1);

        for i in half + 1..s {
            let offset = axis_angle(tangent, frame.axis1, segment_angle * i as f32);
            let index = self
                .trunk
                .push_vertex(to_array(center + offset * radius), UNSET_NORMAL, uv);
            ring0.push(index);
            ring1.push(index);
        }

        ring1.push(pinch0);
        ring2.push(pinch1);

        // Saddle arc from pinch0 to pinch1
        let saddle_points: Vec<[f32; 3]> = (1..=saddle)
            .map(|k| {
                let offset = axis_angle(tangent, saddle_axis, PI * k as f32 / (saddle + 1) as f32);
                to_array(center + offset * radius)
            })
            .collect();
        let saddle_vertices: Vec<u32> = saddle_points
            .iter()
            .map(|&point| self.trunk.push_vertex(point, UNSET_NORMAL, uv))
            .collect();
        for &point in &saddle_points[..half - 1] {
            let copy = self.trunk.push_vertex(point, UNSET_NORMAL, uv);
            ring1.push(copy);
        }
        ring2.extend(saddle_vertices.iter().rev());

        let patch = if self.layout.has_gap() {
            let corners = [ring1[s - 1], saddle_vertices[saddle - 1], pinch1];
            let patch = corners.map(|corner| {
                let point = self.trunk.vertices[corner as usize];
                self.trunk.push_vertex(point, UNSET_NORMAL, uv)
            });
            let face = self.oriented(patch, -frame.axis1);
            self.trunk.push_face(face);
            Some(patch)
        } else {
            None
        };

        rings.ring0 = ring0;
        rings.ring1 = ring1;
        rings.ring2 = ring2;
        patch
    }

    /// Write U around the rings of an aligned fork.
    ///
    /// `ring1` starts at the second pinch vertex, half a turn after `ring0`.
    /// The gap patch takes the U of that pinch vertex.
    fn assign_ring_u(&mut self, rings: &BranchRings, patch: Option<[u32; 3]>, phase: usize) {
        let RingLayout { segments: s, half, .. } = self.layout;
        let u = |position: usize| ((position + phase) % s) as f32 / s as f32;
        for (ring, start) in [(&rings.ring0, 0), (&rings.ring2, 0), (&rings.ring1, half)] {
            for (position, &index) in ring.iter().enumerate() {
                self.trunk.tex_coords[index as usize][0] = u(start + position);
            }
        }
        for index in patch.into_iter().flatten() {
            self.trunk.tex_coords[index as usize][0] = u(half);
        }
    }

    /// Flip `face` if its normal points against `outward`
    fn oriented(&self, face: [u32; 3], outward: Vec3) -> [u32; 3] {
        if self.face_normal(face).dot(outward) < 0.0 {
            [face[0], face[2], face[1]]
        } else {
            face
        }
    }

    fn face_normal(&self, [a, b, c]: [u32; 3]) -> Vec3 {
        let pa = self.position(a);
        (self.position(b) - pa).cross(self.position(c) - pa)
    }

    /// Direction from the segment axis through `anchor` toward the centroid of `face`
    fn away_from_axis(&self, face: [u32; 3], anchor: Vec3, axis: Vec3) -> Vec3 {
        let centroid = (self.position(face[0]) + self.position(face[1]) + self.position(face[2])) / 3.0;
        let along = (centroid - anchor).dot(axis);
        centroid - (anchor + axis * along)
    }

    /// Index offset into `below` that lines its first vertex up with the
    /// closest-facing vertex of `upper`
    fn align(&self, below: &[u32], below_anchor: Vec3, upper: &[u32], head: Vec3) -> usize {
        let s = self.layout.segments;
        let axis = normalize_or_zero(head - below_anchor);
        let reference = normalize_or_zero(scale_in_direction(
            normalize_or_zero(self.position(below[0]) - below_anchor),
            axis,
            0.0,
        ));

        let mut best = 0;
        let mut best_match = f32::NEG_INFINITY;
        for (i, &index) in upper.iter().enumerate() {
            let direction = normalize_or_zero(self.position(index) - head);
            let matching = direction.dot(reference);
            if matching > best_match {
                best_match = matching;
                best = i;
            }
        }
        (s - best) % s
    }

    /// Join two rings with a band of `2 * segments` triangles, returning the
    /// alignment offset used
    fn stitch_band(&mut self, below: &[u32], below_anchor: Vec3, upper: &[u32], head: Vec3) -> usize {
        let s = self.layout.segments;
        let offset = self.align(below, below_anchor, upper, head);
        let lower = |i: usize| below[(i + offset) % s];

        let axis = normalize_or_zero(head - below_anchor);
        let probe = [upper[0], upper[1], lower(0)];
        let flip = self
            .face_normal(probe)
            .dot(self.away_from_axis(probe, below_anchor, axis))
            < 0.0;

        for i in 0..s {
            let (up, up_next) = (upper[i], upper[(i + 1) % s]);
            let (low, low_next) = (lower(i), lower(i + 1));
            if flip {
                self.trunk.push_face([up, low, up_next]);
                self.trunk.push_face([up_next, low, low_next]);
            } else {
                self.trunk.push_face([up, up_next, low]);
                self.trunk.push_face([up_next, low_next, low]);
            }
        }
        offset
    }

    /// Close a ring with a fan of `segments` triangles meeting at `tip`
    fn stitch_fan(&mut self, below: &[u32], below_anchor: Vec3, tip: u32) {
        let s = self.layout.segments;
        let axis = normalize_or_zero(self.position(tip) - below_anchor);
        let probe = [tip, below[1], below[0]];
        let flip = self
            .face_normal(probe)
            .dot(self.away_from_axis(probe, below_anchor, axis))
            < 0.0;

        for i in 0..s {
            let (current, next) = (below[i], below[(i + 1) % s]);
            if flip {
                self.trunk.push_face([tip, current, next]);
            } else {
                self.trunk.push_face([tip, next, current]);
            }
        }
    }

    /// Double-sided card hanging back from a leaf tip
    fn twig_card(&mut self, skeleton: &Skeleton, id: BranchId) {
        let branch = skeleton.branch(id);
        let head = branch.head;
        let spread = match branch.parent {
            Some(parent) => skeleton.branch(parent).tangent,
            None => perpendicular(branch.tangent),
        };
        let along = normalize_or_zero(head - skeleton.stem_base(id));
        let size = self.props.twig_scale;

        let side = spread * size;
        let top = along * (size * 2.0 - branch.length);
        let bottom = along * -branch.length;
        let corners = [
            head + side + top,
            head - side + top,
            head - side + bottom,
            head + side + bottom,
        ];
        const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        let front_normal = normalize_or_zero((corners[1] - corners[0]).cross(corners[2] - corners[0]));
        let back_normal = -front_normal;

        let mut front = [0u32; 4];
        let mut back = [0u32; 4];
        for (slot, corner) in corners.iter().enumerate() {
            front[slot] = self
                .twigs
                .push_vertex(to_array(*corner), to_array(front_normal), UVS[slot]);
        }
        for (slot, corner) in corners.iter().enumerate() {
            back[slot] = self
                .twigs
                .push_vertex(to_array(*corner), to_array(back_normal), UVS[slot]);
        }

        self.twigs.push_face([front[0], front[1], front[2]]);
        self.twigs.push_face([front[3], front[0], front[2]]);
        self.twigs.push_face([back[2], back[1], back[0]]);
        self.twigs.push_face([back[2], back[0], back[3]]);
    }
}

/// Any unit vector perpendicular to `v`
fn perpendicular(v: Vec3) -> Vec3 {
    let candidate = v.cross(Vec3::unit_x());
    if candidate.magnitude2() > 1e-6 {
        candidate.normalize()
    } else {
        normalize_or_zero(v.cross(Vec3::unit_z()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn emit_with(props: &TreeProperties) -> (Skeleton, MeshBudget, MeshSection, MeshSection) {
        let mut skeleton = Skeleton::build(props);
        let budget = measure(&skeleton, props.segments);
        let (trunk, twigs) = emit(&mut skeleton, props, &budget).expect("emission fills its budget");
        (skeleton, budget, trunk, twigs)
    }

    fn random_props(rng: &mut StdRng) -> TreeProperties {
        TreeProperties {
            seed: rng.random_range(0..5000),
            segments: rng.random_range(3..=16),
            levels: rng.random_range(1..=6),
            tree_steps: rng.random_range(0..=8),
            branch_factor: rng.random_range(2.0..4.0),
            clump_min: rng.random_range(0.1..0.5),
            clump_max: rng.random_range(0.5..0.9),
            twist_rate: rng.random_range(0.5..6.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_fork_budget() {
        let props = TreeProperties { levels: 2, tree_steps: 0, ..Default::default() };
        let skeleton = Skeleton::build(&props);
        let budget = measure(&skeleton, 12);
        // ground ring + fork ring, saddle and ring1 saddle copies + two tips
        assert_eq!(budget.trunk, SectionCounts { vertices: 12 + 12 + 5 + 5 + 2, faces: 24 + 12 + 12 });
        assert_eq!(budget.twigs, SectionCounts { vertices: 16, faces: 8 });
    }

    #[test]
    fn test_odd_ring_budget_includes_gap_face() {
        let props = TreeProperties { levels: 2, tree_steps: 0, segments: 3, ..Default::default() };
        let skeleton = Skeleton::build(&props);
        let budget = measure(&skeleton, 3);
        // the gap patch carries its own three vertices
        assert_eq!(budget.trunk, SectionCounts { vertices: 3 + 3 + 1 + 3 + 2, faces: 6 + 1 + 3 + 3 });
    }

    #[test]
    fn test_emission_matches_sizing() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let props = random_props(&mut rng);
            let (_, budget, trunk, twigs) = emit_with(&props);
            assert_eq!(trunk.vertex_count(), budget.trunk.vertices, "{:?}", props);
            assert_eq!(trunk.triangle_count(), budget.trunk.faces, "{:?}", props);
            assert_eq!(twigs.vertex_count(), budget.twigs.vertices, "{:?}", props);
            assert_eq!(twigs.triangle_count(), budget.twigs.faces, "{:?}", props);
            assert_eq!(trunk.vertices.capacity(), budget.trunk.vertices);
            assert_eq!(trunk.indices.capacity(), budget.trunk.faces * 3);
        }
    }

    #[test]
    fn test_rings_have_segment_count_and_distinct_indices() {
        for segments in [3, 4, 5, 12] {
            let props = TreeProperties { segments, levels: 4, ..Default::default() };
            let (skeleton, _, trunk, _) = emit_with(&props);
            for (_, branch) in skeleton.iter() {
                let rings = &branch.rings;
                if branch.is_leaf() {
                    assert!(rings.ring0.is_empty());
                    assert!(rings.end.is_some());
                    continue;
                }
                for ring in [&rings.ring0, &rings.ring1, &rings.ring2] {
                    assert_eq!(ring.len(), segments as usize);
                    let mut sorted = ring.clone();
                    sorted.sort_unstable();
                    sorted.dedup();
                    assert_eq!(sorted.len(), ring.len(), "ring repeats a vertex");
                    assert!(ring.iter().all(|&i| (i as usize) < trunk.vertex_count()));
                }
            }
            assert_eq!(skeleton.root().rings.base.len(), segments as usize);
        }
    }

    #[test]
    fn test_ring_u_wraps_once() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            let props = random_props(&mut rng);
            let (skeleton, _, trunk, _) = emit_with(&props);
            let u_of = |i: &u32| trunk.tex_coords[*i as usize][0];

            for (id, branch) in skeleton.iter() {
                let mut rings = vec![&branch.rings.ring0, &branch.rings.ring1, &branch.rings.ring2];
                if id == Skeleton::ROOT {
                    rings.push(&branch.rings.base);
                }
                for ring in rings.into_iter().filter(|r| !r.is_empty()) {
                    let us: Vec<f32> = ring.iter().map(u_of).collect();
                    let wraps = (0..us.len())
                        .filter(|&i| us[(i + 1) % us.len()] < us[i])
                        .count();
                    assert_eq!(wraps, 1, "ring u values {:?}", us);
                    assert!(us.iter().all(|u| (0.0..1.0).contains(u)));
                }
            }
        }
    }

    #[test]
    fn test_only_ring_wraps_cross_the_seam() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..20 {
            let props = random_props(&mut rng);
            let (skeleton, _, trunk, _) = emit_with(&props);
            let wrapping = trunk
                .faces()
                .filter(|face| {
                    let us = face.map(|i| trunk.tex_coords[i as usize][0]);
                    let high = us.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                    let low = us.iter().copied().fold(f32::INFINITY, f32::min);
                    high - low > 0.5
                })
                .count();
            // one face pair per band and one fan face per tip
            assert_eq!(
                wrapping,
                2 * skeleton.fork_count() + skeleton.leaf_count(),
                "{:?}",
                props
            );
        }
    }

    #[test]
    fn test_v_grows_up_the_tree() {
        let props = TreeProperties::default();
        let (skeleton, _, trunk, _) = emit_with(&props);
        let v_at = |branch: &crate::tree::skeleton::Branch| {
            let index = branch.rings.ring0.first().copied().or(branch.rings.end);
            index.map(|i| trunk.tex_coords[i as usize][1])
        };
        for (_, branch) in skeleton.iter() {
            if let Some(parent) = branch.parent {
                let (child_v, parent_v) = (v_at(branch), v_at(skeleton.branch(parent)));
                assert!(child_v > parent_v);
            }
        }
        for &i in &skeleton.root().rings.base {
            assert_eq!(trunk.tex_coords[i as usize][1], 0.0);
        }
    }

    #[test]
    fn test_faces_are_valid_triangles() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..30 {
            let props = random_props(&mut rng);
            let (_, _, trunk, twigs) = emit_with(&props);
            for section in [&trunk, &twigs] {
                for [a, b, c] in section.faces() {
                    assert!((a as usize) < section.vertex_count());
                    assert!((b as usize) < section.vertex_count());
                    assert!((c as usize) < section.vertex_count());
                    assert!(a != b && b != c && a != c, "degenerate face {:?}", [a, b, c]);
                }
            }
        }
    }

    #[test]
    fn test_twig_card_is_double_sided() {
        let props = TreeProperties { levels: 1, ..Default::default() };
        let (_, _, _, twigs) = emit_with(&props);
        assert_eq!(twigs.vertex_count(), TWIG_VERTICES);
        assert_eq!(twigs.triangle_count(), TWIG_FACES);

        let front = from_array(twigs.normals[0]);
        let back = from_array(twigs.normals[4]);
        assert!((front.magnitude() - 1.0).abs() < 1e-5);
        assert!((front + back).magnitude() < 1e-6);
        assert_eq!(twigs.vertices[..4], twigs.vertices[4..]);
        assert_eq!(twigs.tex_coords[0], [0.0, 1.0]);
        assert_eq!(twigs.tex_coords[6], [1.0, 0.0]);
    }

    #[test]
    fn test_perpendicular() {
        for v in [Vec3::unit_x(), Vec3::unit_y(), Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let p = perpendicular(v);
            assert!(p.dot(v).abs() < 1e-5);
            assert!((p.magnitude() - 1.0).abs() < 1e-5);
        }
    }
}
