//! # Branch Skeleton
//!
//! The skeleton is a binary tree of [`Branch`] records stored in a flat arena
//! and addressed by [`BranchId`]. The root sits at index 0; parent and child
//! links are indices, so the whole structure is released in one step when the
//! [`Skeleton`] is dropped.
//!
//! ## How a tree grows
//!
//! 1. **Root**: a trunk segment from the origin up to `trunk_length`
//! 2. **Split**: every branch below the last level forks into two children.
//!    The first direction is clumped toward the parent direction with seeded
//!    jitter, the second one is mirrored away from it.
//! 3. **Trunk**: for the first `tree_steps` forks the first child continues
//!    the trunk upward instead, while the second child twists around it
//! 4. **Leaves**: branches on the last level stop splitting and carry twigs

use std::f32::consts::TAU;

use cgmath::Zero;

use super::random::SeededRandom;
use super::TreeProperties;
use crate::math::{mirror_about, normalize_or_zero, Vec3};

/// Index of a branch inside its [`Skeleton`]
pub type BranchId = usize;

/// Whether a branch belongs to the trunk or to a limb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Trunk,
    Limb,
}

/// Mesh vertex indices attached to a branch by the emitter.
///
/// `ring0` is the cross-section at the branch head. At a fork, `ring1` and
/// `ring2` are the openings the first and second child attach to. Only the
/// root has a `base` ring, and only leaves have an `end` tip vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchRings {
    pub ring0: Vec<u32>,
    pub ring1: Vec<u32>,
    pub ring2: Vec<u32>,
    pub base: Vec<u32>,
    pub end: Option<u32>,
}

/// One segment of the skeleton
#[derive(Debug, Clone)]
pub struct Branch {
    /// End point of the segment
    pub head: Vec3,
    /// Fork plane normal for forks, growth direction for leaves
    pub tangent: Vec3,
    /// Length handed to the segments growing out of this one
    pub length: f32,
    pub kind: BranchKind,
    /// Fork depth, 0 at the root. Trunk continuations keep their parent's depth.
    pub depth: u32,
    /// Tube radius at the head
    pub radius: f32,
    pub parent: Option<BranchId>,
    pub children: Option<[BranchId; 2]>,
    pub rings: BranchRings,
}

impl Branch {
    fn new(
        head: Vec3,
        parent: Option<BranchId>,
        kind: BranchKind,
        depth: u32,
        length: f32,
        radius: f32,
    ) -> Self {
        Self {
            head,
            tangent: Vec3::zero(),
            length,
            kind,
            depth,
            radius,
            parent,
            children: None,
            rings: BranchRings::default(),
        }
    }

    /// Whether this branch ends the recursion
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_trunk(&self) -> bool {
        self.kind == BranchKind::Trunk
    }

    /// Radius used for ring geometry, never wider than the outgoing segment
    pub fn ring_radius(&self) -> f32 {
        self.radius.min(self.length)
    }
}

/// Arena-backed binary tree of branches
#[derive(Debug, Clone)]
pub struct Skeleton {
    branches: Vec<Branch>,
}

impl Skeleton {
    /// Id of the root branch
    pub const ROOT: BranchId = 0;

    /// Grow a complete skeleton from validated properties.
    ///
    /// The random sequence is created from `props.seed` here, so every call
    /// replays the same draws.
    pub fn build(props: &TreeProperties) -> Self {
        let mut builder = SkeletonBuilder {
            props,
            random: SeededRandom::new(props.seed),
            branches: Vec::new(),
        };

        let root = builder.push(Branch::new(
            Vec3::new(0.0, props.trunk_length, 0.0),
            None,
            BranchKind::Trunk,
            0,
            props.initial_branch_length,
            props.max_radius,
        ));
        builder.split(root, props.tree_steps, 1, 1);

        log::trace!(
            "skeleton grown with {} random draws",
            builder.random.draws()
        );

        Self {
            branches: builder.branches,
        }
    }

    pub fn root(&self) -> &Branch {
        &self.branches[Self::ROOT]
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id]
    }

    pub(crate) fn branch_mut(&mut self, id: BranchId) -> &mut Branch {
        &mut self.branches[id]
    }

    /// Number of branches, forks and leaves together
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// A built skeleton always holds at least the root
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Iterate branches in arena order
    pub fn iter(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.branches.iter().enumerate()
    }

    pub fn leaf_count(&self) -> usize {
        self.branches.iter().filter(|b| b.is_leaf()).count()
    }

    pub fn fork_count(&self) -> usize {
        self.len() - self.leaf_count()
    }

    pub fn max_depth(&self) -> u32 {
        self.branches.iter().map(|b| b.depth).max().unwrap_or(0)
    }

    /// Start point of a branch's segment: its parent's head, or the origin
    pub fn stem_base(&self, id: BranchId) -> Vec3 {
        stem_base(&self.branches, id)
    }

    /// Whether `id` is the first child of its parent
    pub fn is_first_child(&self, id: BranchId) -> bool {
        self.branches[id]
            .parent
            .and_then(|parent| self.branches[parent].children)
            .is_some_and(|[first, _]| first == id)
    }

    /// The one traversal order shared by every mesh pass: a branch, then
    /// its first child's subtree, then its second child's subtree.
    ///
    /// Vertex indices are assigned in this order, so the sizing pass and the
    /// emission pass must both walk it.
    pub fn preorder(&self) -> Vec<BranchId> {
        let mut order = Vec::with_capacity(self.branches.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some([first, second]) = self.branches[id].children {
                stack.push(second);
                stack.push(first);
            }
        }
        order
    }
}

fn stem_base(branches: &[Branch], id: BranchId) -> Vec3 {
    match branches[id].parent {
        Some(parent) => branches[parent].head,
        None => Vec3::zero(),
    }
}

struct SkeletonBuilder<'a> {
    props: &'a TreeProperties,
    random: SeededRandom,
    branches: Vec<Branch>,
}

impl SkeletonBuilder<'_> {
    fn push(&mut self, branch: Branch) -> BranchId {
        self.branches.push(branch);
        self.branches.len() - 1
    }

    /// Fork `id` into two children and recurse into both.
    ///
    /// `steps` counts the trunk continuations still to come; `l1` and `l2`
    /// count first-child and second-child descents and feed the fixed random
    /// values, so siblings never share a draw.
    fn split(&mut self, id: BranchId, steps: u32, l1: u32, l2: u32) {
        let props = self.props;
        let base = stem_base(&self.branches, id);
        let branch = &self.branches[id];
        let head = branch.head;
        let length = branch.length;
        let depth = branch.depth;
        let ring_radius = branch.ring_radius();
        let dir = normalize_or_zero(head - base);

        if depth + 1 >= props.levels {
            self.branches[id].tangent = dir;
            return;
        }

        let normal = dir.cross(Vec3::new(dir.z, dir.x, dir.y));
        let tangent = dir.cross(normal);

        let r = self.random.random(
            depth as f32 * 10.0 + l1 as f32 * 5.0 + l2 as f32 + props.seed as f32,
        );
        let clump = (props.clump_max - props.clump_min) * r + props.clump_min;

        let mut adjust = normal * r + tangent * (1.0 - r);
        if r > 0.5 {
            adjust = -adjust;
        }

        let mut dir0 = normalize_or_zero(adjust * (1.0 - clump) + dir * clump);
        let mut dir1 = mirror_about(dir0, dir, props.branch_factor);
        if r > 0.5 {
            std::mem::swap(&mut dir0, &mut dir1);
        }
        if steps > 0 {
            let angle = steps as f32 / props.tree_steps as f32 * TAU * props.twist_rate;
            dir1 = normalize_or_zero(Vec3::new(angle.sin(), r, angle.cos()));
        }

        // levels >= 2 here, so the span is never zero
        let span = (props.levels - 1) as f32;
        let remaining = (span - depth as f32) / span;
        let grow = remaining * remaining * props.grow_amount;
        let drop = depth as f32 * props.drop_amount;
        let sweep = depth as f32 * props.sweep_amount;
        let bias = Vec3::new(sweep, drop + grow, 0.0);
        dir0 = normalize_or_zero(dir0 + bias);
        dir1 = normalize_or_zero(dir1 + bias);

        let child_length =
            length.powf(props.length_falloff_power) * props.length_falloff_factor;
        let limb_radius = ring_radius * props.radius_falloff_rate;

        let (first, first_steps) = if steps > 0 {
            let kink = (r - 0.5) * 2.0 * props.trunk_kink;
            let continuation = Branch::new(
                head + Vec3::new(kink, props.climb_rate, kink),
                Some(id),
                BranchKind::Trunk,
                depth,
                length * props.taper_rate,
                ring_radius * props.taper_rate,
            );
            (continuation, steps - 1)
        } else {
            let limb = Branch::new(
                head + dir0 * length,
                Some(id),
                BranchKind::Limb,
                depth + 1,
                child_length,
                limb_radius,
            );
            (limb, 0)
        };
        let second = Branch::new(
            head + dir1 * length,
            Some(id),
            BranchKind::Limb,
            depth + 1,
            child_length,
            limb_radius,
        );

        let fork_tangent = normalize_or_zero((head - first.head).cross(head - second.head));
        let first_id = self.push(first);
        let second_id = self.push(second);

        let branch = &mut self.branches[id];
        branch.children = Some([first_id, second_id]);
        branch.tangent = fork_tangent;

        self.split(first_id, first_steps, l1 + 1, l2);
        self.split(second_id, 0, l1, l2 + 1);
    }
}
