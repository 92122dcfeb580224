//! # Generation Properties
//!
//! The parameter bundle that fully determines a generated tree. Two runs with
//! equal properties produce identical meshes.
//!
//! ## Usage
//!
//! ```rust
//! use sapling::tree::TreeProperties;
//!
//! let props = TreeProperties {
//!     seed: 7,
//!     levels: 4,
//!     ..Default::default()
//! };
//! assert!(props.validate().is_ok());
//! ```

use crate::error::{PropertyIssue, Result, TreeError};

/// Fewest vertices a ring cross-section may have
pub const MIN_SEGMENTS: u32 = 3;
/// Most vertices a ring cross-section may have
pub const MAX_SEGMENTS: u32 = 32;
/// Deepest branch recursion accepted
pub const MAX_LEVELS: u32 = 10;
/// Most trunk forks accepted
pub const MAX_TREE_STEPS: u32 = 32;

/// Shape, topology and seed parameters for one tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeProperties {
    /// Seed of the run-local random sequence
    pub seed: i32,
    /// Vertex count of every ring cross-section
    pub segments: u32,
    /// Maximum recursion depth; the root is level 1
    pub levels: u32,
    /// Number of trunk forks before the trunk stops continuing
    pub tree_steps: u32,
    /// Scale of the distance-based V texture coordinate
    pub v_multiplier: f32,
    /// Size of the twig cards at the branch tips
    pub twig_scale: f32,

    /// Outgoing segment length of the root branch
    pub initial_branch_length: f32,
    /// Multiplier applied to the length at each split
    pub length_falloff_factor: f32,
    /// Exponent applied to the length at each split
    pub length_falloff_power: f32,
    /// Lower bound of the per-split clumping toward the parent direction
    pub clump_min: f32,
    /// Upper bound of the per-split clumping toward the parent direction
    pub clump_max: f32,
    /// How strongly the second child is mirrored away from the first
    pub branch_factor: f32,
    /// Downward bias growing with depth
    pub drop_amount: f32,
    /// Upward bias strongest near the root
    pub grow_amount: f32,
    /// Sideways bias growing with depth
    pub sweep_amount: f32,

    /// Radius of the trunk at the root
    pub max_radius: f32,
    /// Radius multiplier for limbs at each split
    pub radius_falloff_rate: f32,
    /// Radius and length multiplier along the trunk
    pub taper_rate: f32,
    /// Height gained by each trunk continuation
    pub climb_rate: f32,
    /// Sideways jitter of each trunk continuation
    pub trunk_kink: f32,
    /// Turns of the trunk's side branches over all trunk forks
    pub twist_rate: f32,
    /// Height of the first trunk segment
    pub trunk_length: f32,
}

impl Default for TreeProperties {
    fn default() -> Self {
        Self {
            seed: 262,
            segments: 12,
            levels: 5,
            tree_steps: 5,
            v_multiplier: 0.36,
            twig_scale: 0.39,
            initial_branch_length: 0.49,
            length_falloff_factor: 0.85,
            length_falloff_power: 0.99,
            clump_min: 0.404,
            clump_max: 0.454,
            branch_factor: 2.45,
            drop_amount: -0.1,
            grow_amount: 0.235,
            sweep_amount: 0.05,
            max_radius: 0.139,
            radius_falloff_rate: 0.73,
            taper_rate: 0.947,
            climb_rate: 0.371,
            trunk_kink: 0.093,
            twist_rate: 3.02,
            trunk_length: 2.4,
        }
    }
}

impl TreeProperties {
    /// Check every property, returning the first rejected one
    pub fn validate(&self) -> Result<()> {
        check_range("segments", self.segments, MIN_SEGMENTS, MAX_SEGMENTS)?;
        check_range("levels", self.levels, 1, MAX_LEVELS)?;
        check_range("tree_steps", self.tree_steps, 0, MAX_TREE_STEPS)?;

        check_positive("twig_scale", self.twig_scale)?;
        check_positive("initial_branch_length", self.initial_branch_length)?;
        check_positive("length_falloff_factor", self.length_falloff_factor)?;
        check_positive("max_radius", self.max_radius)?;
        check_positive("radius_falloff_rate", self.radius_falloff_rate)?;
        check_positive("taper_rate", self.taper_rate)?;
        check_positive("trunk_length", self.trunk_length)?;
        check_positive("climb_rate", self.climb_rate)?;

        check_finite("v_multiplier", self.v_multiplier)?;
        check_finite("length_falloff_power", self.length_falloff_power)?;
        check_finite("clump_min", self.clump_min)?;
        check_finite("clump_max", self.clump_max)?;
        check_finite("branch_factor", self.branch_factor)?;
        check_finite("drop_amount", self.drop_amount)?;
        check_finite("grow_amount", self.grow_amount)?;
        check_finite("sweep_amount", self.sweep_amount)?;
        check_finite("trunk_kink", self.trunk_kink)?;
        check_finite("twist_rate", self.twist_rate)?;

        Ok(())
    }
}

fn check_range(name: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TreeError::InvalidProperty {
            name,
            issue: PropertyIssue::OutOfRange { value, min, max },
        })
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TreeError::InvalidProperty {
            name,
            issue: PropertyIssue::NotFinite { value },
        })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidProperty {
            name,
            issue: PropertyIssue::NotPositive { value },
        })
    }
}
