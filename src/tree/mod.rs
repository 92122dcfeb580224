//! # Tree Generation
//!
//! Grows a branch skeleton from [`TreeProperties`] and turns it into a
//! [`TreeMesh`]:
//!
//! 1. [`TreeProperties::validate`] rejects unusable parameters
//! 2. [`Skeleton::build`] grows the branch hierarchy from the seeded random
//!    sequence
//! 3. [`emitter::measure`] sizes both buffers and [`emitter::emit`] fills them
//! 4. [`shading`] computes trunk normals and fixes the texture seam
//!
//! Generation is deterministic: the same properties always produce an
//! identical mesh.
//!
//! ```rust
//! use sapling::tree::{Tree, TreeProperties};
//!
//! let tree = Tree::new(TreeProperties { seed: 7, levels: 3, ..Default::default() })?;
//! let mesh = tree.generate()?;
//! assert!(mesh.trunk.triangle_count() > 0);
//! assert_eq!(mesh.twigs.vertex_count() % 8, 0);
//! # Ok::<(), sapling::TreeError>(())
//! ```

pub mod emitter;
pub mod properties;
pub mod random;
pub mod shading;
pub mod skeleton;

pub use properties::TreeProperties;
pub use random::SeededRandom;
pub use skeleton::{Branch, BranchId, BranchKind, BranchRings, Skeleton};

use crate::error::Result;
use crate::geometry::TreeMesh;

/// A validated set of properties, ready to generate from
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    properties: TreeProperties,
}

impl Tree {
    /// Validate `properties` and wrap them
    pub fn new(properties: TreeProperties) -> Result<Self> {
        if let Err(err) = properties.validate() {
            log::warn!("rejecting tree properties: {}", err);
            return Err(err);
        }
        Ok(Self { properties })
    }

    pub fn properties(&self) -> &TreeProperties {
        &self.properties
    }

    /// Grow the branch hierarchy without building a mesh
    pub fn skeleton(&self) -> Skeleton {
        Skeleton::build(&self.properties)
    }

    /// Generate the trunk and twig mesh
    pub fn generate(&self) -> Result<TreeMesh> {
        let props = &self.properties;
        let mut skeleton = self.skeleton();
        log::debug!(
            "grew {} branches ({} forks, {} leaves), depth {}",
            skeleton.len(),
            skeleton.fork_count(),
            skeleton.leaf_count(),
            skeleton.max_depth()
        );

        let budget = emitter::measure(&skeleton, props.segments);
        log::trace!("sized buffers: {:?}", budget);

        let (mut trunk, twigs) = emitter::emit(&mut skeleton, props, &budget)?;
        // Only the buffers outlive emission
        drop(skeleton);

        shading::apply_normals(&mut trunk);
        let seam_vertices = shading::fix_seams(&mut trunk);

        log::debug!(
            "generated tree: trunk {} vertices / {} faces ({} seam twins), twigs {} vertices / {} faces",
            trunk.vertex_count(),
            trunk.triangle_count(),
            seam_vertices,
            twigs.vertex_count(),
            twigs.triangle_count()
        );

        Ok(TreeMesh {
            trunk,
            twigs,
            budget,
            seam_vertices,
        })
    }
}

/// Validate `properties` and generate their mesh
pub fn generate(properties: &TreeProperties) -> Result<TreeMesh> {
    Tree::new(properties.clone())?.generate()
}
