//! # Generation Errors
//!
//! Everything that can go wrong while turning a [`TreeProperties`] bundle into
//! a mesh. Generation is a pure computation, so there are only two kinds of
//! failure: a property set that would produce degenerate geometry, and an
//! internal sizing mismatch between the two mesh passes.
//!
//! [`TreeProperties`]: crate::tree::TreeProperties

use thiserror::Error;

/// Why a single property value was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyIssue {
    /// An integer property lies outside its accepted range
    #[error("{value} is outside the accepted range {min}..={max}")]
    OutOfRange { value: u32, min: u32, max: u32 },
    /// A float property must be strictly greater than zero
    #[error("{value} must be greater than zero")]
    NotPositive { value: f32 },
    /// A float property is NaN or infinite
    #[error("{value} is not a finite number")]
    NotFinite { value: f32 },
}

/// Mesh section a sizing mismatch was detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Trunk and branch tubes
    Trunk,
    /// Twig cards
    Twigs,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Trunk => f.write_str("trunk"),
            SectionKind::Twigs => f.write_str("twig"),
        }
    }
}

/// Errors returned by tree generation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// A property value is rejected before any geometry is built
    #[error("invalid tree property `{name}`: {issue}")]
    InvalidProperty {
        name: &'static str,
        #[source]
        issue: PropertyIssue,
    },

    /// The emission pass wrote a different amount of data than the sizing
    /// pass reserved. This is a bug in the generator, never a user error.
    #[error("{section} {what} count mismatch: sized {expected}, emitted {written}")]
    SizingMismatch {
        section: SectionKind,
        what: &'static str,
        expected: usize,
        written: usize,
    },
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, TreeError>;
