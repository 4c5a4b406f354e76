//! Resolution errors

use thiserror::Error;

use crate::class::ClassId;

/// Errors raised while computing accessor metadata for a class
///
/// These indicate a malformed class graph or definition. They are fatal to
/// the caller; retrying cannot change the outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// Class ID not present in the registry
    #[error("Unknown class id: {0}")]
    UnknownClass(ClassId),

    /// Parent class ID not present in the registry
    #[error("Class {class} extends unknown class id {parent}")]
    MissingParent {
        /// Class that names the missing parent
        class: String,
        /// Missing parent ID
        parent: ClassId,
    },

    /// Inheritance chain loops back on itself
    #[error("Circular inheritance detected at class {class}")]
    InheritanceCycle {
        /// Class where the cycle was detected
        class: String,
    },

    /// Both a getter and a lazy getter were resolved for one property
    #[error("Class {class} defines both a getter and a lazy getter for property '{property}'")]
    AmbiguousAccessor {
        /// Class being resolved
        class: String,
        /// Property name
        property: String,
    },
}
