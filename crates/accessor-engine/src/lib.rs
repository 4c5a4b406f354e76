//! Accessor Engine
//!
//! Intercepts reads and writes that the host object model could not satisfy
//! directly and routes them to convention-named accessor methods:
//! - Per-class accessor cache (append-only, safe for concurrent population)
//! - Read/write/isset dispatch with lazy promotion
//! - Two-phase host object model (`ObjectModel`)
//! - Façade-aware snapshot export/import

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cache;
pub mod engine;
pub mod error;
pub mod model;
pub mod options;
pub mod snapshot;

pub use cache::TypeAccessorCache;
pub use engine::AccessorEngine;
pub use error::{AccessError, AccessResult, SnapshotError};
pub use model::ObjectModel;
pub use options::EngineOptions;

pub use accessor_types::{
    Class, ClassBuilder, ClassId, ClassRegistry, ConflictPolicy, MethodError, NamingConvention,
    Object, PropertyShape, PropertyState, ResolutionError, Value, Visibility,
};
