//! Accessor Types
//!
//! This crate provides the static side of the accessor pattern:
//! - Runtime values
//! - Class model (fields, methods, visibility, inheritance)
//! - Class registry and ancestry walks
//! - Instance state with explicit per-property slots
//! - Convention-based resolution of getter/setter/lazy-getter methods

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod error;
pub mod object;
pub mod registry;
pub mod resolver;
pub mod value;

pub use class::{
    Class, ClassBuilder, ClassId, FieldDef, MethodDef, MethodError, NativeMethod, Visibility,
};
pub use error::ResolutionError;
pub use object::{Object, PropertyState, Slot};
pub use registry::ClassRegistry;
pub use resolver::{
    AccessorKind, ClassAccessors, ConflictPolicy, MethodResolver, NamingConvention,
    PropertyMetadata, PropertyShape,
};
pub use value::Value;
