//! Host object model
//!
//! Implements the two-phase access protocol from the outside of a class:
//!
//! 1. Try the instance slot directly. This succeeds only for a public slot;
//!    reads additionally need the slot to hold a value.
//! 2. Otherwise hand the access to the [`AccessorEngine`].
//!
//! Method bodies run inside the class and use the raw [`Object`] API instead.

use std::sync::Arc;

use accessor_types::{ClassId, ClassRegistry, Object, PropertyShape, ResolutionError, Value};

use crate::engine::AccessorEngine;
use crate::error::AccessResult;
use crate::options::EngineOptions;

/// Object model with accessor interception
#[derive(Debug, Clone)]
pub struct ObjectModel {
    engine: Arc<AccessorEngine>,
}

impl ObjectModel {
    /// Create an object model over a registry
    pub fn new(registry: Arc<ClassRegistry>, options: EngineOptions) -> Self {
        Self {
            engine: Arc::new(AccessorEngine::with_options(registry, options)),
        }
    }

    /// Create an object model sharing an existing engine
    pub fn with_engine(engine: Arc<AccessorEngine>) -> Self {
        Self { engine }
    }

    /// The accessor engine behind this model
    pub fn engine(&self) -> &Arc<AccessorEngine> {
        &self.engine
    }

    /// Create an instance with one slot per declared field
    ///
    /// The most-derived declaration of a field name fixes its visibility and
    /// initial value.
    pub fn instantiate(&self, class_id: ClassId) -> Result<Object, ResolutionError> {
        let chain = self.engine.registry().ancestry(class_id)?;
        let mut obj = Object::new(class_id);
        for class in chain {
            for field in &class.fields {
                obj.declare_slot(&field.name, field.visibility, field.initial.clone());
            }
        }
        Ok(obj)
    }

    /// Read a property
    pub fn get(&self, obj: &mut Object, property: &str) -> AccessResult<Value> {
        if let Some(value) = obj.visible_field(property) {
            return Ok(value.clone());
        }
        self.engine.resolve_read(obj, property)
    }

    /// Write a property
    pub fn set(&self, obj: &mut Object, property: &str, value: Value) -> AccessResult<()> {
        if obj.has_public_slot(property) {
            obj.set_field(property, value);
            return Ok(());
        }
        self.engine.resolve_write(obj, property, value)
    }

    /// Remove a property's value from an instance
    ///
    /// A public slot is cleared directly. Behind that, only a lazy property's
    /// promoted value can be dropped; other non-public state is left alone.
    pub fn unset(&self, obj: &mut Object, property: &str) -> AccessResult<()> {
        if obj.has_public_slot(property) {
            self.engine.on_property_removed(obj, property);
            return Ok(());
        }
        let table = self.engine.accessors(obj.class_id())?;
        if let Some(PropertyShape::Lazy { .. }) = table.get(property).map(|meta| &meta.shape) {
            self.engine.on_property_removed(obj, property);
        }
        Ok(())
    }

    /// Check if a property is readable and not null
    pub fn isset(&self, obj: &mut Object, property: &str) -> AccessResult<bool> {
        if let Some(value) = obj.visible_field(property) {
            return Ok(!value.is_null());
        }
        self.engine.resolve_isset(obj, property)
    }
}
