//! Accessor dispatch
//!
//! The engine is invoked by the host only after an ordinary field access
//! failed: the field is absent, unset, or not visible from the caller. It
//! never intercepts a public field that holds a value.
//!
//! ## Read dispatch
//!
//! | shape       | action                                                   |
//! |-------------|----------------------------------------------------------|
//! | `Lazy`      | return promoted slot, else run lazy getter and promote   |
//! | `ReadOnly`  | run getter                                               |
//! | `Virtual`   | run getter                                               |
//! | `Public`    | return slot value, else `NotReadable`                    |
//! | `WriteOnly` | `NotReadable`                                            |
//! | (none)      | `NotReadable`                                            |
//!
//! ## Write dispatch
//!
//! | shape       | action                                                   |
//! |-------------|----------------------------------------------------------|
//! | `WriteOnly` | run setter                                               |
//! | `Virtual`   | run setter                                               |
//! | `Lazy`      | run setter if declared, else pre-seed the slot           |
//! | `Public`    | assign slot                                              |
//! | `ReadOnly`  | `NotWritable`                                            |
//! | (none)      | `NotWritable`                                            |

use std::sync::Arc;

use accessor_types::{
    ClassAccessors, ClassId, ClassRegistry, MethodDef, MethodResolver, Object, PropertyShape,
    ResolutionError, Value,
};

use crate::cache::TypeAccessorCache;
use crate::error::{AccessError, AccessResult};
use crate::options::EngineOptions;

/// Accessor dispatch engine over one class registry
#[derive(Debug)]
pub struct AccessorEngine {
    registry: Arc<ClassRegistry>,
    options: EngineOptions,
    cache: TypeAccessorCache,
}

impl AccessorEngine {
    /// Create an engine with default options
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    /// Create an engine with custom options
    pub fn with_options(registry: Arc<ClassRegistry>, options: EngineOptions) -> Self {
        Self {
            registry,
            options,
            cache: TypeAccessorCache::new(),
        }
    }

    /// The registry this engine reflects over
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Engine options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Number of classes whose accessor table has been computed
    pub fn cached_class_count(&self) -> usize {
        self.cache.len()
    }

    /// Accessor table for a class, computed on first use
    pub fn accessors(&self, class_id: ClassId) -> Result<Arc<ClassAccessors>, ResolutionError> {
        self.cache.get_or_try_insert_with(class_id, || {
            let resolver = MethodResolver::new(
                &self.registry,
                &self.options.naming,
                self.options.conflict_policy,
            );
            let table = resolver.resolve(class_id)?;
            tracing::debug!(
                class = table.class_name(),
                properties = table.len(),
                facades = table.facade_properties().len(),
                "resolved accessor table"
            );
            Ok(table)
        })
    }

    /// Read a property the host could not read directly
    pub fn resolve_read(&self, obj: &mut Object, property: &str) -> AccessResult<Value> {
        let table = self.accessors(obj.class_id())?;
        let class = table.class_name();
        let Some(meta) = table.get(property) else {
            return Err(AccessError::not_readable(property, class));
        };
        tracing::trace!(class, property, shape = meta.shape.name(), "read dispatch");

        match &meta.shape {
            PropertyShape::Lazy { lazy_getter, .. } => {
                if let Some(value) = obj.field(property) {
                    return Ok(value.clone());
                }
                let value = invoke(class, lazy_getter, obj, &[])?;
                obj.cache_field(property, value.clone());
                tracing::trace!(class, property, "promoted lazy value");
                Ok(value)
            }
            PropertyShape::ReadOnly { getter } | PropertyShape::Virtual { getter, .. } => {
                invoke(class, getter, obj, &[])
            }
            PropertyShape::Public => obj
                .field(property)
                .cloned()
                .ok_or_else(|| AccessError::not_readable(property, class)),
            PropertyShape::WriteOnly { .. } => Err(AccessError::not_readable(property, class)),
        }
    }

    /// Write a property the host could not write directly
    pub fn resolve_write(
        &self,
        obj: &mut Object,
        property: &str,
        value: Value,
    ) -> AccessResult<()> {
        let table = self.accessors(obj.class_id())?;
        let class = table.class_name();
        let Some(meta) = table.get(property) else {
            return Err(AccessError::not_writable(property, class));
        };
        tracing::trace!(
            class,
            property,
            shape = meta.shape.name(),
            kind = value.kind_name(),
            "write dispatch"
        );

        match &meta.shape {
            PropertyShape::WriteOnly { setter } | PropertyShape::Virtual { setter, .. } => {
                invoke(class, setter, obj, &[value]).map(|_| ())
            }
            PropertyShape::Lazy { setter: Some(setter), .. } => {
                invoke(class, setter, obj, &[value]).map(|_| ())
            }
            PropertyShape::Lazy { setter: None, .. } | PropertyShape::Public => {
                obj.set_field(property, value);
                Ok(())
            }
            PropertyShape::ReadOnly { .. } => Err(AccessError::not_writable(property, class)),
        }
    }

    /// Check if a property is readable and not null
    ///
    /// Write-only and unknown properties report `false` rather than an error.
    pub fn resolve_isset(&self, obj: &mut Object, property: &str) -> AccessResult<bool> {
        let table = self.accessors(obj.class_id())?;
        match table.get(property).map(|meta| &meta.shape) {
            None | Some(PropertyShape::WriteOnly { .. }) => Ok(false),
            Some(_) => match self.resolve_read(obj, property) {
                Ok(value) => Ok(!value.is_null()),
                Err(AccessError::NotReadable { .. }) => Ok(false),
                Err(err) => Err(err),
            },
        }
    }

    /// Drop an instance's value for a property
    ///
    /// Only instance state changes; the class's accessor table is untouched,
    /// so the next read is intercepted again.
    pub fn on_property_removed(&self, obj: &mut Object, property: &str) {
        let removed = obj.unset_field(property);
        tracing::trace!(class_id = obj.class_id(), property, removed, "property removed");
    }

    /// Façade properties of a class, most-derived declarations first
    pub fn list_facade_properties(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<String>, ResolutionError> {
        Ok(self.accessors(class_id)?.facade_properties().to_vec())
    }
}

fn invoke(
    class: &str,
    method: &MethodDef,
    obj: &mut Object,
    args: &[Value],
) -> AccessResult<Value> {
    method.invoke(obj, args).map_err(|err| AccessError::MethodFailed {
        class: class.to_string(),
        method: method.name.clone(),
        message: err.0,
    })
}
