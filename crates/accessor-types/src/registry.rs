//! Class registry
//!
//! The registry is the type universe the accessor engine reflects over.
//! It is built once and then shared immutably.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::class::{Class, ClassBuilder, ClassId};
use crate::error::ResolutionError;

/// Registry of all classes
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, assigning it the next available ID
    pub fn register_class(&mut self, mut class: Class) -> ClassId {
        let id = self.next_class_id();
        class.assign_id(id);
        self.name_to_id.insert(class.name.clone(), id);
        self.classes.push(class);
        id
    }

    /// Register a class from a builder
    pub fn define(&mut self, builder: ClassBuilder) -> ClassId {
        self.register_class(builder.build())
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(*id))
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        self.classes.len()
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Walk the inheritance chain, most-derived class first
    pub fn ancestry(&self, id: ClassId) -> Result<Vec<&Class>, ResolutionError> {
        let mut current = self
            .get_class(id)
            .ok_or(ResolutionError::UnknownClass(id))?;
        let mut chain = Vec::new();
        let mut visited = FxHashSet::default();

        loop {
            if !visited.insert(current.id) {
                return Err(ResolutionError::InheritanceCycle {
                    class: current.name.clone(),
                });
            }
            chain.push(current);

            let Some(parent_id) = current.parent_id else {
                break;
            };
            current = self
                .get_class(parent_id)
                .ok_or_else(move || ResolutionError::MissingParent {
                    class: current.name.clone(),
                    parent: parent_id,
                })?;
        }

        Ok(chain)
    }
}
