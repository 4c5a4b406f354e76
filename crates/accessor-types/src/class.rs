//! Class model: declared fields, declared methods and visibility

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::object::Object;
use crate::value::Value;

/// Class ID (index into the class registry)
pub type ClassId = usize;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Reachable from anywhere
    Public,
    /// Reachable from the declaring class and its subclasses
    Protected,
    /// Reachable from the declaring class only
    Private,
}

impl Visibility {
    /// Check if the member is directly reachable from outside the class
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        };
        f.write_str(name)
    }
}

/// Error raised by a method body
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct MethodError(pub String);

impl From<&str> for MethodError {
    fn from(s: &str) -> Self {
        MethodError(s.to_string())
    }
}

impl From<String> for MethodError {
    fn from(s: String) -> Self {
        MethodError(s)
    }
}

/// Native method body
///
/// Bodies run inside the class, so they see every slot of the receiver
/// regardless of visibility.
pub type NativeMethod =
    Arc<dyn Fn(&mut Object, &[Value]) -> Result<Value, MethodError> + Send + Sync>;

/// A method declared on a class
#[derive(Clone)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Method visibility
    pub visibility: Visibility,
    /// Declaring class ID
    pub declaring_class: ClassId,
    body: NativeMethod,
}

impl MethodDef {
    /// Create a method with the given body
    pub fn new(name: impl Into<String>, visibility: Visibility, body: NativeMethod) -> Self {
        Self {
            name: name.into(),
            visibility,
            declaring_class: 0,
            body,
        }
    }

    /// Invoke the method on a receiver
    pub fn invoke(&self, receiver: &mut Object, args: &[Value]) -> Result<Value, MethodError> {
        (self.body)(receiver, args)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("declaring_class", &self.declaring_class)
            .finish_non_exhaustive()
    }
}

/// A field declared on a class
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field visibility
    pub visibility: Visibility,
    /// Initial value (None leaves the slot unset)
    pub initial: Option<Value>,
    /// Declaring class ID
    pub declaring_class: ClassId,
}

/// Class definition metadata
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID (unique identifier)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Parent class ID (None for root classes)
    pub parent_id: Option<ClassId>,
    /// Fields declared by this class, in declaration order
    pub fields: Vec<FieldDef>,
    /// Methods declared by this class, in declaration order
    pub methods: Vec<MethodDef>,
}

impl Class {
    /// Create a new root class
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create a new class with parent
    pub fn with_parent(id: ClassId, name: impl Into<String>, parent_id: ClassId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, name)
        }
    }

    /// Declare a field
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        visibility: Visibility,
        initial: Option<Value>,
    ) {
        self.fields.push(FieldDef {
            name: name.into(),
            visibility,
            initial,
            declaring_class: self.id,
        });
    }

    /// Declare a method
    pub fn add_method(&mut self, mut method: MethodDef) {
        method.declaring_class = self.id;
        self.methods.push(method);
    }

    /// Get a method declared by this class (not inherited)
    pub fn get_method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Get a field declared by this class (not inherited)
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Re-stamp the class ID on the class and its members
    pub(crate) fn assign_id(&mut self, id: ClassId) {
        self.id = id;
        for field in &mut self.fields {
            field.declaring_class = id;
        }
        for method in &mut self.methods {
            method.declaring_class = id;
        }
    }
}

/// Fluent builder for class definitions
///
/// ```ignore
/// let time = registry.define(
///     ClassBuilder::new("Time")
///         .field("seconds", Visibility::Public, Some(Value::Int(120)))
///         .method("get_minutes", Visibility::Protected, |obj, _| { ... }),
/// );
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    class: Class,
}

impl ClassBuilder {
    /// Start a root class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            class: Class::new(0, name),
        }
    }

    /// Set the parent class
    pub fn extends(mut self, parent_id: ClassId) -> Self {
        self.class.parent_id = Some(parent_id);
        self
    }

    /// Declare a field
    pub fn field(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        initial: Option<Value>,
    ) -> Self {
        self.class.add_field(name, visibility, initial);
        self
    }

    /// Declare a method from a closure
    pub fn method<F>(mut self, name: impl Into<String>, visibility: Visibility, body: F) -> Self
    where
        F: Fn(&mut Object, &[Value]) -> Result<Value, MethodError> + Send + Sync + 'static,
    {
        self.class.add_method(MethodDef::new(name, visibility, Arc::new(body)));
        self
    }

    /// Finish the class (the registry assigns the final ID)
    pub fn build(self) -> Class {
        self.class
    }
}
