//! Accessor Method Resolution
//!
//! Discovers, for one class, which properties are served by convention-named
//! accessor methods:
//!
//! | method            | role                                          |
//! |-------------------|-----------------------------------------------|
//! | `get_<p>`         | getter, invoked on every read                 |
//! | `set_<p>`         | setter, invoked on every write                |
//! | `lazy_get_<p>`    | lazy getter, result promoted into slot `<p>`  |
//!
//! Only protected/private methods participate. A public `get_x` is ordinary
//! API and never intercepts anything.
//!
//! Resolution is a single pass over the ancestry (most-derived class first)
//! that produces a [`ClassAccessors`] table. The table depends on static class
//! information only, so callers may cache it for as long as the registry lives.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::class::{ClassId, MethodDef, Visibility};
use crate::error::ResolutionError;
use crate::registry::ClassRegistry;

/// Method-name prefixes recognised as accessors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    /// Prefix for getters
    pub getter_prefix: String,
    /// Prefix for setters
    pub setter_prefix: String,
    /// Prefix for lazy getters
    pub lazy_getter_prefix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            getter_prefix: "get_".to_string(),
            setter_prefix: "set_".to_string(),
            lazy_getter_prefix: "lazy_get_".to_string(),
        }
    }
}

/// Role of a convention-named method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// `get_<p>`
    Getter,
    /// `set_<p>`
    Setter,
    /// `lazy_get_<p>`
    LazyGetter,
}

impl NamingConvention {
    /// Split a method name into its accessor role and property name
    ///
    /// The lazy prefix is tried first so that a getter prefix which is itself
    /// a prefix of the lazy one cannot steal lazy getters.
    pub fn classify<'n>(&self, method_name: &'n str) -> Option<(AccessorKind, &'n str)> {
        let candidates = [
            (AccessorKind::LazyGetter, self.lazy_getter_prefix.as_str()),
            (AccessorKind::Getter, self.getter_prefix.as_str()),
            (AccessorKind::Setter, self.setter_prefix.as_str()),
        ];
        candidates.into_iter().find_map(|(kind, prefix)| {
            method_name
                .strip_prefix(prefix)
                .filter(|property| !prefix.is_empty() && !property.is_empty())
                .map(|property| (kind, property))
        })
    }

    /// Build the method name for a property and role
    pub fn method_name(&self, kind: AccessorKind, property: &str) -> String {
        let prefix = match kind {
            AccessorKind::Getter => &self.getter_prefix,
            AccessorKind::Setter => &self.setter_prefix,
            AccessorKind::LazyGetter => &self.lazy_getter_prefix,
        };
        format!("{}{}", prefix, property)
    }
}

/// How to treat a class that declares both `get_<p>` and `lazy_get_<p>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// The lazy getter serves reads; the conflict is logged
    #[default]
    PreferLazy,
    /// Resolution fails with [`ResolutionError::AmbiguousAccessor`]
    Reject,
}

/// Shape of a property, as determined by its accessors
#[derive(Debug, Clone)]
pub enum PropertyShape {
    /// Plain public field, no accessors
    Public,
    /// Getter only
    ReadOnly {
        /// Getter method
        getter: MethodDef,
    },
    /// Setter only
    WriteOnly {
        /// Setter method
        setter: MethodDef,
    },
    /// Getter and setter
    Virtual {
        /// Getter method
        getter: MethodDef,
        /// Setter method
        setter: MethodDef,
    },
    /// Lazy getter, optionally with a setter for writes
    Lazy {
        /// Lazy getter method
        lazy_getter: MethodDef,
        /// Setter method, if declared
        setter: Option<MethodDef>,
    },
}

impl PropertyShape {
    /// Short name for logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            PropertyShape::Public => "public",
            PropertyShape::ReadOnly { .. } => "read-only",
            PropertyShape::WriteOnly { .. } => "write-only",
            PropertyShape::Virtual { .. } => "virtual",
            PropertyShape::Lazy { .. } => "lazy",
        }
    }

    /// Getter that serves reads, if any (lazy getters excluded)
    pub fn getter(&self) -> Option<&MethodDef> {
        match self {
            PropertyShape::ReadOnly { getter } | PropertyShape::Virtual { getter, .. } => {
                Some(getter)
            }
            _ => None,
        }
    }

    /// Setter that serves writes, if any
    pub fn setter(&self) -> Option<&MethodDef> {
        match self {
            PropertyShape::WriteOnly { setter } | PropertyShape::Virtual { setter, .. } => {
                Some(setter)
            }
            PropertyShape::Lazy { setter, .. } => setter.as_ref(),
            _ => None,
        }
    }
}

/// Resolved metadata for one property of one class
#[derive(Debug, Clone)]
pub struct PropertyMetadata {
    /// Property shape
    pub shape: PropertyShape,
    /// A protected/private field of the same name backs the accessors
    pub is_facade: bool,
}

/// Accessor table for one class
#[derive(Debug, Clone)]
pub struct ClassAccessors {
    class_id: ClassId,
    class_name: String,
    properties: IndexMap<String, PropertyMetadata>,
    facades: Vec<String>,
}

impl ClassAccessors {
    /// Class this table describes
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Name of the class this table describes
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Metadata for a property
    pub fn get(&self, property: &str) -> Option<&PropertyMetadata> {
        self.properties.get(property)
    }

    /// Iterate over properties in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyMetadata)> {
        self.properties.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    /// Façade property names in field declaration order
    pub fn facade_properties(&self) -> &[String] {
        &self.facades
    }

    /// Number of properties with metadata
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the class has no accessor-backed or public properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Convention-based accessor resolver
pub struct MethodResolver<'a> {
    registry: &'a ClassRegistry,
    naming: &'a NamingConvention,
    conflict_policy: ConflictPolicy,
}

impl<'a> MethodResolver<'a> {
    /// Create a resolver over a registry
    pub fn new(
        registry: &'a ClassRegistry,
        naming: &'a NamingConvention,
        conflict_policy: ConflictPolicy,
    ) -> Self {
        Self {
            registry,
            naming,
            conflict_policy,
        }
    }

    /// Compute the accessor table for a class
    pub fn resolve(&self, class_id: ClassId) -> Result<ClassAccessors, ResolutionError> {
        let chain = self.registry.ancestry(class_id)?;
        let class_name = chain[0].name.clone();

        let mut seen_methods: FxHashSet<&str> = FxHashSet::default();
        let mut getters: IndexMap<&str, &MethodDef> = IndexMap::new();
        let mut setters: IndexMap<&str, &MethodDef> = IndexMap::new();
        let mut lazy_getters: IndexMap<&str, &MethodDef> = IndexMap::new();
        let mut names: IndexSet<&str> = IndexSet::new();

        for class in &chain {
            for method in &class.methods {
                // Most-derived declaration shadows the rest, public or not
                if !seen_methods.insert(method.name.as_str()) {
                    continue;
                }
                if method.visibility.is_public() {
                    continue;
                }
                let Some((kind, property)) = self.naming.classify(&method.name) else {
                    continue;
                };
                let table = match kind {
                    AccessorKind::Getter => &mut getters,
                    AccessorKind::Setter => &mut setters,
                    AccessorKind::LazyGetter => &mut lazy_getters,
                };
                table.insert(property, method);
                names.insert(property);
            }
        }

        let mut fields: IndexMap<&str, Visibility> = IndexMap::new();
        for class in &chain {
            for field in &class.fields {
                fields
                    .entry(field.name.as_str())
                    .or_insert(field.visibility);
            }
        }
        for (name, visibility) in &fields {
            if visibility.is_public() {
                names.insert(*name);
            }
        }

        let mut properties = IndexMap::with_capacity(names.len());
        for name in names {
            let getter = getters.get(name).copied();
            let setter = setters.get(name).copied();
            let lazy_getter = lazy_getters.get(name).copied();

            let shape = match (lazy_getter, getter, setter) {
                (Some(lazy_getter), getter, setter) => {
                    if getter.is_some() {
                        self.check_conflict(&class_name, name)?;
                    }
                    PropertyShape::Lazy {
                        lazy_getter: lazy_getter.clone(),
                        setter: setter.cloned(),
                    }
                }
                (None, Some(getter), Some(setter)) => PropertyShape::Virtual {
                    getter: getter.clone(),
                    setter: setter.clone(),
                },
                (None, Some(getter), None) => PropertyShape::ReadOnly {
                    getter: getter.clone(),
                },
                (None, None, Some(setter)) => PropertyShape::WriteOnly {
                    setter: setter.clone(),
                },
                (None, None, None) => PropertyShape::Public,
            };

            let is_facade = fields.get(name).is_some_and(|v| !v.is_public())
                && (getter.is_some() || setter.is_some());

            properties.insert(name.to_string(), PropertyMetadata { shape, is_facade });
        }

        let facades = fields
            .keys()
            .filter(|name| {
                properties
                    .get(**name)
                    .is_some_and(|m: &PropertyMetadata| m.is_facade)
            })
            .map(|name| name.to_string())
            .collect();

        Ok(ClassAccessors {
            class_id,
            class_name,
            properties,
            facades,
        })
    }

    fn check_conflict(&self, class_name: &str, property: &str) -> Result<(), ResolutionError> {
        match self.conflict_policy {
            ConflictPolicy::PreferLazy => {
                tracing::warn!(
                    class = class_name,
                    property,
                    getter = %self.naming.method_name(AccessorKind::Getter, property),
                    lazy_getter = %self.naming.method_name(AccessorKind::LazyGetter, property),
                    "getter and lazy getter both declared; lazy getter serves reads"
                );
                Ok(())
            }
            ConflictPolicy::Reject => Err(ResolutionError::AmbiguousAccessor {
                class: class_name.to_string(),
                property: property.to_string(),
            }),
        }
    }
}
