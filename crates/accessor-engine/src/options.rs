//! Engine configuration

use accessor_types::{ConflictPolicy, NamingConvention};
use serde::{Deserialize, Serialize};

/// Engine configuration
///
/// Deserializable so hosts can keep it next to the rest of their settings;
/// every field falls back to its default when omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Accessor method-name prefixes
    pub naming: NamingConvention,
    /// Treatment of classes declaring both a getter and a lazy getter
    pub conflict_policy: ConflictPolicy,
}

impl EngineOptions {
    /// Options with a custom naming convention
    pub fn with_naming(naming: NamingConvention) -> Self {
        Self {
            naming,
            ..Self::default()
        }
    }

    /// Options with a custom conflict policy
    pub fn with_conflict_policy(conflict_policy: ConflictPolicy) -> Self {
        Self {
            conflict_policy,
            ..Self::default()
        }
    }
}
