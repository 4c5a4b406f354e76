//! Object instances and explicit per-property state
//!
//! Each instance keeps one [`Slot`] per known property. Whether a property is
//! present is never inferred from map membership alone: a slot records its
//! [`PropertyState`] explicitly, so promoting a lazy value, assigning a value
//! and removing a value are all observable state transitions.

use indexmap::IndexMap;

use crate::class::{ClassId, Visibility};
use crate::value::Value;

/// State of a single property on an instance
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyState {
    /// No value; reads fall through to the accessor engine
    #[default]
    Unset,
    /// Value produced by a lazy getter and promoted into the slot
    Cached(Value),
    /// Value assigned directly or through the declaration's initializer
    Explicit(Value),
}

impl PropertyState {
    /// Get the held value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            PropertyState::Unset => None,
            PropertyState::Cached(v) | PropertyState::Explicit(v) => Some(v),
        }
    }

    /// Check if the slot holds a value
    pub fn is_set(&self) -> bool {
        !matches!(self, PropertyState::Unset)
    }
}

/// A property slot on an instance
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Slot visibility (dynamic slots are always public)
    pub visibility: Visibility,
    /// Whether the slot comes from a field declaration
    pub declared: bool,
    /// Current state
    pub state: PropertyState,
}

impl Slot {
    /// Check if the slot's value is directly reachable from outside the class
    pub fn is_visible(&self) -> bool {
        self.visibility.is_public() && self.state.is_set()
    }
}

/// Object instance
///
/// The raw slot API here ignores visibility; it is what method bodies use.
/// Outside callers go through the two-phase protocol of the object model.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class_id: ClassId,
    slots: IndexMap<String, Slot>,
}

impl Object {
    /// Create an instance with no slots
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            slots: IndexMap::new(),
        }
    }

    /// Class ID of this instance
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Declare a slot for a field; an existing slot of the same name is kept
    pub fn declare_slot(&mut self, name: &str, visibility: Visibility, initial: Option<Value>) {
        if self.slots.contains_key(name) {
            return;
        }
        let state = match initial {
            Some(v) => PropertyState::Explicit(v),
            None => PropertyState::Unset,
        };
        self.slots.insert(
            name.to_string(),
            Slot {
                visibility,
                declared: true,
                state,
            },
        );
    }

    /// Get a slot
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// Iterate over slots in declaration/creation order
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    /// Get a field value, regardless of visibility
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).and_then(|slot| slot.state.value())
    }

    /// Get a field value only if it is directly reachable from outside
    pub fn visible_field(&self, name: &str) -> Option<&Value> {
        self.slots
            .get(name)
            .filter(|slot| slot.visibility.is_public())
            .and_then(|slot| slot.state.value())
    }

    /// Check if a public slot exists for this name (set or unset)
    pub fn has_public_slot(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.visibility.is_public())
    }

    /// Assign a field; creates a public dynamic slot when none exists
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.put(name, PropertyState::Explicit(value));
    }

    /// Store a promoted lazy value; creates a public dynamic slot when none exists
    pub fn cache_field(&mut self, name: &str, value: Value) {
        self.put(name, PropertyState::Cached(value));
    }

    /// Remove a field's value
    ///
    /// Declared slots go back to `Unset`; dynamic slots are dropped.
    /// Returns true if a value was held.
    pub fn unset_field(&mut self, name: &str) -> bool {
        let Some(slot) = self.slots.get_mut(name) else {
            return false;
        };
        let was_set = slot.state.is_set();
        if slot.declared {
            slot.state = PropertyState::Unset;
        } else {
            self.slots.shift_remove(name);
        }
        was_set
    }

    /// Number of slots (set or unset)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn put(&mut self, name: &str, state: PropertyState) {
        match self.slots.get_mut(name) {
            Some(slot) => slot.state = state,
            None => {
                self.slots.insert(
                    name.to_string(),
                    Slot {
                        visibility: Visibility::Public,
                        declared: false,
                        state,
                    },
                );
            }
        }
    }
}
