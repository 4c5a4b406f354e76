//! Façade-aware state export and import
//!
//! Export writes the façade properties first, using the raw backing-field
//! values, and then every public slot that holds a value. Import goes the
//! other way round. Façade entries are assigned through the write path, so
//! setters get to normalise the stored representation just as they do for a
//! regular assignment. Every other entry goes through the object model.

use accessor_types::{ClassId, Object, Value};
use serde_json::{Map, Value as JsonValue};

use crate::error::SnapshotError;
use crate::model::ObjectModel;

/// Exported object state, keyed by property name
pub type State = Map<String, JsonValue>;

/// Export an instance's state
pub fn export(model: &ObjectModel, obj: &Object) -> Result<State, SnapshotError> {
    let facades = model.engine().list_facade_properties(obj.class_id())?;
    let mut state = State::new();

    for name in &facades {
        if let Some(value) = obj.field(name) {
            state.insert(name.clone(), serde_json::to_value(value)?);
        }
    }
    for (name, slot) in obj.slots() {
        if state.contains_key(name) || !slot.is_visible() {
            continue;
        }
        if let Some(value) = slot.state.value() {
            state.insert(name.to_string(), serde_json::to_value(value)?);
        }
    }

    tracing::debug!(
        class_id = obj.class_id(),
        facades = facades.len(),
        fields = state.len(),
        "exported object state"
    );
    Ok(state)
}

/// Rebuild an instance from exported state
///
/// A façade whose class resolved no setter (getter-only façade) is restored
/// by assigning its backing field directly, since no write path exists.
pub fn import(
    model: &ObjectModel,
    class_id: ClassId,
    state: &State,
) -> Result<Object, SnapshotError> {
    let mut obj = model.instantiate(class_id)?;
    let table = model.engine().accessors(class_id)?;
    let facades = table.facade_properties();

    for name in facades {
        let Some(raw) = state.get(name) else {
            continue;
        };
        let value: Value = serde_json::from_value(raw.clone())?;
        let has_setter = table
            .get(name)
            .is_some_and(|meta| meta.shape.setter().is_some());
        if has_setter {
            model.engine().resolve_write(&mut obj, name, value)?;
        } else {
            obj.set_field(name, value);
        }
    }
    for (name, raw) in state {
        if facades.contains(name) {
            continue;
        }
        let value: Value = serde_json::from_value(raw.clone())?;
        model.set(&mut obj, name, value)?;
    }

    Ok(obj)
}

/// Export an instance's state as a JSON string
pub fn to_json_string(model: &ObjectModel, obj: &Object) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&export(model, obj)?)?)
}

/// Rebuild an instance from a JSON string produced by [`to_json_string`]
pub fn from_json_str(
    model: &ObjectModel,
    class_id: ClassId,
    json: &str,
) -> Result<Object, SnapshotError> {
    match serde_json::from_str::<JsonValue>(json)? {
        JsonValue::Object(state) => import(model, class_id, &state),
        other => Err(SnapshotError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
