//! Conditional fields.
//!
//! An object schema's `fields` hook is usually built from a base field set
//! plus a few conditional blocks, each of which swaps some fields depending on
//! the values of others:
//!
//! ```
//! use formschema_engine::{FieldSet, LiteralSchema, ObjectSchema, Schema, Value, add_condition};
//!
//! let schema: Schema = ObjectSchema::new(|value, _, _| {
//!     let base = FieldSet::new()
//!         .field("hasPet", LiteralSchema::new())
//!         .field("petName", LiteralSchema::new());
//!     add_condition(&base, value, &["hasPet"], &["petName"], |picked| {
//!         let has_pet = picked
//!             .and_then(|p| p.get("hasPet").and_then(Value::as_bool))
//!             .unwrap_or(false);
//!         let pet_name = if has_pet { LiteralSchema::new().required() } else { LiteralSchema::new() };
//!         FieldSet::new().field("petName", pet_name)
//!     })
//! })
//! .into();
//! # let _ = schema;
//! ```

use formschema_core::{Map, Value};

use crate::schema::FieldSet;

/// Override `value_keys` of `base` with what `updater` returns for the
/// current values of `dependent_keys`, and record that each value key
/// depends on every dependent key.
///
/// `updater` receives `None` when `value` is absent or null, otherwise an
/// object holding the dependent keys present on `value`. A value key the
/// updater leaves out is removed from the result. `base` is not modified.
pub fn add_condition<C, F>(
    base: &FieldSet<C>,
    value: Option<&Value>,
    dependent_keys: &[&str],
    value_keys: &[&str],
    updater: F,
) -> FieldSet<C>
where
    F: FnOnce(Option<Value>) -> FieldSet<C>,
{
    let picked = pick(value, dependent_keys);
    let mut overrides = updater(picked);

    let mut fields = base.clone();
    for &key in value_keys {
        match overrides.remove(key) {
            Some(schema) => fields.insert(key, schema),
            None => {
                tracing::debug!(field = key, "condition left field ungoverned");
                fields.remove(key);
            }
        }
        fields.depend(key, dependent_keys.iter().copied());
    }
    fields
}

/// Object of the `keys` present on `value`; `None` for absent and null values.
fn pick(value: Option<&Value>, keys: &[&str]) -> Option<Value> {
    let value = value.filter(|v| !v.is_null())?;
    let picked: Map = keys
        .iter()
        .filter_map(|&key| value.get(key).map(|v| (key.to_owned(), v.clone())))
        .collect();
    Some(Value::Object(picked.into()))
}

impl<C> FieldSet<C> {
    /// Chaining form of [`add_condition`].
    pub fn add_condition<F>(
        self,
        value: Option<&Value>,
        dependent_keys: &[&str],
        value_keys: &[&str],
        updater: F,
    ) -> Self
    where
        F: FnOnce(Option<Value>) -> FieldSet<C>,
    {
        add_condition(&self, value, dependent_keys, value_keys, updater)
    }
}
