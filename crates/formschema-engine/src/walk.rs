//! Helpers shared by the three accumulators.

use formschema_core::Value;

use crate::error::SchemaError;
use crate::schema::Rule;

/// Child of an object value. Absent, null, and non-object parents have no children.
pub(crate) fn child<'v>(value: Option<&'v Value>, name: &str) -> Option<&'v Value> {
    value.and_then(|v| v.get(name))
}

const NO_ELEMENTS: &[Value] = &[];

/// Elements an array schema walks. Absent and null values walk as empty.
pub(crate) fn elements(value: Option<&Value>) -> Result<&[Value], SchemaError> {
    match value {
        None | Some(Value::Null) => Ok(NO_ELEMENTS),
        Some(Value::List(items)) => Ok(items.as_slice()),
        Some(other) => Err(SchemaError::ShapeMismatch {
            schema: "array",
            found: other.kind(),
        }),
    }
}

/// An object schema walks absent, null, and object values.
pub(crate) fn ensure_object(value: Option<&Value>) -> Result<(), SchemaError> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(other) => Err(SchemaError::ShapeMismatch {
            schema: "object",
            found: other.kind(),
        }),
    }
}

/// Log a schema that does not fit its value. The subtree is then skipped.
pub(crate) fn report(pass: &'static str, error: &SchemaError) {
    tracing::error!(pass, error = %error, "schema is invalid for value, skipping subtree");
}

/// Message of a whole-object or whole-array check, if any.
pub(crate) fn whole_message<C>(
    validation: Option<&Rule<C>>,
    value: Option<&Value>,
    top: Option<&Value>,
    context: &C,
) -> Option<String> {
    validation
        .and_then(|check| check(value, top, context))
        .filter(|m| !m.is_empty())
}
