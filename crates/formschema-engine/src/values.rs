//! Value accumulation: turn a partially filled value into a submission payload.
//!
//! - Literals pass through when present, otherwise take their default, and
//!   otherwise become `null` (nullable) or are omitted.
//! - Forced literals ignore the input entirely.
//! - Objects drop fields that accumulate to nothing; an object left with no
//!   fields is itself `null` (nullable) or omitted.
//! - Arrays never disappear: an array with no surviving elements is `[]`.

use std::sync::Arc;

use formschema_core::{Map, Value};

use crate::options::AccumulateOptions;
use crate::schema::{ArraySchema, LiteralSchema, ObjectSchema, Schema};
use crate::walk;

/// Accumulate the cleaned value of `value` under `schema`.
///
/// `top_value` is handed to every hook as the top-level value; `None` means
/// `value` is the top. `None` in the result means "omit".
pub fn accumulate_values<C>(
    value: Option<&Value>,
    schema: &Schema<C>,
    top_value: Option<&Value>,
    context: &C,
    options: &AccumulateOptions,
) -> Option<Value> {
    let walker = ValueWalker {
        top: top_value.or(value),
        context,
        options,
    };
    walker.walk(value, schema)
}

struct ValueWalker<'a, C> {
    top: Option<&'a Value>,
    context: &'a C,
    options: &'a AccumulateOptions,
}

impl<C> ValueWalker<'_, C> {
    fn walk(&self, value: Option<&Value>, schema: &Schema<C>) -> Option<Value> {
        match schema {
            Schema::Literal(literal) => self.literal(value, literal),
            Schema::Array(array) => self.array(value, array),
            Schema::Object(object) => self.object(value, object),
        }
    }

    fn missing(&self) -> Option<Value> {
        self.options.nullable.then_some(Value::Null)
    }

    fn literal(&self, value: Option<&Value>, literal: &LiteralSchema<C>) -> Option<Value> {
        if let Some(forced) = &literal.force_value {
            return forced.resolve();
        }
        if literal.missing_message(value, self.top, self.context).is_none() {
            return value.cloned();
        }
        if let Some(default) = &literal.default_value {
            return default.resolve();
        }
        self.missing()
    }

    fn array(&self, value: Option<&Value>, array: &ArraySchema<C>) -> Option<Value> {
        let elements = match walk::elements(value) {
            Ok(elements) => elements,
            Err(err) => {
                walk::report("values", &err);
                return None;
            }
        };

        let items: Vec<Value> = elements
            .iter()
            .map(|element| {
                let member = array.member_of(element, self.top, self.context);
                self.walk(Some(element), &member).unwrap_or(Value::Null)
            })
            .collect();

        if items.iter().all(Value::is_null) {
            return Some(Value::list([]));
        }
        Some(Value::from(items))
    }

    fn object(&self, value: Option<&Value>, object: &ObjectSchema<C>) -> Option<Value> {
        if let Err(err) = walk::ensure_object(value) {
            walk::report("values", &err);
            return None;
        }

        let fields = object.fields_for(value, self.top, self.context);
        let mut map = Map::new();
        for (name, schema) in fields.iter() {
            if let Some(v) = self.walk(walk::child(value, name), schema) {
                map.insert(name.to_owned(), v);
            }
        }

        if map.is_empty() {
            return self.missing();
        }
        Some(Value::Object(Arc::new(map)))
    }
}
