//! Error accumulation: validate a whole value from scratch.

use std::collections::HashSet;

use formschema_core::{ErrorTree, FieldError, Key, Value};

use crate::schema::{ArraySchema, LiteralSchema, ObjectSchema, Schema};
use crate::walk;

/// Validate `value` against `schema`, returning an error tree shaped like the value.
///
/// `None` means the value is valid. `top_value` defaults to `value`.
pub fn accumulate_errors<C>(
    value: Option<&Value>,
    schema: &Schema<C>,
    top_value: Option<&Value>,
    context: &C,
) -> Option<FieldError> {
    let walker = ErrorWalker {
        top: top_value.or(value),
        context,
    };
    walker.walk(value, schema)
}

struct ErrorWalker<'a, C> {
    top: Option<&'a Value>,
    context: &'a C,
}

impl<C> ErrorWalker<'_, C> {
    fn walk(&self, value: Option<&Value>, schema: &Schema<C>) -> Option<FieldError> {
        match schema {
            Schema::Literal(literal) => self.literal(value, literal),
            Schema::Array(array) => self.array(value, array),
            Schema::Object(object) => self.object(value, object),
        }
    }

    fn literal(&self, value: Option<&Value>, literal: &LiteralSchema<C>) -> Option<FieldError> {
        if literal.required
            && let Some(missing) = literal.missing_message(value, self.top, self.context)
        {
            return Some(FieldError::Message(missing));
        }
        literal
            .rule_message(value, self.top, self.context)
            .map(FieldError::Message)
    }

    fn array(&self, value: Option<&Value>, array: &ArraySchema<C>) -> Option<FieldError> {
        let elements = match walk::elements(value) {
            Ok(elements) => elements,
            Err(err) => {
                walk::report("errors", &err);
                return None;
            }
        };

        let mut tree = ErrorTree::new();
        tree.non_field_error =
            walk::whole_message(array.validation.as_ref(), value, self.top, self.context);

        let mut seen: HashSet<Key> = HashSet::with_capacity(elements.len());
        for element in elements {
            let key = array.key_of(element);
            if !seen.insert(key.clone()) {
                tracing::warn!(%key, "duplicate array key, a later error overwrites an earlier one");
            }
            let member = array.member_of(element, self.top, self.context);
            // A valid element never clears the error of an earlier one with the same key.
            if let Some(error) = self.walk(Some(element), &member) {
                tree.insert(key.into_string(), error);
            }
        }

        tree.into_error()
    }

    fn object(&self, value: Option<&Value>, object: &ObjectSchema<C>) -> Option<FieldError> {
        if let Err(err) = walk::ensure_object(value) {
            walk::report("errors", &err);
            return None;
        }

        let mut tree = ErrorTree::new();
        tree.non_field_error =
            walk::whole_message(object.validation.as_ref(), value, self.top, self.context);

        let fields = object.fields_for(value, self.top, self.context);
        for (name, schema) in fields.iter() {
            if let Some(error) = self.walk(walk::child(value, name), schema) {
                tree.insert(name, error);
            }
        }

        tree.into_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{greater_than_or_equal_to, length_greater_than, required_string_condition};
    use crate::schema::{FieldSet, rule, value_rule};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn by_id(element: &Value) -> Key {
        Key::from(element.get("id").and_then(Value::as_str).unwrap_or_default())
    }

    fn person() -> Schema {
        ObjectSchema::fixed(
            FieldSet::new()
                .field(
                    "name",
                    LiteralSchema::new().required_by(value_rule(required_string_condition)),
                )
                .field("age", LiteralSchema::new().check(greater_than_or_equal_to(0.0))),
        )
        .into()
    }

    #[test]
    fn valid_value_has_no_errors() {
        let value = v(json!({ "name": "Hari", "age": 3 }));
        assert_eq!(accumulate_errors(Some(&value), &person(), None, &()), None);
    }

    #[test]
    fn missing_and_invalid_fields() {
        let value = v(json!({ "name": " ", "age": -1 }));
        let error = accumulate_errors(Some(&value), &person(), None, &()).unwrap();
        let tree = error.tree().unwrap();
        assert_eq!(tree.get("name").and_then(FieldError::message), Some("The field is required"));
        assert_eq!(
            tree.get("age").and_then(FieldError::message),
            Some("The field must be greater than or equal to 0")
        );
        assert_eq!(tree.non_field_error, None);
    }

    #[test]
    fn required_check_precedes_rules() {
        let literal: Schema = LiteralSchema::new()
            .required()
            .check(|_| Some("never reached".into()))
            .into();
        assert_eq!(
            accumulate_errors(None, &literal, None, &()),
            Some(FieldError::from("The field is required"))
        );

        let optional: Schema = LiteralSchema::new().check(length_greater_than(3)).into();
        assert_eq!(accumulate_errors(None, &optional, None, &()), None);
    }

    #[test]
    fn array_errors_are_keyed_by_element() {
        let people: Schema = ArraySchema::new(by_id, |_, _, _| {
            ObjectSchema::fixed(FieldSet::new().field("name", LiteralSchema::new().required())).into()
        })
        .validate(value_rule(|value| {
            let len = value.and_then(Value::as_list).map_or(0, <[Value]>::len);
            (len > 2).then(|| "Too many people".to_owned())
        }))
        .into();

        let value = v(json!([
            { "id": "a", "name": "Ann" },
            { "id": "b" },
            { "id": "c", "name": "Cy" },
        ]));
        let error = accumulate_errors(Some(&value), &people, None, &()).unwrap();
        let tree = error.tree().unwrap();
        assert_eq!(tree.non_field_error.as_deref(), Some("Too many people"));
        assert_eq!(tree.children.len(), 1);
        let b = tree.get("b").and_then(FieldError::tree).unwrap();
        assert_eq!(b.get("name").and_then(FieldError::message), Some("The field is required"));
    }

    #[test]
    fn whole_object_rules_see_top_value() {
        let schema: Schema = ObjectSchema::fixed(FieldSet::new().field(
            "inner",
            ObjectSchema::fixed(FieldSet::new()).validate(rule(|_, top: Option<&Value>, _: &()| {
                top.and_then(|t| t.get("locked"))
                    .and_then(Value::as_bool)
                    .filter(|locked| *locked)
                    .map(|_| "Locked".to_owned())
            })),
        ))
        .into();

        let locked = v(json!({ "locked": true, "inner": {} }));
        let error = accumulate_errors(Some(&locked), &schema, None, &()).unwrap();
        let inner = error.tree().and_then(|t| t.get("inner")).and_then(FieldError::tree).unwrap();
        assert_eq!(inner.non_field_error.as_deref(), Some("Locked"));

        let open = v(json!({ "locked": false, "inner": {} }));
        assert_eq!(accumulate_errors(Some(&open), &schema, None, &()), None);
    }

    #[test]
    fn duplicate_keys_overwrite_only_with_errors() {
        let people: Schema = ArraySchema::new(by_id, |_, _, _| {
            ObjectSchema::fixed(
                FieldSet::new()
                    .field("name", LiteralSchema::new().required())
                    .field("age", LiteralSchema::new().check(greater_than_or_equal_to(0.0))),
            )
            .into()
        })
        .into();

        let clean_last = v(json!([{ "id": "a" }, { "id": "a", "name": "Ann" }]));
        let error = accumulate_errors(Some(&clean_last), &people, None, &()).unwrap();
        let a = error.tree().and_then(|t| t.get("a")).and_then(FieldError::tree).unwrap();
        assert_eq!(a.get("name").and_then(FieldError::message), Some("The field is required"));

        let failing_last = v(json!([{ "id": "a" }, { "id": "a", "name": "Ann", "age": -1 }]));
        let error = accumulate_errors(Some(&failing_last), &people, None, &()).unwrap();
        let a = error.tree().and_then(|t| t.get("a")).and_then(FieldError::tree).unwrap();
        assert_eq!(a.get("name"), None);
        assert_eq!(
            a.get("age").and_then(FieldError::message),
            Some("The field must be greater than or equal to 0")
        );
    }

    #[test]
    fn mismatched_shape_yields_no_error() {
        assert_eq!(accumulate_errors(Some(&v(json!(12))), &person(), None, &()), None);
    }
}
