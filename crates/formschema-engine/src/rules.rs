//! Stock leaf checks.
//!
//! Each check takes the node value and returns a message when it fails.
//! Absent and null values pass every check except the `required_*` ones, so
//! optional fields are only judged once they hold something.
//! Wrap with [`value_rule`](crate::schema::value_rule) or
//! [`LiteralSchema::check`](crate::schema::LiteralSchema::check) to attach them.

use formschema_core::Value;

pub const REQUIRED_MESSAGE: &str = "The field is required";

/// Present and not null.
pub fn is_defined(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

/// Absent, null, or a string of only whitespace.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Length of a string (in characters) or a list.
fn length_of(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

/// The default missing-value check: absent or null.
pub fn required_condition(value: Option<&Value>) -> Option<String> {
    (!is_defined(value)).then(|| REQUIRED_MESSAGE.to_owned())
}

/// Absent, null, or blank text.
pub fn required_string_condition(value: Option<&Value>) -> Option<String> {
    is_blank(value).then(|| REQUIRED_MESSAGE.to_owned())
}

/// Absent, null, or an empty list.
pub fn required_list_condition(value: Option<&Value>) -> Option<String> {
    let empty = match value {
        None | Some(Value::Null) => true,
        Some(Value::List(items)) => items.is_empty(),
        Some(_) => false,
    };
    empty.then(|| REQUIRED_MESSAGE.to_owned())
}

pub fn integer_condition(value: Option<&Value>) -> Option<String> {
    let n = value.and_then(Value::as_f64)?;
    (n.fract() != 0.0).then(|| "The field must be an integer".to_owned())
}

pub fn greater_than(x: f64) -> impl Fn(Option<&Value>) -> Option<String> + Clone + Send + Sync + 'static {
    move |value: Option<&Value>| {
        let n = value.and_then(Value::as_f64)?;
        (n <= x).then(|| format!("Field must be greater than {x}"))
    }
}

pub fn smaller_than(x: f64) -> impl Fn(Option<&Value>) -> Option<String> + Clone + Send + Sync + 'static {
    move |value: Option<&Value>| {
        let n = value.and_then(Value::as_f64)?;
        (n >= x).then(|| format!("The field must be smaller than {x}"))
    }
}

pub fn greater_than_or_equal_to(
    x: f64,
) -> impl Fn(Option<&Value>) -> Option<String> + Clone + Send + Sync + 'static {
    move |value: Option<&Value>| {
        let n = value.and_then(Value::as_f64)?;
        (n < x).then(|| format!("The field must be greater than or equal to {x}"))
    }
}

pub fn less_than_or_equal_to(
    x: f64,
) -> impl Fn(Option<&Value>) -> Option<String> + Clone + Send + Sync + 'static {
    move |value: Option<&Value>| {
        let n = value.and_then(Value::as_f64)?;
        (n > x).then(|| format!("The field must be smaller than or equal to {x}"))
    }
}

pub fn length_greater_than(
    x: usize,
) -> impl Fn(Option<&Value>) -> Option<String> + Clone + Send + Sync + 'static {
    move |value: Option<&Value>| {
        let len = length_of(value)?;
        (len <= x).then(|| format!("Length must be greater than {x}"))
    }
}

pub fn length_smaller_than(
    x: usize,
) -> impl Fn(Option<&Value>) -> Option<String> + Clone + Send + Sync + 'static {
    move |value: Option<&Value>| {
        let len = length_of(value)?;
        (len >= x).then(|| format!("Length must be smaller than {x}"))
    }
}
