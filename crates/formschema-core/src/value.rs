//! Dynamic value trees with cheap structural sharing.
//!
//! Lists and objects live behind [`Arc`], so an edit that rebuilds one branch
//! leaves every untouched sibling pointing at the same allocation.
//! [`Value::same`] exposes that identity: differential re-validation uses it
//! to skip subtrees an edit never touched.
//!
//! "undefined" has no variant. An absent value is `Option<&Value>::None`, or
//! a key missing from an object. `null` is [`Value::Null`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Object payload: field name to value.
pub type Map = BTreeMap<String, Value>;

/// A JSON-shaped value whose composite nodes are shared, not copied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    List(Arc<Vec<Value>>),
    Object(Arc<Map>),
}

impl Value {
    /// Build an object from `(field, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build a list from its elements.
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    /// Identity comparison.
    ///
    /// Lists and objects are the same only when they share an allocation;
    /// two structurally equal objects built separately are different.
    /// Scalars compare by value, numbers numerically (`1` is `1.0`).
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// Short shape name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Field lookup. `None` for missing keys and for anything that is not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(&**map),
            _ => None,
        }
    }

    /// A copy of this object with `key` set to `value`.
    ///
    /// Every other field keeps its allocation, so it stays [`same`](Value::same)
    /// as before. A non-object receiver yields a single-field object.
    pub fn with(&self, key: impl Into<String>, value: Value) -> Value {
        let mut map = self.as_object().cloned().unwrap_or_default();
        map.insert(key.into(), value);
        Value::Object(Arc::new(map))
    }

    /// A copy of this object without `key`. Non-objects are returned as is.
    pub fn without(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => {
                let mut map = Map::clone(map);
                map.remove(key);
                Value::Object(Arc::new(map))
            }
            other => other.clone(),
        }
    }

    /// A copy of this list with `item` appended. A non-list receiver yields `[item]`.
    pub fn pushed(&self, item: Value) -> Value {
        let mut items = self.as_list().map(<[Value]>::to_vec).unwrap_or_default();
        items.push(item);
        Value::List(Arc::new(items))
    }

    /// A copy of this list with the element at `index` replaced.
    ///
    /// Out-of-range indices and non-lists return the receiver unchanged.
    pub fn replaced(&self, index: usize, item: Value) -> Value {
        match self {
            Value::List(items) if index < items.len() => {
                let mut items = Vec::clone(items);
                items[index] = item;
                Value::List(Arc::new(items))
            }
            other => other.clone(),
        }
    }

    /// A copy of this list with the element at `index` removed.
    pub fn removed(&self, index: usize) -> Value {
        match self {
            Value::List(items) if index < items.len() => {
                let mut items = Vec::clone(items);
                items.remove(index);
                Value::List(Arc::new(items))
            }
            other => other.clone(),
        }
    }

    /// Convert back into a plain [`serde_json::Value`].
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Identity over possibly absent values: absent matches only absent.
pub fn same(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same(b),
        _ => false,
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Value {
    /// Non-finite numbers have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }
}
