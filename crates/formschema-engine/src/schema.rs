//! Schema model.
//!
//! A [`Schema`] mirrors the shape of the value it governs: a
//! [`LiteralSchema`] for leaves, an [`ArraySchema`] for keyed lists, and an
//! [`ObjectSchema`] for records. Array members and object fields are computed
//! from the current value, so a schema can vary per element or switch fields
//! on and off depending on sibling values.
//!
//! Every hook receives the node value, the top-level value of the pass, and a
//! caller-supplied context `C`.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use formschema_core::{Key, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::rules;
use crate::walk::child;

/// `(value, top_value, context) -> message`. `None` or an empty message means the rule passed.
pub type Rule<C> = Arc<dyn Fn(Option<&Value>, Option<&Value>, &C) -> Option<String> + Send + Sync>;

/// Extracts the stable identity of an array element.
pub type KeySelector = Arc<dyn Fn(&Value) -> Key + Send + Sync>;

/// `(element, top_value, context) -> schema` for one array element.
pub type MemberFn<C> = Arc<dyn Fn(&Value, Option<&Value>, &C) -> Schema<C> + Send + Sync>;

/// `(value, top_value, context) -> fields` for an object.
pub type FieldsFn<C> =
    Arc<dyn Fn(Option<&Value>, Option<&Value>, &C) -> FieldSet<C> + Send + Sync>;

/// Wrap a closure as a [`Rule`].
pub fn rule<C, F>(f: F) -> Rule<C>
where
    F: Fn(Option<&Value>, Option<&Value>, &C) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure that only looks at the node value as a [`Rule`].
pub fn value_rule<C, F>(f: F) -> Rule<C>
where
    F: Fn(Option<&Value>) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(move |value: Option<&Value>, _: Option<&Value>, _: &C| f(value))
}

/// What a literal accumulates to in place of its actual value.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitute {
    /// Omit the field.
    Undefined,
    /// Emit an explicit `null`.
    Null,
    Value(Value),
}

impl Substitute {
    pub fn resolve(&self) -> Option<Value> {
        match self {
            Substitute::Undefined => None,
            Substitute::Null => Some(Value::Null),
            Substitute::Value(v) => Some(v.clone()),
        }
    }
}

impl From<Value> for Substitute {
    fn from(value: Value) -> Self {
        Substitute::Value(value)
    }
}

pub enum Schema<C = ()> {
    Literal(LiteralSchema<C>),
    Array(ArraySchema<C>),
    Object(ObjectSchema<C>),
}

impl<C> Schema<C> {
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Literal(_) => "literal",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }
}

impl<C> Default for Schema<C> {
    fn default() -> Self {
        Schema::Literal(LiteralSchema::default())
    }
}

impl<C> Clone for Schema<C> {
    fn clone(&self) -> Self {
        match self {
            Schema::Literal(s) => Schema::Literal(s.clone()),
            Schema::Array(s) => Schema::Array(s.clone()),
            Schema::Object(s) => Schema::Object(s.clone()),
        }
    }
}

impl<C> fmt::Debug for Schema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Literal(s) => fmt::Debug::fmt(s, f),
            Schema::Array(s) => fmt::Debug::fmt(s, f),
            Schema::Object(s) => fmt::Debug::fmt(s, f),
        }
    }
}

impl<C> From<LiteralSchema<C>> for Schema<C> {
    fn from(s: LiteralSchema<C>) -> Self {
        Schema::Literal(s)
    }
}

impl<C> From<ArraySchema<C>> for Schema<C> {
    fn from(s: ArraySchema<C>) -> Self {
        Schema::Array(s)
    }
}

impl<C> From<ObjectSchema<C>> for Schema<C> {
    fn from(s: ObjectSchema<C>) -> Self {
        Schema::Object(s)
    }
}

// ── Literal ──

/// Rules for a leaf value (or a list/object treated opaquely).
pub struct LiteralSchema<C = ()> {
    /// Report a missing value as an error.
    pub required: bool,
    /// Custom missing-value check. Defaults to [`rules::required_condition`].
    /// Also decides when `default_value` applies, whether or not `required` is set.
    pub required_validation: Option<Rule<C>>,
    /// Always accumulate to this, ignoring the actual value.
    pub force_value: Option<Substitute>,
    /// Accumulate to this when the value is missing.
    pub default_value: Option<Substitute>,
    /// Checks run in order; the last one that reports a message wins.
    pub validations: Vec<Rule<C>>,
}

impl<C> LiteralSchema<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark required, with a custom missing-value check.
    pub fn required_by(mut self, check: Rule<C>) -> Self {
        self.required = true;
        self.required_validation = Some(check);
        self
    }

    pub fn force(mut self, value: impl Into<Substitute>) -> Self {
        self.force_value = Some(value.into());
        self
    }

    pub fn default_to(mut self, value: impl Into<Substitute>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn rule(mut self, rule: Rule<C>) -> Self {
        self.validations.push(rule);
        self
    }

    /// Append a rule that only looks at the node value.
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(Option<&Value>) -> Option<String> + Send + Sync + 'static,
    {
        self.rule(value_rule(f))
    }

    /// Message from the missing-value check, if it fires.
    pub(crate) fn missing_message(
        &self,
        value: Option<&Value>,
        top: Option<&Value>,
        context: &C,
    ) -> Option<String> {
        let message = match &self.required_validation {
            Some(check) => check(value, top, context),
            None => rules::required_condition(value),
        };
        message.filter(|m| !m.is_empty())
    }

    /// Run every validation; the last non-empty message wins.
    pub(crate) fn rule_message(
        &self,
        value: Option<&Value>,
        top: Option<&Value>,
        context: &C,
    ) -> Option<String> {
        let mut error = None;
        for validation in &self.validations {
            if let Some(message) = validation(value, top, context)
                && !message.is_empty()
            {
                error = Some(message);
            }
        }
        error
    }
}

impl<C> Default for LiteralSchema<C> {
    fn default() -> Self {
        Self {
            required: false,
            required_validation: None,
            force_value: None,
            default_value: None,
            validations: Vec::new(),
        }
    }
}

impl<C> Clone for LiteralSchema<C> {
    fn clone(&self) -> Self {
        Self {
            required: self.required,
            required_validation: self.required_validation.clone(),
            force_value: self.force_value.clone(),
            default_value: self.default_value.clone(),
            validations: self.validations.clone(),
        }
    }
}

impl<C> fmt::Debug for LiteralSchema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiteralSchema")
            .field("required", &self.required)
            .field("required_validation", &self.required_validation.is_some())
            .field("force_value", &self.force_value)
            .field("default_value", &self.default_value)
            .field("validations", &self.validations.len())
            .finish()
    }
}

// ── Array ──

/// Rules for a keyed list.
pub struct ArraySchema<C = ()> {
    /// Check on the whole list; its message lands in the non-field slot.
    pub validation: Option<Rule<C>>,
    /// Must be unique across the current elements.
    pub key_selector: KeySelector,
    pub member: MemberFn<C>,
}

impl<C> ArraySchema<C> {
    pub fn new<K, M>(key_selector: K, member: M) -> Self
    where
        K: Fn(&Value) -> Key + Send + Sync + 'static,
        M: Fn(&Value, Option<&Value>, &C) -> Schema<C> + Send + Sync + 'static,
    {
        Self {
            validation: None,
            key_selector: Arc::new(key_selector),
            member: Arc::new(member),
        }
    }

    pub fn validate(mut self, rule: Rule<C>) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn key_of(&self, element: &Value) -> Key {
        (self.key_selector)(element)
    }

    pub fn member_of(&self, element: &Value, top: Option<&Value>, context: &C) -> Schema<C> {
        (self.member)(element, top, context)
    }

    /// Strict check that the key selector is injective over `elements`.
    ///
    /// The accumulators do not require this to run; with duplicate keys the
    /// later element's error overwrites the earlier one.
    pub fn ensure_unique_keys(&self, elements: &[Value]) -> SchemaResult<()> {
        let mut seen = HashSet::with_capacity(elements.len());
        for element in elements {
            let key = self.key_of(element);
            if !seen.insert(key.clone()) {
                return Err(SchemaError::DuplicateKey {
                    key: key.into_string(),
                });
            }
        }
        Ok(())
    }
}

impl<C> Clone for ArraySchema<C> {
    fn clone(&self) -> Self {
        Self {
            validation: self.validation.clone(),
            key_selector: Arc::clone(&self.key_selector),
            member: Arc::clone(&self.member),
        }
    }
}

impl<C> fmt::Debug for ArraySchema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySchema")
            .field("validation", &self.validation.is_some())
            .finish_non_exhaustive()
    }
}

// ── Object ──

/// Rules for a record whose fields may depend on its current value.
pub struct ObjectSchema<C = ()> {
    /// Check on the whole object; its message lands in the non-field slot.
    pub validation: Option<Rule<C>>,
    pub fields: FieldsFn<C>,
}

impl<C> ObjectSchema<C> {
    pub fn new<F>(fields: F) -> Self
    where
        F: Fn(Option<&Value>, Option<&Value>, &C) -> FieldSet<C> + Send + Sync + 'static,
    {
        Self {
            validation: None,
            fields: Arc::new(fields),
        }
    }

    /// An object whose field set does not depend on its value.
    pub fn fixed(fields: FieldSet<C>) -> Self
    where
        C: 'static,
    {
        Self::new(move |_, _, _| fields.clone())
    }

    pub fn validate(mut self, rule: Rule<C>) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn fields_for(&self, value: Option<&Value>, top: Option<&Value>, context: &C) -> FieldSet<C> {
        (self.fields)(value, top, context)
    }
}

impl<C> Clone for ObjectSchema<C> {
    fn clone(&self) -> Self {
        Self {
            validation: self.validation.clone(),
            fields: Arc::clone(&self.fields),
        }
    }
}

impl<C> fmt::Debug for ObjectSchema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("validation", &self.validation.is_some())
            .finish_non_exhaustive()
    }
}

// ── Field sets ──

/// The fields of an object schema, plus which sibling fields each one depends on.
///
/// Dependencies only matter to differential re-validation: when a listed
/// sibling changes, the dependent field is re-checked even if its own value
/// did not change. A field present in the dependency map is *conditional*,
/// even when its set is empty.
pub struct FieldSet<C = ()> {
    schemas: Vec<(String, Schema<C>)>,
    dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl<C> FieldSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field.
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema<C>>) -> Self {
        self.insert(name, schema);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: impl Into<Schema<C>>) {
        let name = name.into();
        let schema = schema.into();
        match self.schemas.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = schema,
            None => self.schemas.push((name, schema)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Schema<C>> {
        let index = self.schemas.iter().position(|(n, _)| n == name)?;
        Some(self.schemas.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&Schema<C>> {
        self.schemas.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema<C>)> {
        self.schemas.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Record that `field` depends on each of `on`, merging with earlier declarations.
    pub fn depend<I, S>(&mut self, field: impl Into<String>, on: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .entry(field.into())
            .or_default()
            .extend(on.into_iter().map(Into::into));
    }

    pub fn dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependencies
    }

    pub fn dependencies_of(&self, field: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(field)
    }

    pub fn is_conditional(&self, field: &str) -> bool {
        self.dependencies.contains_key(field)
    }

    /// Whether any declared dependency of `field` differs between `old` and `new`.
    pub fn dependencies_changed(&self, field: &str, old: Option<&Value>, new: Option<&Value>) -> bool {
        self.dependencies_of(field).is_some_and(|deps| {
            deps.iter()
                .any(|dep| !formschema_core::value::same(child(old, dep), child(new, dep)))
        })
    }
}

impl<C> Default for FieldSet<C> {
    fn default() -> Self {
        Self {
            schemas: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }
}

impl<C> Clone for FieldSet<C> {
    fn clone(&self) -> Self {
        Self {
            schemas: self.schemas.clone(),
            dependencies: self.dependencies.clone(),
        }
    }
}

impl<C> fmt::Debug for FieldSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSet")
            .field("fields", &self.names().collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}
