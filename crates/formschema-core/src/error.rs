//! Error trees mirroring the shape of a validated value.
//!
//! A leaf error is a message. An object or array error is an [`ErrorTree`]:
//! child errors keyed by field name (objects) or element key (arrays), plus a
//! separate slot for a message about the object or array as a whole. Trees
//! sit behind [`Arc`] so unchanged subtrees can be carried from one
//! validation pass to the next without copying.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error for one node of a value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldError {
    Message(String),
    Nested(Arc<ErrorTree>),
}

/// Errors of an object or array node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorTree {
    /// Message about the whole object or array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_field_error: Option<String>,
    /// Child errors by field name or element key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, FieldError>,
}

impl FieldError {
    /// The message of a leaf error.
    pub fn message(&self) -> Option<&str> {
        match self {
            FieldError::Message(m) => Some(m.as_str()),
            FieldError::Nested(_) => None,
        }
    }

    /// The tree of an object or array error.
    pub fn tree(&self) -> Option<&ErrorTree> {
        match self {
            FieldError::Message(_) => None,
            FieldError::Nested(tree) => Some(tree.as_ref()),
        }
    }

    /// Identity comparison: trees match only when they share an allocation.
    pub fn same(&self, other: &FieldError) -> bool {
        match (self, other) {
            (FieldError::Message(a), FieldError::Message(b)) => a == b,
            (FieldError::Nested(a), FieldError::Nested(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::Message(message.to_owned())
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::Message(message)
    }
}

impl From<ErrorTree> for FieldError {
    fn from(tree: ErrorTree) -> Self {
        FieldError::Nested(Arc::new(tree))
    }
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// No whole-node message and no child errors.
    pub fn is_empty(&self) -> bool {
        self.non_field_error.is_none() && self.children.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.children.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, error: FieldError) {
        self.children.insert(key.into(), error);
    }

    pub fn with_non_field_error(mut self, message: impl Into<String>) -> Self {
        self.non_field_error = Some(message.into());
        self
    }

    pub fn with_child(mut self, key: impl Into<String>, error: impl Into<FieldError>) -> Self {
        self.insert(key, error.into());
        self
    }

    /// Wrap as a [`FieldError`], collapsing an empty tree to no error.
    pub fn into_error(self) -> Option<FieldError> {
        if self.is_empty() {
            None
        } else {
            Some(FieldError::from(self))
        }
    }

    /// Whether this tree holds at least one non-empty message anywhere.
    pub fn has_errors(&self) -> bool {
        if self.non_field_error.as_deref().is_some_and(|m| !m.is_empty()) {
            return true;
        }
        self.children.values().any(|child| analyze_errors(Some(child)))
    }
}

/// Does an error hold any actual message?
///
/// Absent errors, empty messages, and trees with nothing but empty branches
/// all count as no error.
pub fn analyze_errors(errors: Option<&FieldError>) -> bool {
    match errors {
        None => false,
        Some(FieldError::Message(m)) => !m.is_empty(),
        Some(FieldError::Nested(tree)) => tree.has_errors(),
    }
}

/// Read an error as a tree.
///
/// A bare message becomes a tree carrying it as the whole-node message, so
/// read sites can always look up children and the non-field slot.
pub fn get_error_object(error: Option<&FieldError>) -> Option<Arc<ErrorTree>> {
    match error? {
        FieldError::Message(m) => Some(Arc::new(ErrorTree::new().with_non_field_error(m.clone()))),
        FieldError::Nested(tree) => Some(Arc::clone(tree)),
    }
}

/// Read an error as a message: the bare message, or a tree's whole-node message.
pub fn get_error_string(error: Option<&FieldError>) -> Option<&str> {
    match error? {
        FieldError::Message(m) => Some(m.as_str()),
        FieldError::Nested(tree) => tree.non_field_error.as_deref(),
    }
}
