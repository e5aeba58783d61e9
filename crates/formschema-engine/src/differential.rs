//! Differential error accumulation.
//!
//! Re-validates only what an edit could have affected. A subtree whose value
//! is reference-identical to before, and none of whose declared dependencies
//! changed, keeps its previous error without being visited.

use formschema_core::value::same;
use formschema_core::{ErrorTree, FieldError, Value, diff_by_key};
use serde::{Deserialize, Serialize};

use crate::schema::{ArraySchema, LiteralSchema, ObjectSchema, Schema};
use crate::walk;

/// How much of a subtree to re-check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recheck {
    /// Only where the value changed.
    #[default]
    Edited,
    /// A declared dependency changed. Literals with an unchanged value re-run
    /// their rules but not the required check. Objects pass this on to their
    /// conditional fields only and arrays to every element.
    Dependency,
    /// Validate from scratch, required checks included.
    Full,
}

/// Recompute the errors of `new` given the errors `old_error` of `old`.
///
/// With [`Recheck::Full`] the result equals
/// [`accumulate_errors`](crate::accumulate_errors) on `new`. `top_value`
/// defaults to `new`.
pub fn accumulate_differential_errors<C>(
    old: Option<&Value>,
    new: Option<&Value>,
    old_error: Option<&FieldError>,
    schema: &Schema<C>,
    top_value: Option<&Value>,
    context: &C,
    recheck: Recheck,
) -> Option<FieldError> {
    let walker = DiffWalker {
        top: top_value.or(new),
        context,
    };
    walker.walk(old, new, old_error, schema, recheck)
}

struct DiffWalker<'a, C> {
    top: Option<&'a Value>,
    context: &'a C,
}

/// Child errors of a previous tree, if it was one.
fn old_child<'e>(old_error: Option<&'e FieldError>, key: &str) -> Option<&'e FieldError> {
    old_error.and_then(FieldError::tree).and_then(|tree| tree.get(key))
}

impl<C> DiffWalker<'_, C> {
    fn walk(
        &self,
        old: Option<&Value>,
        new: Option<&Value>,
        old_error: Option<&FieldError>,
        schema: &Schema<C>,
        recheck: Recheck,
    ) -> Option<FieldError> {
        if recheck == Recheck::Edited && same(old, new) {
            tracing::trace!(kind = schema.kind(), "value unchanged, reusing previous error");
            return old_error.cloned();
        }
        match schema {
            Schema::Literal(literal) => self.literal(old, new, literal, recheck),
            Schema::Array(array) => self.array(old, new, old_error, array, recheck),
            Schema::Object(object) => self.object(old, new, old_error, object, recheck),
        }
    }

    fn literal(
        &self,
        old: Option<&Value>,
        new: Option<&Value>,
        literal: &LiteralSchema<C>,
        recheck: Recheck,
    ) -> Option<FieldError> {
        // A field that only became required through a dependency is not
        // flagged until its own value is edited.
        let untouched = recheck == Recheck::Dependency && same(old, new);
        if !untouched
            && literal.required
            && let Some(missing) = literal.missing_message(new, self.top, self.context)
        {
            return Some(FieldError::Message(missing));
        }
        literal
            .rule_message(new, self.top, self.context)
            .map(FieldError::Message)
    }

    fn array(
        &self,
        old: Option<&Value>,
        new: Option<&Value>,
        old_error: Option<&FieldError>,
        array: &ArraySchema<C>,
        recheck: Recheck,
    ) -> Option<FieldError> {
        let new_elements = match walk::elements(new) {
            Ok(elements) => elements,
            Err(err) => {
                walk::report("differential", &err);
                return None;
            }
        };
        // A previous value of another shape has nothing to reuse.
        let old_elements = walk::elements(old).unwrap_or_default();

        let mut tree = ErrorTree::new();
        tree.non_field_error =
            walk::whole_message(array.validation.as_ref(), new, self.top, self.context);

        let diff = diff_by_key(old_elements, new_elements, |e| array.key_of(e), Value::same);

        for &(ref key, element) in &diff.unmodified {
            let previous = old_child(old_error, key.as_str());
            let error = match recheck {
                Recheck::Edited => previous.cloned(),
                Recheck::Dependency | Recheck::Full => {
                    tracing::trace!(%key, ?recheck, "rechecking unchanged element");
                    let member = array.member_of(element, self.top, self.context);
                    self.walk(Some(element), Some(element), previous, &member, recheck)
                }
            };
            if let Some(error) = error {
                tree.insert(key.as_str(), error);
            }
        }

        for change in &diff.modified {
            tracing::trace!(key = %change.key, added = change.old.is_none(), "rechecking changed element");
            let previous = change
                .old
                .and_then(|_| old_child(old_error, change.key.as_str()));
            let member = array.member_of(change.new, self.top, self.context);
            if let Some(error) = self.walk(change.old, Some(change.new), previous, &member, recheck) {
                tree.insert(change.key.as_str(), error);
            }
        }

        tree.into_error()
    }

    fn object(
        &self,
        old: Option<&Value>,
        new: Option<&Value>,
        old_error: Option<&FieldError>,
        object: &ObjectSchema<C>,
        recheck: Recheck,
    ) -> Option<FieldError> {
        if let Err(err) = walk::ensure_object(new) {
            walk::report("differential", &err);
            return None;
        }
        // Children of an old value of another shape read as absent.
        let old = old.filter(|&o| walk::ensure_object(Some(o)).is_ok());

        let mut tree = ErrorTree::new();
        tree.non_field_error =
            walk::whole_message(object.validation.as_ref(), new, self.top, self.context);

        let fields = object.fields_for(new, self.top, self.context);
        for (name, schema) in fields.iter() {
            let field_recheck = if recheck == Recheck::Full {
                Recheck::Full
            } else if fields.dependencies_changed(name, old, new)
                || (recheck == Recheck::Dependency && fields.is_conditional(name))
            {
                Recheck::Dependency
            } else {
                Recheck::Edited
            };

            let error = self.walk(
                walk::child(old, name),
                walk::child(new, name),
                old_child(old_error, name),
                schema,
                field_recheck,
            );
            if let Some(error) = error {
                tree.insert(name, error);
            }
        }

        tree.into_error()
    }
}
