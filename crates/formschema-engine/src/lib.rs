//! Schema-driven validation and value accumulation for nested forms.
//!
//! - [`accumulate_values`] cleans a partially filled value into a payload.
//! - [`accumulate_errors`] validates a value from scratch.
//! - [`accumulate_differential_errors`] re-validates after an edit, reusing
//!   the previous errors of untouched subtrees.

pub mod condition;
pub mod differential;
pub mod error;
pub mod errors;
pub mod options;
pub mod rules;
pub mod schema;
pub mod values;
mod walk;

pub use condition::add_condition;
pub use differential::{Recheck, accumulate_differential_errors};
pub use error::{SchemaError, SchemaResult};
pub use errors::accumulate_errors;
pub use options::AccumulateOptions;
pub use schema::{
    ArraySchema, FieldSet, FieldsFn, KeySelector, LiteralSchema, MemberFn, ObjectSchema, Rule, Schema,
    Substitute, rule, value_rule,
};
pub use values::accumulate_values;

pub use formschema_core::{
    ErrorTree, FieldError, Key, Value, analyze_errors, get_error_object, get_error_string,
};
