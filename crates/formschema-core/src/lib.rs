//! Value trees, element keys, keyed list diffs, and error trees.

pub mod diff;
pub mod error;
pub mod key;
pub mod value;

pub use diff::{Change, ListDiff, diff_by_key};
pub use error::{ErrorTree, FieldError, analyze_errors, get_error_object, get_error_string};
pub use key::Key;
pub use value::{Map, Value};
