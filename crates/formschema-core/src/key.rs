//! Stable identities for array elements.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The key a key selector extracts from an array element.
///
/// Numbers render in decimal, so `Key::from(1)` and `Key::from("1")` name the
/// same element, the way object keys behave in JSON.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s)
    }
}

macro_rules! key_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(n: $t) -> Self {
                    Key(n.to_string())
                }
            }
        )*
    };
}

key_from_integer!(i32, i64, u32, u64, usize);
