use serde::{Deserialize, Serialize};

/// Settings for [`accumulate_values`](crate::accumulate_values).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulateOptions {
    /// Missing values accumulate to `null` instead of being omitted, so a
    /// backend sees an explicit unset.
    pub nullable: bool,
}
