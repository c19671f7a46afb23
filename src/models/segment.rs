use serde::{Deserialize, Serialize};

/// A business-defined user cohort. Reference data, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub count: u64,
    /// Signed percentage change over the last seven days.
    pub change_7d: f64,
    pub description: String,
}
