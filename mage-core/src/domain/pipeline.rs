//! Pipeline domain types

use serde::{Deserialize, Serialize};

/// Pipeline definition as reported by the Mage API
///
/// The `uuid` is the pipeline's unique key on the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    #[serde(deserialize_with = "super::null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "super::null_as_default")]
    pub pipeline_type: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Pipeline {
    /// Description, or a placeholder when the pipeline has none
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "No description",
        }
    }
}
