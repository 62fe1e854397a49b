//! Execution record types
//!
//! Runs are created by trigger operations and their lifecycle is owned by the
//! remote service; the adapter only reports them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Run identifier
///
/// Mage reports numeric ids, but textual ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunId {
    Number(i64),
    Text(String),
}

impl Default for RunId {
    fn default() -> Self {
        RunId::Text(String::new())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunId::Number(n) => write!(f, "{}", n),
            RunId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RunId {
    fn from(id: i64) -> Self {
        RunId::Number(id)
    }
}

/// Execution record for a whole pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRun {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: RunId,
    #[serde(deserialize_with = "super::null_as_default")]
    pub pipeline_uuid: String,
    pub status: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Execution record for a single block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRun {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: RunId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_run_id: Option<RunId>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub pipeline_uuid: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub block_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}
