//! Search result type

use serde::{Deserialize, Serialize};

/// A block matched by a keyword search
///
/// Assembled per search and discarded after the response is rendered.
/// `content_match` is set when the query only matched the block's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub pipeline_uuid: String,
    pub pipeline_name: String,
    pub block_uuid: String,
    pub block_name: String,
    pub block_type: String,
    pub content_match: bool,
}
