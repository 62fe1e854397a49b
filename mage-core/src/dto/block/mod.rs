//! Block DTOs

use serde::{Deserialize, Serialize};

use crate::domain::block::Block;

/// Request to create a block inside a pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlock {
    #[serde(default)]
    pub block: NewBlock,
}

/// Attributes of a block to be created
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBlock {
    pub name: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub language: String,
    pub content: String,
    pub upstream_blocks: Vec<String>,
}

/// Request to update an existing block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlock {
    #[serde(default)]
    pub block: BlockPatch,
}

/// Fields to overwrite on a block; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `{"blocks": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockList {
    pub blocks: Vec<Block>,
}

/// `{"block": {...}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockEnvelope {
    pub block: Option<Block>,
}

/// `{"content": "..."}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockContent {
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_omits_unset_fields() {
        let req = UpdateBlock {
            block: BlockPatch {
                content: Some("print(1)".to_string()),
                name: None,
            },
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "block": { "content": "print(1)" } })
        );
    }

    #[test]
    fn test_missing_envelope_object() {
        let envelope: BlockEnvelope =
            serde_json::from_value(serde_json::json!({ "status": "ok" })).unwrap();
        assert!(envelope.block.is_none());

        let list: BlockList = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(list.blocks.is_empty());
    }
}
