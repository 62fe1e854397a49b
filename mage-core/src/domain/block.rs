//! Block domain types

use serde::{Deserialize, Serialize};

/// One step of a pipeline
///
/// A block's `uuid` is only unique within its owning pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    #[serde(deserialize_with = "super::null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "super::null_as_default")]
    pub block_type: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub upstream_blocks: Vec<String>,
}

/// Source language of a block, as far as the adapter cares
///
/// Only the languages that get a dedicated banner in rendered pipeline code
/// are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLanguage {
    Python,
    Sql,
    R,
    Other,
}

impl BlockLanguage {
    pub fn parse(language: &str) -> Self {
        match language {
            "python" => BlockLanguage::Python,
            "sql" => BlockLanguage::Sql,
            "r" => BlockLanguage::R,
            _ => BlockLanguage::Other,
        }
    }
}

impl Block {
    /// Declared language, `python` when the service left it out
    pub fn language_name(&self) -> &str {
        if self.language.is_empty() {
            "python"
        } else {
            &self.language
        }
    }

    pub fn language(&self) -> BlockLanguage {
        BlockLanguage::parse(self.language_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_block() {
        let block: Block = serde_json::from_value(serde_json::json!({
            "uuid": "transformer",
            "name": "Transform Data",
            "type": "transformer",
            "language": "python",
            "status": "not_executed",
            "upstream_blocks": ["data_loader"]
        }))
        .unwrap();

        assert_eq!(block.block_type, "transformer");
        assert_eq!(block.upstream_blocks, vec!["data_loader".to_string()]);
        assert!(block.content.is_none());
        assert_eq!(block.language(), BlockLanguage::Python);
    }

    #[test]
    fn test_language_is_case_sensitive() {
        assert_eq!(BlockLanguage::parse("sql"), BlockLanguage::Sql);
        assert_eq!(BlockLanguage::parse("r"), BlockLanguage::R);
        assert_eq!(BlockLanguage::parse("SQL"), BlockLanguage::Other);
        assert_eq!(BlockLanguage::parse("yaml"), BlockLanguage::Other);
    }

    #[test]
    fn test_decode_null_fields() {
        let block: Block = serde_json::from_value(serde_json::json!({
            "uuid": "loader",
            "name": null,
            "type": null,
            "language": null,
            "status": null,
            "upstream_blocks": null
        }))
        .unwrap();

        assert_eq!(block.uuid, "loader");
        assert!(block.name.is_empty());
        assert!(block.status.is_empty());
        assert!(block.upstream_blocks.is_empty());
        assert_eq!(block.language_name(), "python");
    }

    #[test]
    fn test_missing_language_is_python() {
        let block = Block::default();
        assert_eq!(block.language_name(), "python");
        assert_eq!(block.language(), BlockLanguage::Python);
    }

    #[test]
    fn test_content_omitted_when_absent() {
        let json = serde_json::to_value(Block::default()).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["type"], "");
    }
}
