//! Endpoint paths, relative to the API base URL

use mage_core::domain::run::RunId;

pub fn pipelines() -> String {
    "pipelines".to_string()
}

pub fn pipeline(pipeline_uuid: &str) -> String {
    format!("pipelines/{}", pipeline_uuid)
}

pub fn blocks(pipeline_uuid: &str) -> String {
    format!("pipelines/{}/blocks", pipeline_uuid)
}

pub fn block(pipeline_uuid: &str, block_uuid: &str) -> String {
    format!("pipelines/{}/blocks/{}", pipeline_uuid, block_uuid)
}

pub fn block_content(pipeline_uuid: &str, block_uuid: &str) -> String {
    format!("pipelines/{}/blocks/{}/content", pipeline_uuid, block_uuid)
}

pub fn pipeline_runs() -> String {
    "pipeline_runs".to_string()
}

/// Pipeline runs filtered by pipeline
pub fn pipeline_runs_for(pipeline_uuid: &str) -> String {
    format!("pipeline_runs?pipeline_uuid={}", pipeline_uuid)
}

pub fn block_runs() -> String {
    "block_runs".to_string()
}

/// Block runs belonging to one pipeline run
pub fn block_runs_for(pipeline_run_id: &RunId) -> String {
    format!("block_runs?pipeline_run_id={}", pipeline_run_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_paths() {
        assert_eq!(block("p", "b"), "pipelines/p/blocks/b");
        assert_eq!(block_content("p", "b"), "pipelines/p/blocks/b/content");
    }

    #[test]
    fn test_run_filters() {
        assert_eq!(pipeline_runs_for("p"), "pipeline_runs?pipeline_uuid=p");
        assert_eq!(
            block_runs_for(&RunId::Number(12345)),
            "block_runs?pipeline_run_id=12345"
        );
    }
}
