//! In-memory Mage store
//!
//! Holds the pipelines, blocks and runs served by the mock API. Seeded with
//! two sample pipelines so the adapter can be exercised without a real Mage
//! instance.

use std::collections::HashMap;
use std::sync::Arc;

use mage_core::domain::block::Block;
use mage_core::domain::pipeline::Pipeline;
use mage_core::domain::run::{BlockRun, PipelineRun, RunId};
use mage_core::dto::block::{BlockPatch, NewBlock};
use mage_core::dto::pipeline::NewPipeline;
use tokio::sync::RwLock;

/// Store shared between request handlers
pub type SharedStore = Arc<RwLock<MockStore>>;

const FIRST_PIPELINE_RUN_ID: i64 = 12345;
const FIRST_BLOCK_RUN_ID: i64 = 67890;

/// Store error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    PipelineNotFound,
    BlockNotFound,
    BlockContentNotFound,
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct MockStore {
    pipelines: Vec<Pipeline>,
    blocks: HashMap<String, Vec<Block>>,
    pipeline_runs: Vec<PipelineRun>,
    block_runs: Vec<BlockRun>,
    next_pipeline_run_id: i64,
    next_block_run_id: i64,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            pipelines: Vec::new(),
            blocks: HashMap::new(),
            pipeline_runs: Vec::new(),
            block_runs: Vec::new(),
            next_pipeline_run_id: FIRST_PIPELINE_RUN_ID,
            next_block_run_id: FIRST_BLOCK_RUN_ID,
        }
    }
}

impl MockStore {
    /// Empty store with no pipelines
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store seeded with `example_pipeline` and `data_processing`
    pub fn seeded() -> Self {
        let mut store = Self::default();

        store.insert_pipeline(
            sample_pipeline(
                "example_pipeline",
                "Example Pipeline",
                "A sample pipeline for testing",
                "2023-01-01T00:00:00Z",
                "2023-01-02T00:00:00Z",
            ),
            vec![
                sample_block(
                    "data_loader",
                    "Load Data",
                    "data_loader",
                    "# Data loader block\n\n@data_loader\ndef load_data():\n    # Load data from source\n    data = {\n        'column1': [1, 2, 3],\n        'column2': ['a', 'b', 'c']\n    }\n    return data",
                    &[],
                ),
                sample_block(
                    "transformer",
                    "Transform Data",
                    "transformer",
                    "# Transformer block\n\n@transformer\ndef transform(data, *args, **kwargs):\n    # Transform the data\n    data['column3'] = [x * 2 for x in data['column1']]\n    return data",
                    &["data_loader"],
                ),
                sample_block(
                    "data_exporter",
                    "Export Data",
                    "data_exporter",
                    "# Data exporter block\n\n@data_exporter\ndef export_data(data, *args, **kwargs):\n    # Export the data\n    print(f'Exporting data with columns: {list(data.keys())}')\n    return data",
                    &["transformer"],
                ),
            ],
        );

        store.insert_pipeline(
            sample_pipeline(
                "data_processing",
                "Data Processing",
                "Pipeline for processing raw data",
                "2023-02-01T00:00:00Z",
                "2023-02-02T00:00:00Z",
            ),
            vec![
                sample_block(
                    "ingest_csv",
                    "Ingest CSV",
                    "data_loader",
                    "# CSV ingestion block\n\n@data_loader\ndef load_csv():\n    import pandas as pd\n    return pd.read_csv('sample_data.csv')",
                    &[],
                ),
                sample_block(
                    "clean_data",
                    "Clean Data",
                    "transformer",
                    "# Data cleaning block\n\n@transformer\ndef clean(df, *args, **kwargs):\n    # Remove duplicates\n    df = df.drop_duplicates()\n    # Drop rows with missing values\n    df = df.dropna()\n    return df",
                    &["ingest_csv"],
                ),
            ],
        );

        store
    }

    /// Add a pipeline together with its blocks
    pub fn insert_pipeline(&mut self, pipeline: Pipeline, blocks: Vec<Block>) {
        self.blocks.insert(pipeline.uuid.clone(), blocks);
        self.pipelines.push(pipeline);
    }

    // =============================================================================
    // Pipelines
    // =============================================================================

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn pipeline(&self, pipeline_uuid: &str) -> Result<&Pipeline> {
        self.pipelines
            .iter()
            .find(|p| p.uuid == pipeline_uuid)
            .ok_or(StoreError::PipelineNotFound)
    }

    /// Create a pipeline whose uuid is derived from its name
    pub fn create_pipeline(&mut self, req: NewPipeline) -> Result<Pipeline> {
        let uuid = slug(&req.name);
        if self.pipeline(&uuid).is_ok() {
            return Err(StoreError::AlreadyExists(uuid));
        }

        let now = timestamp();
        let pipeline = Pipeline {
            uuid,
            name: non_empty_or(req.name, "Untitled"),
            description: Some(req.description),
            pipeline_type: non_empty_or(req.pipeline_type, "python"),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        self.insert_pipeline(pipeline.clone(), Vec::new());
        Ok(pipeline)
    }

    // =============================================================================
    // Blocks
    // =============================================================================

    pub fn blocks(&self, pipeline_uuid: &str) -> Result<&[Block]> {
        self.blocks
            .get(pipeline_uuid)
            .map(Vec::as_slice)
            .ok_or(StoreError::PipelineNotFound)
    }

    pub fn block(&self, pipeline_uuid: &str, block_uuid: &str) -> Result<&Block> {
        self.blocks(pipeline_uuid)
            .map_err(|_| StoreError::BlockNotFound)?
            .iter()
            .find(|b| b.uuid == block_uuid)
            .ok_or(StoreError::BlockNotFound)
    }

    pub fn block_content(&self, pipeline_uuid: &str, block_uuid: &str) -> Result<&str> {
        self.block(pipeline_uuid, block_uuid)
            .ok()
            .and_then(|b| b.content.as_deref())
            .ok_or(StoreError::BlockContentNotFound)
    }

    /// Append a block to a pipeline; its uuid is derived from its name
    pub fn create_block(&mut self, pipeline_uuid: &str, req: NewBlock) -> Result<Block> {
        let blocks = self
            .blocks
            .get_mut(pipeline_uuid)
            .ok_or(StoreError::PipelineNotFound)?;

        let uuid = slug(&req.name);
        if blocks.iter().any(|b| b.uuid == uuid) {
            return Err(StoreError::AlreadyExists(uuid));
        }

        let block = Block {
            uuid,
            name: non_empty_or(req.name, "Untitled"),
            block_type: non_empty_or(req.block_type, "transformer"),
            language: non_empty_or(req.language, "python"),
            status: "not_executed".to_string(),
            content: Some(req.content),
            upstream_blocks: req.upstream_blocks,
        };

        blocks.push(block.clone());
        Ok(block)
    }

    /// Overwrite the fields present in the patch
    pub fn update_block(
        &mut self,
        pipeline_uuid: &str,
        block_uuid: &str,
        patch: BlockPatch,
    ) -> Result<Block> {
        let block = self
            .blocks
            .get_mut(pipeline_uuid)
            .and_then(|blocks| blocks.iter_mut().find(|b| b.uuid == block_uuid))
            .ok_or(StoreError::BlockNotFound)?;

        if let Some(content) = patch.content {
            block.content = Some(content);
        }
        if let Some(name) = patch.name {
            block.name = name;
        }

        Ok(block.clone())
    }

    // =============================================================================
    // Runs
    // =============================================================================

    /// Start a pipeline run, recording one block run per block
    pub fn create_pipeline_run(&mut self, pipeline_uuid: &str) -> Result<PipelineRun> {
        self.pipeline(pipeline_uuid)?;
        let blocks = self.blocks(pipeline_uuid)?.to_vec();

        let run = PipelineRun {
            id: RunId::Number(self.next_pipeline_run_id),
            pipeline_uuid: pipeline_uuid.to_string(),
            status: Some("running".to_string()),
            started_at: Some(timestamp()),
            completed_at: None,
        };
        self.next_pipeline_run_id += 1;

        for block in blocks {
            let block_run = self.next_block_run(pipeline_uuid, &block, Some(run.id.clone()));
            self.block_runs.push(block_run);
        }

        self.pipeline_runs.push(run.clone());
        Ok(run)
    }

    pub fn pipeline_runs(&self, pipeline_uuid: Option<&str>) -> Vec<PipelineRun> {
        self.pipeline_runs
            .iter()
            .filter(|r| pipeline_uuid.is_none_or(|uuid| r.pipeline_uuid == uuid))
            .cloned()
            .collect()
    }

    /// Start a standalone run of a single block
    pub fn create_block_run(&mut self, pipeline_uuid: &str, block_uuid: &str) -> Result<BlockRun> {
        let block = self.block(pipeline_uuid, block_uuid)?.clone();
        let run = self.next_block_run(pipeline_uuid, &block, None);
        self.block_runs.push(run.clone());
        Ok(run)
    }

    /// Block runs, optionally restricted to one pipeline run
    pub fn block_runs(&self, pipeline_run_id: Option<&str>) -> Vec<BlockRun> {
        self.block_runs
            .iter()
            .filter(|r| {
                pipeline_run_id.is_none_or(|id| {
                    r.pipeline_run_id
                        .as_ref()
                        .is_some_and(|run_id| run_id.to_string() == id)
                })
            })
            .cloned()
            .collect()
    }

    fn next_block_run(
        &mut self,
        pipeline_uuid: &str,
        block: &Block,
        pipeline_run_id: Option<RunId>,
    ) -> BlockRun {
        let run = BlockRun {
            id: RunId::Number(self.next_block_run_id),
            pipeline_run_id,
            pipeline_uuid: pipeline_uuid.to_string(),
            block_uuid: block.uuid.clone(),
            block_name: Some(block.name.clone()),
            status: Some("running".to_string()),
            started_at: Some(timestamp()),
            completed_at: None,
        };
        self.next_block_run_id += 1;
        run
    }
}

fn sample_pipeline(
    uuid: &str,
    name: &str,
    description: &str,
    created_at: &str,
    updated_at: &str,
) -> Pipeline {
    Pipeline {
        uuid: uuid.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        pipeline_type: "python".to_string(),
        created_at: Some(created_at.to_string()),
        updated_at: Some(updated_at.to_string()),
    }
}

fn sample_block(
    uuid: &str,
    name: &str,
    block_type: &str,
    content: &str,
    upstream: &[&str],
) -> Block {
    Block {
        uuid: uuid.to_string(),
        name: name.to_string(),
        block_type: block_type.to_string(),
        language: "python".to_string(),
        status: "not_executed".to_string(),
        content: Some(content.to_string()),
        upstream_blocks: upstream.iter().map(|s| s.to_string()).collect(),
    }
}

/// Mage derives uuids from names: lowercase, spaces replaced by underscores
fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store() {
        let store = MockStore::seeded();

        assert_eq!(store.pipelines().len(), 2);
        let uuids: Vec<_> = store
            .blocks("example_pipeline")
            .unwrap()
            .iter()
            .map(|b| b.uuid.as_str())
            .collect();
        assert_eq!(uuids, vec!["data_loader", "transformer", "data_exporter"]);
    }

    #[test]
    fn test_create_pipeline_derives_uuid() {
        let mut store = MockStore::empty();
        let pipeline = store
            .create_pipeline(NewPipeline {
                name: "Nightly ETL".to_string(),
                description: String::new(),
                pipeline_type: String::new(),
            })
            .unwrap();

        assert_eq!(pipeline.uuid, "nightly_etl");
        assert_eq!(pipeline.pipeline_type, "python");
        assert!(store.blocks("nightly_etl").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_pipeline_rejected() {
        let mut store = MockStore::seeded();
        let result = store.create_pipeline(NewPipeline {
            name: "Example Pipeline".to_string(),
            ..Default::default()
        });

        assert_eq!(
            result,
            Err(StoreError::AlreadyExists("example_pipeline".to_string()))
        );
    }

    #[test]
    fn test_missing_entities() {
        let store = MockStore::seeded();

        assert_eq!(
            store.pipeline("does_not_exist"),
            Err(StoreError::PipelineNotFound)
        );
        assert_eq!(
            store.block("does_not_exist", "x"),
            Err(StoreError::BlockNotFound)
        );
        assert_eq!(
            store.block_content("example_pipeline", "x"),
            Err(StoreError::BlockContentNotFound)
        );
    }

    #[test]
    fn test_update_block_patches_fields() {
        let mut store = MockStore::seeded();
        let updated = store
            .update_block(
                "example_pipeline",
                "transformer",
                BlockPatch {
                    content: Some("return data".to_string()),
                    name: None,
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Transform Data");
        assert_eq!(
            store.block_content("example_pipeline", "transformer"),
            Ok("return data")
        );
    }

    #[test]
    fn test_pipeline_run_records_block_runs() {
        let mut store = MockStore::seeded();
        let run = store.create_pipeline_run("example_pipeline").unwrap();

        assert_eq!(run.id, RunId::Number(12345));
        assert_eq!(store.pipeline_runs(Some("example_pipeline")).len(), 1);
        assert!(store.pipeline_runs(Some("data_processing")).is_empty());

        let block_runs = store.block_runs(Some("12345"));
        assert_eq!(block_runs.len(), 3);
        assert_eq!(block_runs[0].block_name.as_deref(), Some("Load Data"));
    }

    #[test]
    fn test_block_run_ids_increment() {
        let mut store = MockStore::seeded();
        let first = store.create_block_run("example_pipeline", "transformer").unwrap();
        let second = store.create_block_run("example_pipeline", "transformer").unwrap();

        assert_eq!(first.id, RunId::Number(67890));
        assert_eq!(second.id, RunId::Number(67891));
        assert!(store.block_runs(Some("12345")).is_empty());
        assert_eq!(
            store.create_block_run("example_pipeline", "missing"),
            Err(StoreError::BlockNotFound)
        );
    }
}
