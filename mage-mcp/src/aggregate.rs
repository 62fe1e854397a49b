//! Cross-cutting aggregations
//!
//! Operations that join several API calls into one report: pipeline content
//! assembly, execution history and keyword search. All sub-requests are issued
//! serially, so each of these costs one round trip per block (or run) touched.

use mage_client::{ClientError, MageClient};
use mage_core::domain::block::Block;
use mage_core::domain::run::{BlockRun, PipelineRun};
use mage_core::domain::search::SearchResult;

/// One block of a pipeline together with the outcome of fetching its code
#[derive(Debug)]
pub struct BlockSection {
    pub block: Block,
    /// `Ok(None)` when the service answered without a content field
    pub content: Result<Option<String>, ClientError>,
}

/// A pipeline run and the block runs that belong to it
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run: PipelineRun,
    pub block_runs: Vec<BlockRun>,
}

/// Fetch the block list once, then each block's content in list order
///
/// A failed content fetch is kept in its section instead of aborting, so the
/// caller can report it inline and still render the other blocks.
pub async fn block_sections(
    client: &MageClient,
    pipeline_uuid: &str,
) -> Result<Vec<BlockSection>, ClientError> {
    let blocks = client.list_blocks(pipeline_uuid).await?;
    let mut sections = Vec::with_capacity(blocks.len());

    for block in blocks {
        let content = client.get_block_content(pipeline_uuid, &block.uuid).await;
        if let Err(e) = &content {
            tracing::warn!(
                "Could not fetch content of block {} in {}: {}",
                block.uuid,
                pipeline_uuid,
                e
            );
        }
        sections.push(BlockSection { block, content });
    }

    Ok(sections)
}

/// Collect every run of a pipeline with its block runs
///
/// An empty result is a normal outcome: the pipeline has never been run.
pub async fn execution_history(
    client: &MageClient,
    pipeline_uuid: &str,
) -> Result<Vec<RunReport>, ClientError> {
    let runs = client.list_pipeline_runs(pipeline_uuid).await?;
    let mut reports = Vec::with_capacity(runs.len());

    for run in runs {
        let block_runs = client.list_block_runs(&run.id).await?;
        reports.push(RunReport { run, block_runs });
    }

    Ok(reports)
}

/// Search every block of every pipeline for `query`
///
/// Matching is a case-insensitive substring test against the block's name,
/// uuid and type. Blocks whose metadata does not match have their content
/// fetched and tested instead. Blocks or pipelines that cannot be read are
/// skipped; only a failure to list pipelines aborts the search. Results keep
/// discovery order.
pub async fn search_blocks(
    client: &MageClient,
    query: &str,
) -> Result<Vec<SearchResult>, ClientError> {
    let needle = query.to_lowercase();
    let pipelines = client.list_pipelines().await?;
    let mut results = Vec::new();

    for pipeline in pipelines {
        let blocks = match client.list_blocks(&pipeline.uuid).await {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::warn!("Skipping pipeline {} during search: {}", pipeline.uuid, e);
                continue;
            }
        };

        for block in blocks {
            let content_match = if metadata_matches(&block, &needle) {
                false
            } else {
                match client.get_block_content(&pipeline.uuid, &block.uuid).await {
                    Ok(Some(content)) if content.to_lowercase().contains(&needle) => true,
                    _ => continue,
                }
            };

            results.push(SearchResult {
                pipeline_uuid: pipeline.uuid.clone(),
                pipeline_name: pipeline.name.clone(),
                block_uuid: block.uuid,
                block_name: block.name,
                block_type: block.block_type,
                content_match,
            });
        }
    }

    tracing::debug!("Search for '{}' matched {} blocks", query, results.len());
    Ok(results)
}

/// `needle` must already be lowercase
fn metadata_matches(block: &Block, needle: &str) -> bool {
    [&block.name, &block.uuid, &block.block_type]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mage_core::domain::pipeline::Pipeline;
    use mage_core::dto::run::{CreatePipelineRun, PipelineRunTarget};
    use mage_mock::store::MockStore;

    async fn client() -> MageClient {
        let addr = mage_mock::spawn().await.unwrap();
        MageClient::new(mage_mock::api_url(addr)).unwrap()
    }

    #[test]
    fn test_metadata_match_fields() {
        let block = Block {
            uuid: "data_loader".to_string(),
            name: "Load Data".to_string(),
            block_type: "data_loader".to_string(),
            ..Default::default()
        };

        assert!(metadata_matches(&block, "load data"));
        assert!(metadata_matches(&block, "data_lo"));
        assert!(!metadata_matches(&block, "pandas"));
    }

    #[tokio::test]
    async fn test_sections_follow_block_order() {
        let client = client().await;
        let sections = block_sections(&client, "example_pipeline").await.unwrap();

        let uuids: Vec<_> = sections.iter().map(|s| s.block.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["data_loader", "transformer", "data_exporter"]);
        assert!(sections.iter().all(|s| matches!(s.content, Ok(Some(_)))));
    }

    #[tokio::test]
    async fn test_sections_keep_failed_content_fetches() {
        let mut store = MockStore::empty();
        store.insert_pipeline(
            Pipeline {
                uuid: "partial".to_string(),
                ..Default::default()
            },
            vec![
                Block {
                    uuid: "ok".to_string(),
                    content: Some("select 1".to_string()),
                    ..Default::default()
                },
                Block {
                    uuid: "empty".to_string(),
                    content: None,
                    ..Default::default()
                },
            ],
        );
        let addr = mage_mock::spawn_with(store).await.unwrap();
        let client = MageClient::new(mage_mock::api_url(addr)).unwrap();

        let sections = block_sections(&client, "partial").await.unwrap();

        assert_eq!(sections.len(), 2);
        assert!(matches!(sections[0].content, Ok(Some(ref c)) if c == "select 1"));
        assert!(matches!(sections[1].content, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_history_empty_before_any_run() {
        let client = client().await;
        let history = execution_history(&client, "example_pipeline").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_history_includes_block_runs() {
        let client = client().await;
        client
            .trigger_pipeline_run(&CreatePipelineRun {
                pipeline_run: PipelineRunTarget {
                    pipeline_uuid: "data_processing".to_string(),
                },
            })
            .await
            .unwrap();

        let history = execution_history(&client, "data_processing").await.unwrap();

        assert_eq!(history.len(), 1);
        let blocks: Vec<_> = history[0]
            .block_runs
            .iter()
            .map(|r| r.block_uuid.as_str())
            .collect();
        assert_eq!(blocks, vec!["ingest_csv", "clean_data"]);
    }

    #[tokio::test]
    async fn test_search_metadata_then_content() {
        let client = client().await;

        let results = search_blocks(&client, "TRANSFORM").await.unwrap();
        let found: Vec<_> = results
            .iter()
            .map(|r| (r.block_uuid.as_str(), r.content_match))
            .collect();
        assert_eq!(found, vec![("transformer", false), ("clean_data", false)]);

        let results = search_blocks(&client, "pandas").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pipeline_uuid, "data_processing");
        assert_eq!(results[0].block_uuid, "ingest_csv");
        assert!(results[0].content_match);
    }

    #[tokio::test]
    async fn test_search_broadening_never_loses_matches() {
        let client = client().await;

        let mut previous = 0;
        for query in ["load_data", "load_dat", "load", "loa", "lo"] {
            let count = search_blocks(&client, query).await.unwrap().len();
            assert!(count >= previous, "{query} matched {count} < {previous}");
            previous = count;
        }
    }

    #[tokio::test]
    async fn test_search_skips_blocks_without_content() {
        let mut store = MockStore::empty();
        store.insert_pipeline(
            Pipeline {
                uuid: "p".to_string(),
                name: "P".to_string(),
                ..Default::default()
            },
            vec![
                Block {
                    uuid: "a".to_string(),
                    name: "a".to_string(),
                    content: None,
                    ..Default::default()
                },
                Block {
                    uuid: "b".to_string(),
                    name: "b".to_string(),
                    content: Some("needle".to_string()),
                    ..Default::default()
                },
            ],
        );
        let addr = mage_mock::spawn_with(store).await.unwrap();
        let client = MageClient::new(mage_mock::api_url(addr)).unwrap();

        let results = search_blocks(&client, "needle").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].block_uuid, "b");
        assert!(results[0].content_match);
    }

    #[tokio::test]
    async fn test_search_skips_pipelines_with_failing_block_list() {
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pipelines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pipelines": [
                    {"uuid": "x", "name": "X"},
                    {"uuid": "y", "name": "Y"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/pipelines/x/blocks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/pipelines/y/blocks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blocks": [{"uuid": "needle_loader", "name": "Needle", "type": "data_loader"}]
            })))
            .mount(&server)
            .await;

        let client = MageClient::new(format!("{}/api/", server.uri())).unwrap();
        let results = search_blocks(&client, "needle").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pipeline_uuid, "y");
        assert_eq!(results[0].block_uuid, "needle_loader");
        assert!(!results[0].content_match);
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let client = client().await;
        let results = search_blocks(&client, "no-such-token").await.unwrap();
        assert!(results.is_empty());
    }
}
