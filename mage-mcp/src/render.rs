//! Text rendering
//!
//! Turns typed results into the narrative text handed to the assistant.
//! Nothing in here talks to the network.

use mage_core::domain::block::{Block, BlockLanguage};
use mage_core::domain::pipeline::Pipeline;
use mage_core::domain::run::{BlockRun, PipelineRun};
use mage_core::domain::search::SearchResult;

use crate::aggregate::{BlockSection, RunReport};
use crate::tools::{BlockSource, PipelineDetails, ToolError};

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: &str) -> &str {
    if value.is_empty() { NOT_AVAILABLE } else { value }
}

fn opt_or_na(value: Option<&str>) -> &str {
    value.map(or_na).unwrap_or(NOT_AVAILABLE)
}

fn name_or_unnamed(name: &str) -> &str {
    if name.is_empty() { "Unnamed" } else { name }
}

// =============================================================================
// Tool Outputs
// =============================================================================

pub fn pipeline_list(pipelines: &[Pipeline]) -> String {
    if pipelines.is_empty() {
        return "No pipelines found in Mage.ai.".to_string();
    }

    let mut out = String::from("Available Pipelines in Mage.ai:\n\n");
    for (idx, pipeline) in pipelines.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} (UUID: {})\n",
            idx + 1,
            name_or_unnamed(&pipeline.name),
            or_na(&pipeline.uuid)
        ));
        out.push_str(&format!(
            "   Description: {}\n",
            pipeline.description_or_default()
        ));
        out.push_str(&format!("   Type: {}\n", or_na(&pipeline.pipeline_type)));
        out.push_str(&format!(
            "   Created: {}\n\n",
            opt_or_na(pipeline.created_at.as_deref())
        ));
    }
    out
}

pub fn pipeline_details(details: &PipelineDetails) -> String {
    let pipeline = &details.pipeline;
    let mut out = format!("Pipeline: {}\n", name_or_unnamed(&pipeline.name));
    out.push_str(&format!("UUID: {}\n", or_na(&pipeline.uuid)));
    out.push_str(&format!(
        "Description: {}\n",
        pipeline.description_or_default()
    ));
    out.push_str(&format!("Type: {}\n", or_na(&pipeline.pipeline_type)));
    out.push_str(&format!(
        "Created at: {}\n",
        opt_or_na(pipeline.created_at.as_deref())
    ));
    out.push_str(&format!(
        "Updated at: {}\n\n",
        opt_or_na(pipeline.updated_at.as_deref())
    ));

    out.push_str(&format!("Total blocks: {}\n\n", details.blocks.len()));

    if !details.blocks.is_empty() {
        out.push_str("Blocks:\n");
        for (idx, block) in details.blocks.iter().enumerate() {
            out.push_str(&block_summary(idx + 1, block));
            out.push('\n');
        }
    }
    out
}

pub fn block_list(pipeline_uuid: &str, blocks: &[Block]) -> String {
    if blocks.is_empty() {
        return format!("No blocks found in pipeline with UUID: {}", pipeline_uuid);
    }

    let mut out = format!("Blocks in Pipeline (UUID: {}):\n\n", pipeline_uuid);
    for (idx, block) in blocks.iter().enumerate() {
        out.push_str(&block_summary(idx + 1, block));
        out.push_str(&format!("   Status: {}\n\n", or_na(&block.status)));
    }
    out
}

fn block_summary(position: usize, block: &Block) -> String {
    format!(
        "{}. {} (UUID: {})\n   Type: {}\n   Language: {}\n",
        position,
        name_or_unnamed(&block.name),
        or_na(&block.uuid),
        or_na(&block.block_type),
        or_na(&block.language)
    )
}

pub fn block_source(source: &BlockSource) -> String {
    let block = &source.block;
    let mut out = format!("Block: {}\n", name_or_unnamed(&block.name));
    out.push_str(&format!("Type: {}\n", or_na(&block.block_type)));
    out.push_str(&format!("Language: {}\n", or_na(&block.language)));
    out.push_str(&format!("Status: {}\n\n", or_na(&block.status)));
    out.push_str("--- Content ---\n\n");
    out.push_str(source.content.as_deref().unwrap_or("No content available"));
    out
}

pub fn created_pipeline(pipeline: &Pipeline) -> String {
    let mut out = String::from("Pipeline created successfully:\n\n");
    out.push_str(&format!("Name: {}\n", pipeline.name));
    out.push_str(&format!("UUID: {}\n", pipeline.uuid));
    out.push_str(&format!(
        "Description: {}\n",
        pipeline.description_or_default()
    ));
    out.push_str(&format!("Type: {}\n", pipeline.pipeline_type));
    out
}

pub fn created_block(block: &Block) -> String {
    let mut out = String::from("Block created successfully:\n\n");
    out.push_str(&format!("Name: {}\n", block.name));
    out.push_str(&format!("UUID: {}\n", block.uuid));
    out.push_str(&format!("Type: {}\n", block.block_type));
    out.push_str(&format!("Language: {}\n", block.language));
    out
}

pub fn updated_block(block: &Block) -> String {
    format!("Successfully updated content for block {}.", block.name)
}

pub fn pipeline_run_started(pipeline_uuid: &str, run: &PipelineRun) -> String {
    let mut out = String::from("Pipeline execution started:\n\n");
    out.push_str(&format!("Pipeline UUID: {}\n", pipeline_uuid));
    out.push_str(&format!("Run ID: {}\n", run.id));
    out.push_str(&format!("Status: {}\n", opt_or_na(run.status.as_deref())));
    out
}

pub fn block_run_started(pipeline_uuid: &str, block_uuid: &str, run: &BlockRun) -> String {
    let mut out = String::from("Block execution started:\n\n");
    out.push_str(&format!("Pipeline UUID: {}\n", pipeline_uuid));
    out.push_str(&format!("Block UUID: {}\n", block_uuid));
    out.push_str(&format!("Run ID: {}\n", run.id));
    out.push_str(&format!("Status: {}\n", opt_or_na(run.status.as_deref())));
    out
}

/// A failed tool call, as text
///
/// Soft outcomes (nothing found, no object in the response) are reported by
/// their own message; everything else is prefixed with what was being done.
pub fn tool_error(activity: &str, err: &ToolError) -> String {
    match err {
        ToolError::PipelineNotFound(_)
        | ToolError::BlockNotFound { .. }
        | ToolError::MissingObject(_)
        | ToolError::UnknownTool(_)
        | ToolError::InvalidArguments { .. } => err.to_string(),
        ToolError::Remote(_) => format!("Error {}: {}", activity, err),
    }
}

// =============================================================================
// Aggregated Reports
// =============================================================================

/// Pipeline code document: metadata header, then one section per block
///
/// Blocks written in python, sql or r get a banner in that language's comment
/// style before their code. A block without a language is treated as python.
pub fn pipeline_code(pipeline: &Pipeline, sections: &[BlockSection]) -> String {
    let mut out = format!("# Pipeline: {}\n", pipeline.name);
    out.push_str(&format!("# UUID: {}\n", pipeline.uuid));
    out.push_str(&format!("# Type: {}\n", pipeline.pipeline_type));
    out.push_str(&format!(
        "# Description: {}\n\n",
        pipeline.description_or_default()
    ));

    for section in sections {
        let block = &section.block;
        let name = name_or_unnamed(&block.name);
        let block_type = if block.block_type.is_empty() {
            "Unknown"
        } else {
            &block.block_type
        };

        out.push_str(&format!("# ===== Block: {} =====\n", name));
        out.push_str(&format!("# Type: {}\n", block_type));
        out.push_str(&format!("# Language: {}\n", block.language_name()));
        out.push_str(&format!("# UUID: {}\n\n", block.uuid));

        match block.language() {
            BlockLanguage::Python => {
                out.push_str(&format!("'''\n{} - {}\n'''\n\n", name, block_type))
            }
            BlockLanguage::Sql => out.push_str(&format!("-- {} - {}\n\n", name, block_type)),
            BlockLanguage::R => out.push_str(&format!("# {} - {}\n\n", name, block_type)),
            BlockLanguage::Other => {}
        }

        match &section.content {
            Ok(content) => {
                out.push_str(content.as_deref().unwrap_or("# No content available"));
                out.push_str("\n\n");
            }
            Err(e) => out.push_str(&format!("# Error retrieving content: {}\n\n", e)),
        }
        out.push_str(&format!("# {}\n\n", "=".repeat(50)));
    }
    out
}

/// Full pipeline content, as served by the `pipelines/{uuid}/content` resource
///
/// A block whose content could not be fetched gets an inline error note in
/// place of its section.
pub fn pipeline_content(pipeline: Option<&Pipeline>, sections: &[BlockSection]) -> String {
    let fallback = Pipeline::default();
    let pipeline = pipeline.unwrap_or(&fallback);

    let mut out = format!("# Pipeline: {}\n", or_na(&pipeline.name));
    out.push_str(&format!("# UUID: {}\n", or_na(&pipeline.uuid)));
    out.push_str(&format!(
        "# Description: {}\n",
        pipeline.description_or_default()
    ));
    out.push_str(&format!("# Type: {}\n\n", or_na(&pipeline.pipeline_type)));

    for section in sections {
        let block = &section.block;
        match &section.content {
            Ok(content) => {
                out.push_str(&format!("## Block: {}\n", block.name));
                out.push_str(&format!("## Type: {}\n", block.block_type));
                out.push_str(&format!("## UUID: {}\n\n", block.uuid));
                out.push_str(content.as_deref().unwrap_or("# No content found"));
                out.push_str("\n\n");
                out.push_str(&"=".repeat(80));
                out.push_str("\n\n");
            }
            Err(e) => out.push_str(&format!(
                "## Error retrieving content for block {} ({}): {}\n\n",
                block.name, block.uuid, e
            )),
        }
    }
    out
}

pub fn execution_history(pipeline_uuid: &str, reports: &[RunReport]) -> String {
    if reports.is_empty() {
        return "No execution history found for this pipeline.".to_string();
    }

    let mut out = format!("Execution History for Pipeline {}:\n\n", pipeline_uuid);
    for report in reports {
        let run = &report.run;
        out.push_str(&format!("Run ID: {}\n", run.id));
        out.push_str(&format!("Status: {}\n", opt_or_na(run.status.as_deref())));
        out.push_str(&format!(
            "Started: {}\n",
            opt_or_na(run.started_at.as_deref())
        ));
        out.push_str(&format!(
            "Completed: {}\n",
            run.completed_at.as_deref().unwrap_or("In progress")
        ));

        if !report.block_runs.is_empty() {
            out.push_str("Block Executions:\n");
            for block_run in &report.block_runs {
                out.push_str(&format!(
                    "  - {} ({}): {}\n",
                    block_run.block_name.as_deref().unwrap_or("Unknown"),
                    block_run.block_uuid,
                    opt_or_na(block_run.status.as_deref())
                ));
            }
        }

        out.push_str(&format!("\n{}\n\n", "-".repeat(40)));
    }
    out
}

pub fn search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No blocks found matching '{}'.", query);
    }

    let mut out = format!("Found {} blocks matching '{}':\n\n", results.len(), query);
    for (idx, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "{}. Pipeline: {} ({})\n",
            idx + 1,
            result.pipeline_name,
            result.pipeline_uuid
        ));
        out.push_str(&format!(
            "   Block: {} ({})\n",
            result.block_name, result.block_uuid
        ));
        out.push_str(&format!("   Type: {}\n", result.block_type));
        if result.content_match {
            out.push_str("   Note: Query matched in block content\n");
        }
        out.push('\n');
    }
    out
}
