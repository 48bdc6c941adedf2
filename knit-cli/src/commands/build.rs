//! Build command - turn one pattern file into a stitch graph

use anyhow::{Context, Result};
use clap::ValueEnum;
use knit_core::exporter::{dot, json, matrix};
use knit_core::{GraphBuilder, StitchGraph};
use std::fs;
use std::path::Path;

use super::load_techniques;
use crate::config::KnitConfig;
use crate::output::{Output, OutputConfig, SuccessMessage};

/// Graph serialization written by `knit build`
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ExportKind {
    /// Graphviz DOT text
    #[default]
    Dot,
    /// Adjacency matrix as CSV
    Matrix,
    /// JSON node/edge document
    Json,
}

impl ExportKind {
    pub fn render(self, graph: &StitchGraph) -> Result<String> {
        Ok(match self {
            ExportKind::Dot => dot::export(graph),
            ExportKind::Matrix => matrix::to_csv(&matrix::adjacency(graph)),
            ExportKind::Json => json::export(graph, true)?,
        })
    }
}

/// Run the build command
///
/// Without `output` the export goes to stdout as-is, so it can be piped.
pub fn run(
    pattern: &Path,
    techniques: Option<&Path>,
    export: ExportKind,
    output: Option<&Path>,
    config: &KnitConfig,
    output_config: &OutputConfig,
) -> Result<()> {
    let table = load_techniques(config, techniques)?;
    let text = fs::read_to_string(pattern)
        .with_context(|| format!("Failed to read pattern {}", pattern.display()))?;

    let graph = GraphBuilder::new(&table)
        .with_weights(config.edge_weights())
        .build_text(&text)
        .with_context(|| format!("Failed to build {}", pattern.display()))?;

    let rendered = export.render(&graph)?;

    match output {
        None => {
            print!("{}", rendered);
            Ok(())
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Output::with_config(
                SuccessMessage::new(format!(
                    "{} stitches, {} edges written to {}",
                    graph.count,
                    graph.edge_count(),
                    path.display()
                )),
                output_config,
            )
            .render()
        }
    }
}
