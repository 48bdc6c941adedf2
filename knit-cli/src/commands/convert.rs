//! Convert command - node/edge document to node-link JSON

use anyhow::{Context, Result};
use knit_core::convert;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::output::{Output, OutputConfig, TableDisplay};

#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub input: String,
    pub output: String,
    pub nodes: usize,
    pub links: usize,
}

impl TableDisplay for ConvertReport {
    fn to_table(&self, _config: &OutputConfig) -> String {
        use colored::Colorize;
        format!(
            "{} {} -> {} ({} nodes, {} links)",
            "Converted".green().bold(),
            self.input,
            self.output,
            self.nodes,
            self.links
        )
    }
}

/// `<stem>_nodelink.json` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "graph".to_string());
    input.with_file_name(format!("{}_nodelink.json", stem))
}

/// Run the convert command
pub fn run(input: &Path, output: Option<&Path>, output_config: &OutputConfig) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let converted = convert::convert_file(input, &output)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let report = ConvertReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        nodes: converted.nodes.len(),
        links: converted.links.len(),
    };
    Output::with_config(report, output_config).render()
}
