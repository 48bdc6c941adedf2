//! Inspect command - fabric statistics for one pattern

use anyhow::{Context, Result};
use colored::Colorize;
use knit_core::graph::FabricStats;
use knit_core::{pattern, FabricGraph, GraphBuilder, StitchId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::load_techniques;
use crate::config::KnitConfig;
use crate::output::{Output, OutputConfig, TableDisplay, TableOutput};

/// Neighbourhood of a single stitch.
#[derive(Debug, Serialize)]
pub struct StitchDetail {
    pub id: StitchId,
    pub degree: usize,
    pub neighbors: Vec<StitchId>,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub pattern: String,
    pub rows: usize,
    pub tokens: usize,
    /// Occurrences of each symbol in the pattern.
    pub symbols: BTreeMap<String, usize>,
    pub stats: FabricStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stitch: Option<StitchDetail>,
}

impl TableDisplay for InspectReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!("{} {}\n", "Pattern".cyan().bold(), self.pattern);

        let symbols = self
            .symbols
            .iter()
            .map(|(symbol, n)| format!("{}×{}", symbol, n))
            .collect::<Vec<_>>()
            .join(" ");

        let pairs = vec![
            ("Rows", self.rows.to_string()),
            ("Tokens", self.tokens.to_string()),
            ("Symbols", symbols),
            ("Stitches", self.stats.stitches.to_string()),
            ("Edges", self.stats.edges.to_string()),
            ("Horizontal", self.stats.horizontal_edges.to_string()),
            ("Vertical", self.stats.vertical_edges.to_string()),
            ("Components", self.stats.components.to_string()),
            ("Isolated", self.stats.isolated.to_string()),
            ("Max degree", self.stats.max_degree.to_string()),
        ];
        output.push_str(&TableOutput::format_key_value(&pairs, config));

        if let Some(stitch) = &self.stitch {
            let neighbors = stitch
                .neighbors
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!(
                "\n\n{} {}: degree {}, neighbors [{}]",
                "Stitch".cyan().bold(),
                stitch.id,
                stitch.degree,
                neighbors
            ));
        }

        output
    }
}

/// Run the inspect command
pub fn run(
    pattern_path: &Path,
    techniques: Option<&Path>,
    stitch: Option<StitchId>,
    config: &KnitConfig,
    output_config: &OutputConfig,
) -> Result<()> {
    let table = load_techniques(config, techniques)?;
    let text = fs::read_to_string(pattern_path)
        .with_context(|| format!("Failed to read pattern {}", pattern_path.display()))?;

    let tokens = pattern::tokenize(&text);
    let graph = GraphBuilder::new(&table)
        .with_weights(config.edge_weights())
        .build(&tokens)
        .with_context(|| format!("Failed to build {}", pattern_path.display()))?;
    let fabric = FabricGraph::from_stitch_graph(&graph);

    let stitch = match stitch {
        Some(id) => {
            let degree = fabric.degree(id).with_context(|| {
                format!("Stitch {} does not exist ({} stitches)", id, graph.count)
            })?;
            Some(StitchDetail {
                id,
                degree,
                neighbors: fabric.neighbors(id),
            })
        }
        None => None,
    };

    let mut symbols = BTreeMap::new();
    for token in &tokens {
        *symbols.entry(token.symbol.clone()).or_insert(0) += 1;
    }

    let report = InspectReport {
        pattern: pattern_path.display().to_string(),
        rows: pattern::row_count(&text),
        tokens: tokens.len(),
        symbols,
        stats: fabric.stats(),
        stitch,
    };

    Output::with_config(report, output_config).render()
}
