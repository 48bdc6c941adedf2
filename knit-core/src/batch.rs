//! Parallel batch building.
//!
//! Each pattern is built with its own needle state, so failures stay with the
//! file that caused them and never poison the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::scanner::ScannedPattern;
use crate::technique::TechniqueTable;
use crate::types::{EdgeWeights, StitchGraph};

/// Outcome of building one pattern file.
#[derive(Debug)]
pub struct PatternOutcome {
    pub name: String,
    pub path: PathBuf,
    pub result: Result<StitchGraph>,
}

impl PatternOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Read and build a single pattern file.
pub fn build_file(path: &Path, builder: &GraphBuilder) -> Result<StitchGraph> {
    let text = fs::read_to_string(path)?;
    builder.build_text(&text)
}

/// Build every pattern in parallel.
///
/// # Arguments
///
/// * `patterns` - Files found by the scanner
/// * `table` - Technique table shared by all builds
/// * `weights` - Edge weights shared by all builds
/// * `num_threads` - Optional pool size (defaults to rayon's global pool)
///
/// Outcomes come back in input order.
pub fn build_patterns(
    patterns: &[ScannedPattern],
    table: &TechniqueTable,
    weights: EdgeWeights,
    num_threads: Option<usize>,
) -> Vec<PatternOutcome> {
    build_patterns_with(patterns, table, weights, num_threads, |_| {})
}

/// Like [`build_patterns`], calling `on_done` as each pattern finishes.
///
/// `on_done` runs on worker threads in completion order.
pub fn build_patterns_with<F>(
    patterns: &[ScannedPattern],
    table: &TechniqueTable,
    weights: EdgeWeights,
    num_threads: Option<usize>,
    on_done: F,
) -> Vec<PatternOutcome>
where
    F: Fn(&PatternOutcome) + Sync,
{
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .ok(),
        _ => None,
    };

    let builder = GraphBuilder::new(table).with_weights(weights);
    let build_fn = |pattern: &ScannedPattern| -> PatternOutcome {
        let result = build_file(&pattern.full_path, &builder);
        match &result {
            Ok(graph) => info!(
                "Built {}: {} stitches, {} edges",
                pattern.name,
                graph.count,
                graph.edge_count()
            ),
            Err(e) => error!("Failed {}: {}", pattern.path, e),
        }
        let outcome = PatternOutcome {
            name: pattern.name.clone(),
            path: pattern.full_path.clone(),
            result,
        };
        on_done(&outcome);
        outcome
    };

    match pool {
        Some(pool) => pool.install(|| patterns.par_iter().map(build_fn).collect()),
        None => patterns.par_iter().map(build_fn).collect(),
    }
}

/// A pattern that failed to build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailedPattern {
    pub name: String,
    pub path: String,
    /// Offending stitch symbol, when the failure names one.
    pub symbol: Option<String>,
    pub message: String,
}

/// Succeeded/failed tally over a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: Vec<FailedPattern>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[PatternOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(_) => summary.succeeded += 1,
                Err(e) => summary.failed.push(FailedPattern {
                    name: outcome.name.clone(),
                    path: outcome.path.display().to_string(),
                    symbol: e.symbol().map(str::to_string),
                    message: e.to_string(),
                }),
            }
        }
        summary
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}
