//! Batch command - build every pattern in a directory
//!
//! Patterns are built in parallel with isolated state. Outputs are written
//! only for patterns that built successfully; failures are reported at the
//! end and never stop the rest of the batch.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use knit_core::batch::{self, BatchSummary, FailedPattern, PatternOutcome};
use knit_core::exporter::{dot, json, matrix};
use knit_core::scanner::{self, ScanOptions};
use knit_core::StitchGraph;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::load_techniques;
use crate::config::KnitConfig;
use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay, TableOutput};

/// Flags of `knit batch`
#[derive(Debug, Clone)]
pub struct BatchArgs {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub techniques: Option<PathBuf>,
    pub threads: Option<usize>,
    pub json: bool,
    pub no_matrix: bool,
}

/// Result of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub input: String,
    pub output_dir: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedPattern>,
    pub files_written: usize,
    pub duration_ms: u64,
    pub generated_at: String,
}

impl TableDisplay for BatchReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} -> {}\n\n",
            "Batch".cyan().bold(),
            self.input,
            self.output_dir
        ));

        if !self.failed.is_empty() {
            let rows: Vec<Vec<String>> = self
                .failed
                .iter()
                .map(|f| {
                    vec![
                        f.path.clone(),
                        f.symbol.clone().unwrap_or_else(|| "-".to_string()),
                        f.message.clone(),
                    ]
                })
                .collect();
            output.push_str(&TableOutput::from_rows(
                &["File", "Symbol", "Error"],
                &rows,
                config,
            ));
            output.push_str("\n\n");
        }

        let failed = if self.failed.is_empty() {
            "0 failed".normal()
        } else {
            format!("{} failed", self.failed.len()).red().bold()
        };
        output.push_str(&format!(
            "{} {}, {} ({} files written in {}ms)",
            self.succeeded.to_string().green().bold(),
            "succeeded".green(),
            failed,
            self.files_written,
            self.duration_ms
        ));
        output
    }
}

fn create_progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}

/// Output directories of one batch run.
struct OutputDirs {
    dot: PathBuf,
    matrix: Option<PathBuf>,
    json: Option<PathBuf>,
}

impl OutputDirs {
    fn new(args: &BatchArgs, config: &KnitConfig) -> Self {
        Self {
            dot: args.out_dir.join(config.dot_dir()),
            matrix: (!args.no_matrix).then(|| args.out_dir.join(config.matrix_dir())),
            json: args.json.then(|| args.out_dir.join(config.json_dir())),
        }
    }

    fn create(&self) -> Result<()> {
        for dir in [Some(&self.dot), self.matrix.as_ref(), self.json.as_ref()]
            .into_iter()
            .flatten()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Write every export of one graph; returns the number of files written.
    ///
    /// All exports are rendered before anything touches the disk. If a write
    /// fails, the files already written for this graph are removed again.
    fn write(&self, name: &str, graph: &StitchGraph) -> Result<usize> {
        let mut files = vec![(self.dot.join(format!("{}.dot", name)), dot::export(graph))];
        if let Some(dir) = &self.matrix {
            let csv = matrix::to_csv(&matrix::adjacency(graph));
            files.push((dir.join(format!("{}.csv", name)), csv));
        }
        if let Some(dir) = &self.json {
            files.push((dir.join(format!("{}.json", name)), json::export(graph, false)?));
        }

        for (idx, (path, content)) in files.iter().enumerate() {
            if let Err(e) = write_file(path, content) {
                for (written, _) in &files[..idx] {
                    if let Err(remove_err) = fs::remove_file(written) {
                        tracing::warn!("Failed to remove {}: {}", written.display(), remove_err);
                    }
                }
                return Err(e);
            }
        }

        Ok(files.len())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Outputs of the successful outcomes of a batch.
#[derive(Debug, Default)]
struct WriteSummary {
    files_written: usize,
    failed: Vec<FailedPattern>,
}

/// Write the exports of every successful outcome; a failed write is recorded
/// and the remaining patterns are still written.
fn write_outputs(dirs: &OutputDirs, outcomes: &[PatternOutcome]) -> WriteSummary {
    let mut summary = WriteSummary::default();
    let mut seen = HashSet::new();

    for outcome in outcomes {
        let Ok(graph) = &outcome.result else {
            continue;
        };
        if !seen.insert(outcome.name.as_str()) {
            tracing::warn!(
                "Pattern name '{}' appears more than once; {} overwrites earlier output",
                outcome.name,
                outcome.path.display()
            );
        }
        match dirs.write(&outcome.name, graph) {
            Ok(count) => summary.files_written += count,
            Err(e) => {
                tracing::error!("Failed to write outputs of {}: {:#}", outcome.path.display(), e);
                summary.failed.push(FailedPattern {
                    name: outcome.name.clone(),
                    path: outcome.path.display().to_string(),
                    symbol: None,
                    message: format!("{:#}", e),
                });
            }
        }
    }

    summary
}

/// Run the batch command
pub fn run(
    args: &BatchArgs,
    config: &KnitConfig,
    quiet: bool,
    output_config: &OutputConfig,
) -> Result<()> {
    let start = Instant::now();
    let table = load_techniques(config, args.techniques.as_deref())?;

    let options = ScanOptions {
        extensions: config.extensions().to_vec(),
        ignore_patterns: config.ignore_patterns().to_vec(),
        follow_symlinks: false,
    };
    let scan = scanner::scan_patterns(&args.input, &options)
        .with_context(|| format!("Failed to scan {}", args.input.display()))?;
    tracing::info!(
        "Found {} patterns in {:.1}ms",
        scan.len(),
        scan.duration_ms
    );

    let progress = if quiet || output_config.format == OutputFormat::Json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(scan.len())
    };

    let outcomes = batch::build_patterns_with(
        &scan.patterns,
        &table,
        config.edge_weights(),
        args.threads.or(config.threads()),
        |outcome: &PatternOutcome| {
            progress.set_message(outcome.name.clone());
            progress.inc(1);
        },
    );
    progress.finish_and_clear();

    let dirs = OutputDirs::new(args, config);
    dirs.create()?;

    let written = write_outputs(&dirs, &outcomes);

    let summary = BatchSummary::from_outcomes(&outcomes);
    let total = summary.total();
    let mut failed = summary.failed;
    failed.extend(written.failed);
    let report = BatchReport {
        input: args.input.display().to_string(),
        output_dir: args.out_dir.display().to_string(),
        total,
        succeeded: total - failed.len(),
        failed,
        files_written: written.files_written,
        duration_ms: start.elapsed().as_millis() as u64,
        generated_at: chrono::Local::now().to_rfc3339(),
    };

    Output::with_config(report, output_config).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use knit_core::{Edge, EdgeWeights};

    fn args(out_dir: &Path) -> BatchArgs {
        BatchArgs {
            input: PathBuf::from("."),
            out_dir: out_dir.to_path_buf(),
            techniques: None,
            threads: None,
            json: true,
            no_matrix: false,
        }
    }

    #[test]
    fn test_output_dirs_write_all_exports() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = OutputDirs::new(&args(dir.path()), &KnitConfig::default());
        dirs.create().unwrap();

        let graph = StitchGraph::new(2, vec![Edge::horizontal(1, 0, &EdgeWeights::default())]);
        assert_eq!(dirs.write("swatch", &graph).unwrap(), 3);

        let dot = fs::read_to_string(dir.path().join("dot/swatch.dot")).unwrap();
        assert_eq!(dot, "Graph {\n  1 -- 0 [weight=1];\n}\n");
        assert!(dir.path().join("matrices/swatch.csv").exists());
        assert!(dir.path().join("json/swatch.json").exists());
    }

    #[test]
    fn test_output_dirs_skip_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let mut batch_args = args(dir.path());
        batch_args.no_matrix = true;
        batch_args.json = false;
        let dirs = OutputDirs::new(&batch_args, &KnitConfig::default());
        dirs.create().unwrap();

        assert_eq!(dirs.write("swatch", &StitchGraph::default()).unwrap(), 1);
        assert!(!dir.path().join("matrices").exists());
    }

    fn outcome(name: &str) -> PatternOutcome {
        PatternOutcome {
            name: name.to_string(),
            path: PathBuf::from(format!("patterns/{}.txt", name)),
            result: Ok(StitchGraph::new(
                2,
                vec![Edge::horizontal(1, 0, &EdgeWeights::default())],
            )),
        }
    }

    #[test]
    fn test_write_failure_is_isolated_per_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = OutputDirs::new(&args(dir.path()), &KnitConfig::default());
        dirs.create().unwrap();
        // A directory where the csv should go makes that write fail.
        fs::create_dir(dir.path().join("matrices/a.csv")).unwrap();

        let written = write_outputs(&dirs, &[outcome("a"), outcome("b")]);

        assert_eq!(written.files_written, 3);
        assert_eq!(written.failed.len(), 1);
        assert_eq!(written.failed[0].name, "a");
        assert_eq!(written.failed[0].symbol, None);
        assert!(written.failed[0].message.contains("a.csv"));

        assert!(!dir.path().join("dot/a.dot").exists());
        assert!(!dir.path().join("json/a.json").exists());
        assert!(dir.path().join("dot/b.dot").exists());
        assert!(dir.path().join("matrices/b.csv").exists());
        assert!(dir.path().join("json/b.json").exists());
    }

    #[test]
    fn test_write_outputs_skips_failed_builds() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = OutputDirs::new(&args(dir.path()), &KnitConfig::default());
        dirs.create().unwrap();

        let broken = PatternOutcome {
            name: "broken".to_string(),
            path: PathBuf::from("patterns/broken.txt"),
            result: Err(knit_core::KnitError::UnknownSymbol {
                symbol: "xyz".to_string(),
                line: 2,
            }),
        };
        let written = write_outputs(&dirs, &[broken, outcome("b")]);

        assert_eq!(written.files_written, 3);
        assert!(written.failed.is_empty());
        assert!(!dir.path().join("dot/broken.dot").exists());
    }

    #[test]
    fn test_report_table_lists_failures() {
        colored::control::set_override(false);
        let report = BatchReport {
            input: "patterns".to_string(),
            output_dir: "out".to_string(),
            total: 2,
            succeeded: 1,
            failed: vec![FailedPattern {
                name: "broken".to_string(),
                path: "patterns/broken.txt".to_string(),
                symbol: Some("xyz".to_string()),
                message: "Unknown stitch 'xyz' on line 2".to_string(),
            }],
            files_written: 2,
            duration_ms: 5,
            generated_at: String::new(),
        };
        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let table = report.to_table(&config);

        assert!(table.contains("patterns/broken.txt"));
        assert!(table.contains("xyz"));
        assert!(table.contains("1 succeeded, 1 failed"));
    }
}
