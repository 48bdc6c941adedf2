//! Validate command - sort pattern files by stitch vocabulary
//!
//! Writes `valid_files_list.txt`, `invalid_files_list.txt` and
//! `stitch_analysis_summary.txt` into the output directory.

use anyhow::{Context, Result};
use colored::Colorize;
use knit_core::scanner::{self, ScanOptions};
use knit_core::vocabulary::{FileReport, Vocabulary, VocabularySummary};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::load_techniques;
use crate::config::KnitConfig;
use crate::output::{Output, OutputConfig, TableDisplay, TableOutput};

pub const VALID_LIST: &str = "valid_files_list.txt";
pub const INVALID_LIST: &str = "invalid_files_list.txt";
pub const SUMMARY_FILE: &str = "stitch_analysis_summary.txt";

/// Invalid files shown in the table view.
const SHOWN_INVALID: usize = 10;

#[derive(Debug, Serialize)]
pub struct ValidateReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub invalid_files: Vec<FileReport>,
    /// Every unrecognized token across all files.
    pub unrecognized: BTreeSet<String>,
    pub files_written: Vec<String>,
}

impl TableDisplay for ValidateReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!(
            "{} {} files: {} valid, {} invalid\n",
            "Validated".cyan().bold(),
            self.total,
            self.valid.to_string().green(),
            self.invalid.to_string().red()
        );

        if !self.invalid_files.is_empty() {
            let rows: Vec<Vec<String>> = self
                .invalid_files
                .iter()
                .take(SHOWN_INVALID)
                .map(|f| {
                    vec![
                        f.name.clone(),
                        f.unrecognized.iter().cloned().collect::<Vec<_>>().join(" "),
                    ]
                })
                .collect();
            output.push('\n');
            output.push_str(&TableOutput::from_rows(
                &["File", "Unrecognized"],
                &rows,
                config,
            ));
            if self.invalid_files.len() > SHOWN_INVALID {
                output.push_str(&format!(
                    "\n... and {} more",
                    self.invalid_files.len() - SHOWN_INVALID
                ));
            }
            output.push('\n');
        }

        output.push_str("\nFiles created:");
        for file in &self.files_written {
            output.push_str(&format!("\n- {}", file));
        }
        output
    }
}

/// Run the validate command
pub fn run(
    input: &Path,
    out_dir: &Path,
    techniques: Option<&Path>,
    config: &KnitConfig,
    output_config: &OutputConfig,
) -> Result<()> {
    let table = load_techniques(config, techniques)?;
    let vocabulary = Vocabulary::new(&table);

    let options = ScanOptions {
        extensions: config.extensions().to_vec(),
        ignore_patterns: config.ignore_patterns().to_vec(),
        follow_symlinks: false,
    };
    let scan = scanner::scan_patterns(input, &options)
        .with_context(|| format!("Failed to scan {}", input.display()))?;

    let mut reports = Vec::with_capacity(scan.len());
    for pattern in &scan.patterns {
        match fs::read(&pattern.full_path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                reports.push(vocabulary.analyze(&pattern.path, &text));
            }
            Err(e) => tracing::warn!("Skipping {}: {}", pattern.path, e),
        }
    }

    let summary = VocabularySummary::from_reports(&reports);

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let files = [VALID_LIST, INVALID_LIST, SUMMARY_FILE];
    let contents = [
        VocabularySummary::list_text(&summary.valid),
        VocabularySummary::list_text(&summary.invalid),
        summary.summary_text(&files),
    ];
    let mut files_written = Vec::new();
    for (name, content) in files.iter().zip(contents) {
        let path = out_dir.join(name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        files_written.push(path.display().to_string());
    }

    let unrecognized = reports
        .iter()
        .flat_map(|r| r.unrecognized.iter().cloned())
        .collect();
    let mut invalid_files: Vec<FileReport> =
        reports.into_iter().filter(|r| !r.is_valid()).collect();
    invalid_files.sort_by(|a, b| a.name.cmp(&b.name));

    let report = ValidateReport {
        total: summary.total(),
        valid: summary.valid.len(),
        invalid: summary.invalid.len(),
        invalid_files,
        unrecognized,
        files_written,
    };

    Output::with_config(report, output_config).render()
}
