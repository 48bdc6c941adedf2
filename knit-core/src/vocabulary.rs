//! Stitch vocabulary checks.
//!
//! Classifies pattern text by whether every stitch in it is one the engine
//! (or a known stitch family) understands. Matching is lenient on spelling:
//! tokens are lower-cased, commas and semicolons separate tokens, and
//! surrounding punctuation is dropped.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::cable;
use crate::technique::TechniqueTable;

/// Stitch names recognised without a technique table entry.
pub const BUILTIN_STITCHES: &[&str] = &[
    "k", "co", "yo", "bo", "p", "kfb", "kfb3", "kfb4", "kfb5", "kfb3-3", "ssk", "k2tog", "p2tog",
    "k3tog", "turn", "knit", "purl",
];

static STITCH_FAMILIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^k\d+$",
        r"^p\d+$",
        r"^k\d*-[a-z]+$",
        r"^p\d*-[a-z]+$",
        r"^(k\d*tog|ssk|p\d*tog)-[a-z]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Normalise raw text into comparable stitch tokens.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace([',', ';'], " ")
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_')))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-file classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub name: String,
    pub recognized: BTreeSet<String>,
    pub unrecognized: BTreeSet<String>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.unrecognized.is_empty()
    }
}

/// Set of recognised stitch names.
pub struct Vocabulary {
    known: HashSet<String>,
}

impl Vocabulary {
    /// Built-in names plus every symbol of `table`.
    pub fn new(table: &TechniqueTable) -> Self {
        let known = BUILTIN_STITCHES
            .iter()
            .map(|s| s.to_string())
            .chain(table.symbols().map(str::to_lowercase))
            .collect();
        Self { known }
    }

    /// Whether a normalised token is a known stitch.
    pub fn recognizes(&self, token: &str) -> bool {
        self.known.contains(token)
            || cable::is_cable(token)
            || STITCH_FAMILIES.iter().any(|re| re.is_match(token))
    }

    /// Classify every token of a pattern.
    pub fn analyze(&self, name: &str, text: &str) -> FileReport {
        let mut report = FileReport {
            name: name.to_string(),
            ..Default::default()
        };

        for token in normalize_tokens(text) {
            if self.recognizes(&token) {
                report.recognized.insert(token);
            } else {
                report.unrecognized.insert(token);
            }
        }

        report
    }
}

/// Valid/invalid file lists over a set of reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VocabularySummary {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

impl VocabularySummary {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a FileReport>) -> Self {
        let mut summary = Self::default();
        for report in reports {
            if report.is_valid() {
                summary.valid.push(report.name.clone());
            } else {
                summary.invalid.push(report.name.clone());
            }
        }
        summary.valid.sort();
        summary.invalid.sort();
        summary
    }

    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    /// One file name per line.
    pub fn list_text(names: &[String]) -> String {
        names.iter().map(|n| format!("{}\n", n)).collect()
    }

    /// Human-readable summary naming the generated list files.
    pub fn summary_text(&self, files: &[&str]) -> String {
        let mut output = String::new();
        output.push_str("KNITTING FILES ANALYSIS SUMMARY\n");
        output.push_str(&"=".repeat(50));
        output.push_str("\n\n");
        output.push_str(&format!("Total files analyzed: {}\n", self.total()));
        output.push_str(&format!("Valid files: {}\n", self.valid.len()));
        output.push_str(&format!("Invalid files: {}\n\n", self.invalid.len()));
        output.push_str("Files created:\n");
        for file in files {
            output.push_str(&format!("- {}\n", file));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Technique;

    #[test]
    fn test_normalize_tokens() {
        assert_eq!(
            normalize_tokens("K2tog, yo; (ssk)  P3.\n*"),
            vec!["k2tog", "yo", "ssk", "p3"]
        );
    }

    #[test]
    fn test_builtin_and_families() {
        let vocab = Vocabulary::new(&TechniqueTable::new());
        for token in ["k", "kfb3-3", "k12", "p4", "k1-b", "p-tbl", "k2tog-b", "ssk-l", "c6f"] {
            assert!(vocab.recognizes(token), "{} should be recognized", token);
        }
        for token in ["sl1", "c3f", "m1l", "ktog"] {
            assert!(!vocab.recognizes(token), "{} should not be recognized", token);
        }
    }

    #[test]
    fn test_table_symbols_are_recognized() {
        let table = TechniqueTable::from_entries([("m1l", Technique::new("m1l", 0, 1, false))]);
        let vocab = Vocabulary::new(&table);
        assert!(vocab.recognizes("m1l"));
    }

    #[test]
    fn test_analyze_and_summarize() {
        let vocab = Vocabulary::new(&TechniqueTable::new());
        let good = vocab.analyze("good.txt", "co co co\nturn k k k");
        let bad = vocab.analyze("bad.txt", "co co\nturn sl1 k");

        assert!(good.is_valid());
        assert!(!bad.is_valid());
        assert_eq!(bad.unrecognized.iter().collect::<Vec<_>>(), vec!["sl1"]);

        let summary = VocabularySummary::from_reports([&bad, &good]);
        assert_eq!(summary.valid, vec!["good.txt"]);
        assert_eq!(summary.invalid, vec!["bad.txt"]);
        assert_eq!(VocabularySummary::list_text(&summary.valid), "good.txt\n");

        let text = summary.summary_text(&["valid_files_list.txt"]);
        assert!(text.contains("Total files analyzed: 2\n"));
        assert!(text.contains("- valid_files_list.txt\n"));
    }
}
