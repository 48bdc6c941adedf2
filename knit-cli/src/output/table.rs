//! Table output formatting using the `tabled` crate

use super::{truncate, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Widest a single cell may grow before truncation.
const MAX_CELL_WIDTH: usize = 60;

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Format a simple key-value table
    pub fn format_key_value(pairs: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();

        for (key, value) in pairs {
            builder.push_record([*key, value.as_str()]);
        }

        let mut table = builder.build();

        if config.compact {
            table.with(Style::blank());
        } else {
            table.with(Style::rounded());
        }

        table.with(Modify::new(Columns::first()).with(Alignment::right()));

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }

    /// Create a simple table from rows of strings
    pub fn from_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|cell| {
                if config.should_truncate() {
                    truncate(cell, MAX_CELL_WIDTH)
                } else {
                    cell.clone()
                }
            }));
        }

        let mut table = builder.build();

        if config.compact {
            table.with(Style::blank());
        } else {
            table.with(Style::rounded());
        }

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_key_value_table() {
        let pairs = vec![("Stitches", "12".to_string()), ("Edges", "19".to_string())];

        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let output = TableOutput::format_key_value(&pairs, &config);

        assert!(output.contains("Stitches"));
        assert!(output.contains("19"));
    }

    #[test]
    fn test_from_rows() {
        let headers = vec!["Pattern", "Error"];
        let rows = vec![
            vec!["garter".to_string(), "-".to_string()],
            vec!["broken".to_string(), "Unknown stitch 'xyz'".to_string()],
        ];

        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let output = TableOutput::from_rows(&headers, &rows, &config);

        assert!(output.contains("Pattern"));
        assert!(output.contains("broken"));
        assert!(output.contains("Unknown stitch 'xyz'"));
    }

    #[test]
    fn test_empty_rows() {
        let config = OutputConfig::new(OutputFormat::Table);
        assert_eq!(TableOutput::from_rows(&["A"], &[], &config), "(no results)");
    }
}
