//! Output formatting module for the knit CLI
//!
//! Every command result renders either as a human-readable table or as JSON
//! for machine consumption. Colors and truncation adapt to whether stdout is
//! a TTY.

use clap::ValueEnum;
use serde::Serialize;
use std::io::IsTerminal;
use std::str::FromStr;

mod json;
mod table;

pub use self::json::JsonOutput;
pub use self::table::TableOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Disable truncation of long values
    pub no_truncate: bool,
    /// Override terminal width (None = auto-detect)
    pub width: Option<usize>,
    /// Compact mode (less whitespace)
    pub compact: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_truncate: false,
            width: None,
            compact: false,
        }
    }

    /// Create an OutputConfig with automatic TTY detection
    ///
    /// When output is not a TTY (piped or redirected), truncation is disabled.
    pub fn auto_detect(format: OutputFormat) -> Self {
        Self {
            no_truncate: !std::io::stdout().is_terminal(),
            ..Self::new(format)
        }
    }

    /// Get the effective terminal width
    pub fn effective_width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            terminal_size::terminal_size()
                .map(|(w, _)| w.0 as usize)
                .unwrap_or(80)
        })
    }

    pub fn should_truncate(&self) -> bool {
        !self.no_truncate
    }

    /// Builder: disable truncation
    pub fn without_truncation(mut self) -> Self {
        self.no_truncate = true;
        self
    }

    /// Builder: enable compact mode
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// TTY-detected config with the global `--no-truncate` / `--compact` flags applied
    pub fn from_flags(format: OutputFormat, no_truncate: bool, compact: bool) -> Self {
        let mut config = Self::auto_detect(format);
        if no_truncate {
            config = config.without_truncation();
        }
        if compact {
            config = config.compact();
        }
        config
    }
}

/// Trait for command results that can be displayed as a table
///
/// JSON rendering comes from `Serialize`.
pub trait TableDisplay: Serialize {
    fn to_table(&self, config: &OutputConfig) -> String;
}

/// Result wrapper for formatted output with automatic format selection
pub struct Output<T> {
    data: T,
    config: OutputConfig,
}

impl<T: TableDisplay> Output<T> {
    pub fn with_config(data: T, config: &OutputConfig) -> Self {
        Self {
            data,
            config: config.clone(),
        }
    }

    /// Get the rendered string without printing
    pub fn render_to_string(&self) -> String {
        match self.config.format {
            OutputFormat::Table => self.data.to_table(&self.config),
            OutputFormat::Json => JsonOutput::format(&self.data, &self.config),
        }
    }

    /// Render the output to stdout
    pub fn render(&self) -> anyhow::Result<()> {
        println!("{}", self.render_to_string());
        Ok(())
    }
}

// ============================================================================
// Built-in message types
// ============================================================================

/// Simple success message
#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TableDisplay for SuccessMessage {
    fn to_table(&self, _config: &OutputConfig) -> String {
        use colored::Colorize;
        format!("{} {}", "SUCCESS:".green().bold(), self.message)
    }
}

/// Simple error message
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorMessage {
    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl TableDisplay for ErrorMessage {
    fn to_table(&self, _config: &OutputConfig) -> String {
        use colored::Colorize;
        let mut output = format!("{} {}", "ERROR:".red().bold(), self.message);
        if let Some(details) = &self.details {
            output.push_str(&format!("\n{}", details.dimmed()));
        }
        output
    }
}

/// Truncate a string to a maximum width with ellipsis
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let truncated: String = s.chars().take(max_width - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_config_from_flags() {
        let config = OutputConfig::from_flags(OutputFormat::Json, true, true);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.should_truncate());
        assert!(config.compact);

        let config = OutputConfig::from_flags(OutputFormat::Table, false, false);
        assert!(!config.compact);
    }

    #[test]
    fn test_success_message_json() {
        let config = OutputConfig::new(OutputFormat::Json);
        let output = Output::with_config(SuccessMessage::new("done"), &config);
        assert!(output.render_to_string().contains("\"message\": \"done\""));
    }

    #[test]
    fn test_compact_flag_minifies_json() {
        let config = OutputConfig::from_flags(OutputFormat::Json, false, true);
        let output = Output::with_config(SuccessMessage::new("done"), &config);
        assert_eq!(output.render_to_string(), r#"{"message":"done"}"#);
    }

    #[test]
    fn test_error_message_table() {
        colored::control::set_override(false);
        let config = OutputConfig::new(OutputFormat::Table);
        let output = Output::with_config(ErrorMessage::with_details("failed", "line 3"), &config);
        assert_eq!(output.render_to_string(), "ERROR: failed\nline 3");
    }
}
