//! Configuration loading from `.knitrc.toml`.
//!
//! Configuration is optional: without a config file every command runs on
//! defaults, and command-line flags override whatever the file sets.
//!
//! # Example Configuration
//!
//! ```toml
//! [techniques]
//! path = "stitches.txt"
//!
//! [weights]
//! horizontal = 1.0
//! vertical = 1.5
//!
//! [batch]
//! threads = 4
//! extensions = ["txt"]
//! ignore = ["drafts/"]
//!
//! [output]
//! dot_dir = "dot"
//! matrix_dir = "matrices"
//! json_dir = "json"
//! format = "table"
//! color = true
//! ```

use knit_core::EdgeWeights;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".knitrc.toml";

/// Root configuration structure loaded from `.knitrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct KnitConfig {
    #[serde(default)]
    pub techniques: TechniquesConfig,

    #[serde(default)]
    pub weights: WeightsConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Where technique definitions come from.
#[derive(Debug, Deserialize)]
pub struct TechniquesConfig {
    /// Technique definition file, relative to the working directory.
    #[serde(default = "default_techniques_path")]
    pub path: String,
}

fn default_techniques_path() -> String {
    "stitches.txt".to_string()
}

impl Default for TechniquesConfig {
    fn default() -> Self {
        Self {
            path: default_techniques_path(),
        }
    }
}

/// Edge weights written to exported graphs.
///
/// Previously exported graphs used 1 and 1.5; change these only if every
/// consumer of the exports agrees.
#[derive(Debug, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_horizontal")]
    pub horizontal: f64,

    #[serde(default = "default_vertical")]
    pub vertical: f64,
}

fn default_horizontal() -> f64 {
    EdgeWeights::HORIZONTAL
}

fn default_vertical() -> f64 {
    EdgeWeights::VERTICAL
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            horizontal: default_horizontal(),
            vertical: default_vertical(),
        }
    }
}

/// Batch build settings.
#[derive(Debug, Deserialize)]
pub struct BatchConfig {
    /// Worker threads. Unset uses one per CPU.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Extensions of pattern files. An empty list treats every file as a pattern.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns to skip, on top of `.gitignore` and `.knitignore`.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: None,
            extensions: default_extensions(),
            ignore: Vec::new(),
        }
    }
}

/// Output directories and formatting preferences.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(default)]
    pub dot_dir: Option<String>,

    #[serde(default)]
    pub matrix_dir: Option<String>,

    #[serde(default)]
    pub json_dir: Option<String>,

    /// Default output format for CLI commands (`table` or `json`).
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

impl KnitConfig {
    /// Load configuration from `.knitrc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILENAME);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILENAME, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILENAME, e);
                }
            }
        }
        Self::default()
    }

    /// Technique file, with a command-line override taking precedence.
    pub fn techniques_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.techniques.path))
    }

    pub fn edge_weights(&self) -> EdgeWeights {
        EdgeWeights::new(self.weights.horizontal, self.weights.vertical)
    }

    pub fn threads(&self) -> Option<usize> {
        self.batch.threads
    }

    pub fn extensions(&self) -> &[String] {
        &self.batch.extensions
    }

    pub fn ignore_patterns(&self) -> &[String] {
        &self.batch.ignore
    }

    pub fn dot_dir(&self) -> &str {
        self.output.dot_dir.as_deref().unwrap_or("dot")
    }

    pub fn matrix_dir(&self) -> &str {
        self.output.matrix_dir.as_deref().unwrap_or("matrices")
    }

    pub fn json_dir(&self) -> &str {
        self.output.json_dir.as_deref().unwrap_or("json")
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured color setting, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
