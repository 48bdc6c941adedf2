//! Pattern file discovery using the `ignore` crate.
//!
//! Walks a directory (gitignore aware, plus `.knitignore` files), keeps files
//! with a pattern extension and records size, content hash and row count for
//! each. Files are read in parallel with rayon.

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{KnitError, Result};
use crate::pattern;

/// Per-directory ignore file honoured in addition to `.gitignore`.
pub const IGNORE_FILENAME: &str = ".knitignore";

/// Options for [`scan_patterns`].
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Extensions treated as pattern files (without the dot). Empty = all files.
    pub extensions: Vec<String>,
    /// Extra glob patterns to exclude.
    pub ignore_patterns: Vec<String>,
    pub follow_symlinks: bool,
}

/// A discovered pattern file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScannedPattern {
    /// Path relative to the scan root.
    pub path: String,

    /// Pattern name, taken from the file stem.
    pub name: String,

    #[serde(skip)]
    pub full_path: PathBuf,

    pub size_bytes: u64,

    /// xxHash3 of the content.
    pub hash: String,

    /// Physical lines.
    pub lines: usize,

    /// Non-blank lines.
    pub rows: usize,
}

/// Result of scanning a directory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub patterns: Vec<ScannedPattern>,
    pub skipped_count: usize,
    pub error_count: usize,
    pub duration_ms: f64,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn content_hash(content: &[u8]) -> String {
    format!("xxh3:{:016x}", xxh3_64(content))
}

/// Physical line count; a final line without a newline still counts.
fn count_lines(content: &[u8]) -> usize {
    let newlines = bytecount::count(content, b'\n');
    match content.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

fn pattern_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn read_pattern(root: &Path, path: &Path) -> io::Result<ScannedPattern> {
    let content = fs::read(path)?;
    let rel_path = match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    };

    Ok(ScannedPattern {
        path: rel_path.to_string_lossy().to_string(),
        name: pattern_name(path),
        full_path: path.to_path_buf(),
        size_bytes: content.len() as u64,
        hash: content_hash(&content),
        lines: count_lines(&content),
        rows: pattern::row_count(&String::from_utf8_lossy(&content)),
    })
}

/// Scan `root` for pattern files. A file root yields that single file.
pub fn scan_patterns(root: &Path, options: &ScanOptions) -> Result<ScanResult> {
    let start = Instant::now();

    if !root.exists() {
        return Err(KnitError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Path does not exist: {}", root.display()),
        )));
    }

    let ext_filter: HashSet<String> = options
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .git_global(false)
        .git_exclude(true)
        .follow_links(options.follow_symlinks)
        .add_custom_ignore_filename(IGNORE_FILENAME);

    if !options.ignore_patterns.is_empty() {
        let mut override_builder = ignore::overrides::OverrideBuilder::new(root);
        for pattern in &options.ignore_patterns {
            if let Err(e) = override_builder.add(&format!("!{}", pattern)) {
                warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }
        match override_builder.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => warn!("Ignoring extra ignore patterns: {}", e),
        }
    }

    let skipped = AtomicUsize::new(0);
    let errors = AtomicUsize::new(0);

    let files: Vec<PathBuf> = builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Walk error: {}", e);
                errors.fetch_add(1, Ordering::Relaxed);
                None
            }
        })
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .collect();

    let mut patterns: Vec<ScannedPattern> = files
        .par_iter()
        .filter(|path| {
            if ext_filter.is_empty() {
                return true;
            }
            let keep = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| ext_filter.contains(&e.to_lowercase()))
                .unwrap_or(false);
            if !keep {
                skipped.fetch_add(1, Ordering::Relaxed);
            }
            keep
        })
        .filter_map(|path| match read_pattern(root, path) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                errors.fetch_add(1, Ordering::Relaxed);
                None
            }
        })
        .collect();

    patterns.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ScanResult {
        patterns,
        skipped_count: skipped.load(Ordering::Relaxed),
        error_count: errors.load(Ordering::Relaxed),
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        File::create(dir.path().join("garter.txt"))
            .unwrap()
            .write_all(b"co co co\n\nturn k k k\n")
            .unwrap();

        File::create(dir.path().join("notes.md"))
            .unwrap()
            .write_all(b"# Notes\n")
            .unwrap();

        fs::create_dir(dir.path().join("cables")).unwrap();
        File::create(dir.path().join("cables/braid.txt"))
            .unwrap()
            .write_all(b"co co co co\nturn c4c")
            .unwrap();

        File::create(dir.path().join(".gitignore"))
            .unwrap()
            .write_all(b"*.log\n")
            .unwrap();

        File::create(dir.path().join("build.log"))
            .unwrap()
            .write_all(b"log data\n")
            .unwrap();

        dir
    }

    fn txt_only() -> ScanOptions {
        ScanOptions {
            extensions: vec![".txt".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_scan_with_extension_filter() {
        let dir = create_test_dir();
        let result = scan_patterns(dir.path(), &txt_only()).unwrap();

        let names: Vec<&str> = result.patterns.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["braid", "garter"]);
        assert_eq!(result.error_count, 0);
        assert!(result.skipped_count >= 1);
    }

    #[test]
    fn test_scan_records_metadata() {
        let dir = create_test_dir();
        let result = scan_patterns(dir.path(), &txt_only()).unwrap();
        let garter = result.patterns.iter().find(|p| p.name == "garter").unwrap();

        assert_eq!(garter.path, "garter.txt");
        assert_eq!(garter.size_bytes, 21);
        assert_eq!(garter.lines, 3);
        assert_eq!(garter.rows, 2);
        assert!(garter.hash.starts_with("xxh3:"));

        let braid = result.patterns.iter().find(|p| p.name == "braid").unwrap();
        assert_eq!(braid.lines, 2);
    }

    #[test]
    fn test_scan_gitignore_respected() {
        let dir = create_test_dir();
        let result = scan_patterns(dir.path(), &ScanOptions::default()).unwrap();

        assert!(!result.patterns.iter().any(|p| p.path.contains("build.log")));
        assert!(result.patterns.iter().any(|p| p.path.ends_with("notes.md")));
    }

    #[test]
    fn test_scan_knitignore() {
        let dir = create_test_dir();
        File::create(dir.path().join(IGNORE_FILENAME))
            .unwrap()
            .write_all(b"cables/\n")
            .unwrap();

        let result = scan_patterns(dir.path(), &txt_only()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.patterns[0].name, "garter");
    }

    #[test]
    fn test_scan_extra_ignore_patterns() {
        let dir = create_test_dir();
        let options = ScanOptions {
            ignore_patterns: vec!["*.md".to_string()],
            ..txt_only()
        };
        let result = scan_patterns(dir.path(), &options).unwrap();
        assert!(!result.patterns.iter().any(|p| p.path.ends_with(".md")));
    }

    #[test]
    fn test_scan_single_file() {
        let dir = create_test_dir();
        let file = dir.path().join("garter.txt");
        let result = scan_patterns(&file, &ScanOptions::default()).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.patterns[0].name, "garter");
        assert_eq!(result.patterns[0].path, "garter.txt");
        assert_eq!(result.patterns[0].full_path, file);
    }

    #[test]
    fn test_scan_nonexistent() {
        let result = scan_patterns(
            Path::new("/nonexistent/path/that/does/not/exist"),
            &ScanOptions::default(),
        );
        assert!(matches!(result, Err(KnitError::Io(_))));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = scan_patterns(dir.path(), &ScanOptions::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"a\nb\n"), 2);
        assert_eq!(count_lines(b"a\nb"), 2);
    }
}
