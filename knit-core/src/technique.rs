//! Technique table loader.
//!
//! Parses a mapping literal of the form
//!
//! ```text
//! {
//!     'k':    {'character': 'k', 'kill': 1, 'add': 1, 'cursor_dir': False},
//!     'turn': {'character': 't', 'kill': 0, 'add': 0, 'cursor_dir': True},
//! }
//! ```
//!
//! JSON spelling (double quotes, `true`/`false`) is accepted as well. The
//! grammar lives in `technique.pest`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::{debug, warn};

use crate::error::{KnitError, Result};
use crate::types::Technique;

/// Upper bound on `kill` and `add` of a single technique.
pub const MAX_STITCH_COUNT: usize = 1024;

#[derive(Parser)]
#[grammar = "technique.pest"]
struct TechniqueParser;

/// Literal value on the right-hand side of a technique field.
#[derive(Debug)]
enum Literal {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Immutable mapping from pattern symbol to technique.
#[derive(Clone, Debug, Default)]
pub struct TechniqueTable {
    techniques: BTreeMap<String, Technique>,
}

impl TechniqueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from already-validated entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Technique)>,
        S: Into<String>,
    {
        Self {
            techniques: entries
                .into_iter()
                .map(|(symbol, technique)| (symbol.into(), technique))
                .collect(),
        }
    }

    /// Parse a technique definition source.
    ///
    /// A source that is empty or holds only comments yields an empty table.
    pub fn parse(source: &str) -> Result<Self> {
        let is_blank = source
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if is_blank {
            return Ok(Self::default());
        }

        let mut pairs = TechniqueParser::parse(Rule::table, source)
            .map_err(|e| KnitError::parse(e.to_string()))?;
        let table_pair = pairs
            .next()
            .ok_or_else(|| KnitError::parse("Empty technique source"))?;

        let mut techniques = BTreeMap::new();
        for entry in table_pair.into_inner() {
            if entry.as_rule() != Rule::entry {
                continue;
            }
            let (symbol, technique) = parse_entry(entry)?;
            if techniques.contains_key(&symbol) {
                return Err(KnitError::parse(format!(
                    "Duplicate technique '{}'",
                    symbol
                )));
            }
            techniques.insert(symbol, technique);
        }

        debug!("Loaded {} techniques", techniques.len());
        Ok(Self { techniques })
    }

    /// Load a technique table from a file.
    ///
    /// A missing file is not an error: it yields an empty table, which makes
    /// every pattern symbol unknown.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Technique file {} not found, using an empty table",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Technique> {
        self.techniques.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.techniques.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.techniques.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Technique)> {
        self.techniques.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn parse_entry(pair: Pair<Rule>) -> Result<(String, Technique)> {
    let mut inner = pair.into_inner();
    let symbol = inner
        .next()
        .map(string_content)
        .ok_or_else(|| KnitError::parse("Technique entry without a symbol"))?;
    let record = inner
        .next()
        .ok_or_else(|| KnitError::parse(format!("Technique '{}' has no fields", symbol)))?;

    let mut character = None;
    let mut kill = None;
    let mut add = None;
    let mut cursor_dir = None;

    for field in record.into_inner() {
        let mut parts = field.into_inner();
        let name = parts.next().map(string_content).unwrap_or_default();
        let value = match parts.next() {
            Some(v) => parse_value(v)?,
            None => {
                return Err(KnitError::parse(format!(
                    "Field '{}' of technique '{}' has no value",
                    name, symbol
                )))
            }
        };

        match name.as_str() {
            "character" => character = Some(expect_string(&symbol, &name, value)?),
            "kill" => kill = Some(expect_count(&symbol, &name, value)?),
            "add" => add = Some(expect_count(&symbol, &name, value)?),
            "cursor_dir" => cursor_dir = Some(expect_bool(&symbol, &name, value)?),
            other => debug!("Ignoring field '{}' of technique '{}'", other, symbol),
        }
    }

    let missing = |field: &str| {
        KnitError::parse(format!(
            "Technique '{}' is missing field '{}'",
            symbol, field
        ))
    };
    let technique = Technique {
        character: character.ok_or_else(|| missing("character"))?,
        kill: kill.ok_or_else(|| missing("kill"))?,
        add: add.ok_or_else(|| missing("add"))?,
        cursor_dir: cursor_dir.ok_or_else(|| missing("cursor_dir"))?,
    };

    Ok((symbol, technique))
}

fn string_content(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| unescape(p.as_str()))
        .unwrap_or_default()
}

/// Resolve backslash escapes. Unknown escapes keep their backslash.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(escaped @ ('\\' | '\'' | '"')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_value(pair: Pair<Rule>) -> Result<Literal> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| KnitError::parse("Empty value"))?;

    match inner.as_rule() {
        Rule::string => Ok(Literal::Str(string_content(inner))),
        Rule::integer => {
            let text = inner.as_str();
            text.parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| KnitError::parse(format!("Invalid integer '{}'", text)))
        }
        Rule::boolean => {
            let is_true = inner
                .into_inner()
                .next()
                .map(|b| b.as_rule() == Rule::TRUE)
                .unwrap_or(false);
            Ok(Literal::Bool(is_true))
        }
        other => Err(KnitError::parse(format!("Unexpected value: {:?}", other))),
    }
}

fn expect_string(symbol: &str, field: &str, value: Literal) -> Result<String> {
    match value {
        Literal::Str(s) => Ok(s),
        other => Err(KnitError::parse(format!(
            "Field '{}' of technique '{}' must be a string, got {:?}",
            field, symbol, other
        ))),
    }
}

fn expect_count(symbol: &str, field: &str, value: Literal) -> Result<usize> {
    match value {
        Literal::Int(n) if n > MAX_STITCH_COUNT as i64 => Err(KnitError::parse(format!(
            "Field '{}' of technique '{}' is {}, more than the limit of {}",
            field, symbol, n, MAX_STITCH_COUNT
        ))),
        Literal::Int(n) if n >= 0 => Ok(n as usize),
        other => Err(KnitError::parse(format!(
            "Field '{}' of technique '{}' must be a non-negative integer, got {:?}",
            field, symbol, other
        ))),
    }
}

fn expect_bool(symbol: &str, field: &str, value: Literal) -> Result<bool> {
    match value {
        Literal::Bool(b) => Ok(b),
        other => Err(KnitError::parse(format!(
            "Field '{}' of technique '{}' must be a boolean, got {:?}",
            field, symbol, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYTHON_SOURCE: &str = r#"
# basic stitches
{
    'co': {'character': 'co', 'kill': 0, 'add': 1, 'cursor_dir': False},
    'k': {'character': 'k', 'kill': 1, 'add': 1, 'cursor_dir': False},
    'k2tog': {'character': 'k2tog', 'kill': 2, 'add': 1, 'cursor_dir': False},
    'turn': {'character': 't', 'kill': 0, 'add': 0, 'cursor_dir': True},
}
"#;

    #[test]
    fn test_parse_python_literal() {
        let table = TechniqueTable::parse(PYTHON_SOURCE).unwrap();
        assert_eq!(table.len(), 4);

        let k2tog = table.get("k2tog").unwrap();
        assert_eq!(k2tog.kill, 2);
        assert_eq!(k2tog.add, 1);
        assert!(!k2tog.cursor_dir);

        assert!(table.get("turn").unwrap().cursor_dir);
        assert_eq!(
            table.symbols().collect::<Vec<_>>(),
            vec!["co", "k", "k2tog", "turn"]
        );
    }

    #[test]
    fn test_parse_json_spelling() {
        let source = r#"{"kfb": {"character": "kfb", "kill": 1, "add": 2, "cursor_dir": false}}"#;
        let table = TechniqueTable::parse(source).unwrap();
        assert_eq!(table.get("kfb").unwrap().add, 2);
    }

    #[test]
    fn test_escaped_quotes_in_strings() {
        let source = r#"{'k\'s': {'character': 'it\'s', 'kill': 1, 'add': 1, 'cursor_dir': False},
                         "q\"": {"character": "back\\slash", "kill": 1, "add": 1, "cursor_dir": false}}"#;
        let table = TechniqueTable::parse(source).unwrap();
        assert_eq!(table.get("k's").unwrap().character, "it's");
        assert_eq!(table.get("q\"").unwrap().character, "back\\slash");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"plain"), "plain");
        assert_eq!(unescape(r"a\tb"), "a\tb");
        assert_eq!(unescape(r"\d"), r"\d");
    }

    #[test]
    fn test_empty_source_is_empty_table() {
        assert!(TechniqueTable::parse("").unwrap().is_empty());
        assert!(TechniqueTable::parse("  \n# nothing here\n").unwrap().is_empty());
        assert!(TechniqueTable::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let source = "{'k': {'character': 'k', 'kill': 1, 'cursor_dir': False}}";
        let err = TechniqueTable::parse(source).unwrap_err();
        assert!(matches!(err, KnitError::Parse { .. }));
        assert!(err.to_string().contains("add"));
    }

    #[test]
    fn test_negative_count_is_parse_error() {
        let source = "{'k': {'character': 'k', 'kill': -1, 'add': 1, 'cursor_dir': False}}";
        let err = TechniqueTable::parse(source).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_oversized_count_is_parse_error() {
        let source = "{'k': {'character': 'k', 'kill': 1, 'add': 4611686018427387904, 'cursor_dir': False}}";
        let err = TechniqueTable::parse(source).unwrap_err();
        assert!(matches!(err, KnitError::Parse { .. }));
        assert!(err.to_string().contains("limit"));

        let source = "{'k': {'character': 'k', 'kill': 1, 'add': 1024, 'cursor_dir': False}}";
        assert_eq!(TechniqueTable::parse(source).unwrap().get("k").unwrap().add, 1024);
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let source = "{'k': {'character': 'k', 'kill': '1', 'add': 1, 'cursor_dir': False}}";
        assert!(TechniqueTable::parse(source).is_err());
    }

    #[test]
    fn test_not_a_mapping_is_parse_error() {
        assert!(TechniqueTable::parse("['k', 'p']").is_err());
        assert!(TechniqueTable::parse("{'k': 1}").is_err());
    }

    #[test]
    fn test_duplicate_symbol_is_parse_error() {
        let source = "{'k': {'character': 'k', 'kill': 1, 'add': 1, 'cursor_dir': False}, \
                      'k': {'character': 'k', 'kill': 1, 'add': 1, 'cursor_dir': False}}";
        let err = TechniqueTable::parse(source).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let source = "{'k': {'character': 'k', 'kill': 1, 'add': 1, 'cursor_dir': False, 'note': 'knit'}}";
        let table = TechniqueTable::parse(source).unwrap();
        assert_eq!(table.get("k").unwrap().character, "k");
    }

    #[test]
    fn test_load_missing_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = TechniqueTable::load(&dir.path().join("nope.txt")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stitches.txt");
        std::fs::write(&path, PYTHON_SOURCE).unwrap();
        let table = TechniqueTable::load(&path).unwrap();
        assert!(table.contains("co"));
    }
}
