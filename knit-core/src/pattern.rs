//! Pattern tokenizer.
//!
//! A pattern is plain text, one row per line, symbols separated by
//! whitespace. Token order is row order, so nothing here reorders or
//! validates; that is the builder's job.

use crate::types::Token;

/// Split pattern text into line-tagged tokens, skipping blank lines.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.lines()
        .enumerate()
        .flat_map(|(idx, line)| {
            line.split_whitespace()
                .map(move |symbol| Token::new(idx + 1, symbol))
        })
        .collect()
}

/// Number of non-blank rows in a pattern.
pub fn row_count(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}
