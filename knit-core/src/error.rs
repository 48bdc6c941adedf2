//! Error types for knit-core.

use thiserror::Error;

/// Result type alias for knit-core operations.
pub type Result<T> = std::result::Result<T, KnitError>;

/// Errors that can occur while loading techniques or building stitch graphs.
#[derive(Error, Debug)]
pub enum KnitError {
    /// Technique definition source is malformed.
    ///
    /// Fatal at load time: no pattern can be processed without a table.
    #[error("Technique parse error: {message}")]
    Parse {
        /// Description of what was wrong with the source.
        message: String,
    },

    /// A pattern token is neither a known technique nor cable-shaped.
    #[error("Unknown stitch '{symbol}' on line {line}")]
    UnknownSymbol {
        /// The offending token.
        symbol: String,
        /// 1-based line of the pattern the token came from.
        line: usize,
    },

    /// A stitch had to be consumed but no live stitch was left.
    #[error("No stitch left to consume for '{symbol}' on line {line}")]
    Consumption {
        /// The token that requested the consumption.
        symbol: String,
        /// 1-based line of the pattern the token came from.
        line: usize,
    },

    /// Graph document could not be converted to the node-link schema.
    #[error("Conversion error: {message}")]
    Convert {
        /// Description of the conversion failure.
        message: String,
    },

    /// IO error reading pattern or technique files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error reading or writing graph documents.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KnitError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        KnitError::Parse {
            message: message.into(),
        }
    }

    /// The offending symbol, for errors raised while building a pattern.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            KnitError::UnknownSymbol { symbol, .. } | KnitError::Consumption { symbol, .. } => {
                Some(symbol)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KnitError::UnknownSymbol {
            symbol: "xyz".to_string(),
            line: 3,
        };
        assert!(err.to_string().contains("xyz"));
        assert!(err.to_string().contains('3'));
        assert_eq!(err.symbol(), Some("xyz"));

        let err = KnitError::parse("missing field 'kill'");
        assert!(err.to_string().contains("kill"));
        assert_eq!(err.symbol(), None);
    }
}
