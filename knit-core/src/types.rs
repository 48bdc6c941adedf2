//! Data models shared by the loader, the builder and the exporters.
//!
//! Stitches are plain integer ids handed out in creation order, so a graph
//! is nothing more than a stitch count plus an append-only edge list.

use serde::{Deserialize, Serialize};

/// Identifier of a stitch. Assigned once, never reused.
pub type StitchId = usize;

/// Named stitch operation from the technique table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    /// Display character for the technique.
    pub character: String,
    /// Stitches consumed from the left needle.
    pub kill: usize,
    /// Stitches created on the right needle.
    pub add: usize,
    /// Whether applying the technique turns the work (swaps needles).
    pub cursor_dir: bool,
}

impl Technique {
    pub fn new(character: impl Into<String>, kill: usize, add: usize, cursor_dir: bool) -> Self {
        Self {
            character: character.into(),
            kill,
            add,
            cursor_dir,
        }
    }
}

/// Class of a structural relation between two stitches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Same-row adjacency.
    Horizontal,
    /// Parent/child lineage, including cable crossings.
    Vertical,
}

/// Weight attached to each edge class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeWeights {
    pub horizontal: f64,
    pub vertical: f64,
}

impl EdgeWeights {
    pub const HORIZONTAL: f64 = 1.0;
    pub const VERTICAL: f64 = 1.5;

    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn for_kind(&self, kind: EdgeKind) -> f64 {
        match kind {
            EdgeKind::Horizontal => self.horizontal,
            EdgeKind::Vertical => self.vertical,
        }
    }
}

impl Default for EdgeWeights {
    fn default() -> Self {
        Self::new(Self::HORIZONTAL, Self::VERTICAL)
    }
}

/// Undirected, weighted relation between two stitches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: StitchId,
    pub target: StitchId,
    pub weight: f64,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn horizontal(source: StitchId, target: StitchId, weights: &EdgeWeights) -> Self {
        Self {
            source,
            target,
            weight: weights.horizontal,
            kind: EdgeKind::Horizontal,
        }
    }

    pub fn vertical(source: StitchId, target: StitchId, weights: &EdgeWeights) -> Self {
        Self {
            source,
            target,
            weight: weights.vertical,
            kind: EdgeKind::Vertical,
        }
    }

    /// Endpoints as a tuple, handy for assertions and lookups.
    pub fn endpoints(&self) -> (StitchId, StitchId) {
        (self.source, self.target)
    }

    /// Whether this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: StitchId, b: StitchId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// A single pattern token with the line it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 1-based line number in the pattern text.
    pub line: usize,
    pub symbol: String,
}

impl Token {
    pub fn new(line: usize, symbol: impl Into<String>) -> Self {
        Self {
            line,
            symbol: symbol.into(),
        }
    }
}

/// Result of building one pattern: every stitch created and how they relate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StitchGraph {
    /// Number of stitches created; ids run from 0 to `count - 1`.
    pub count: usize,
    pub edges: Vec<Edge>,
}

impl StitchGraph {
    pub fn new(count: usize, edges: Vec<Edge>) -> Self {
        Self { count, edges }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = EdgeWeights::default();
        assert_eq!(weights.horizontal, 1.0);
        assert_eq!(weights.vertical, 1.5);
        assert_eq!(weights.for_kind(EdgeKind::Vertical), 1.5);
    }

    #[test]
    fn test_edge_connects_either_direction() {
        let edge = Edge::vertical(2, 5, &EdgeWeights::default());
        assert!(edge.connects(2, 5));
        assert!(edge.connects(5, 2));
        assert!(!edge.connects(2, 4));
    }

    #[test]
    fn test_edge_serialization() {
        let edge = Edge::horizontal(1, 0, &EdgeWeights::default());
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"kind\":\"horizontal\""));
        assert!(json.contains("\"weight\":1.0"));
    }
}
