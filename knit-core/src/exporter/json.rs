//! JSON node/edge document exporter.
//!
//! The document is the hand-off format for tools that work on whole graphs:
//! a layout tool fills in `x`/`y`, the converter turns it into a node-link
//! document.

use serde::{Deserialize, Serialize};

use crate::types::{StitchGraph, StitchId};

/// A stitch, optionally placed in the plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: StitchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: StitchId,
    pub target: StitchId,
    pub weight: f64,
}

/// Node/edge collections of one stitch graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    pub fn from_graph(graph: &StitchGraph) -> Self {
        Self {
            nodes: (0..graph.count)
                .map(|id| NodeRecord { id, x: None, y: None })
                .collect(),
            edges: graph
                .edges
                .iter()
                .map(|e| EdgeRecord {
                    source: e.source,
                    target: e.target,
                    weight: e.weight,
                })
                .collect(),
        }
    }
}

/// Export a stitch graph as a JSON node/edge document.
pub fn export(graph: &StitchGraph, pretty: bool) -> Result<String, serde_json::Error> {
    let document = GraphDocument::from_graph(graph);
    if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
}
