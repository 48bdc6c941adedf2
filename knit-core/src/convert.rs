//! Node-link document conversion.
//!
//! Turns a laid-out node/edge document (see [`crate::exporter::json`]) into
//! the node-link layout consumed by graph tooling: string ids, a `links`
//! array and a fixed header describing an undirected simple graph.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KnitError, Result};
use crate::exporter::json::GraphDocument;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAttributes {
    pub node_default: serde_json::Map<String, serde_json::Value>,
    pub edge_default: serde_json::Map<String, serde_json::Value>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Node-link graph document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: GraphAttributes,
    pub nodes: Vec<LinkNode>,
    pub links: Vec<Link>,
}

impl NodeLinkDocument {
    /// Convert a node/edge document. Every node must carry coordinates.
    pub fn from_document(document: &GraphDocument) -> Result<Self> {
        let nodes = document
            .nodes
            .iter()
            .map(|node| match (node.x, node.y) {
                (Some(x), Some(y)) => Ok(LinkNode {
                    id: node.id.to_string(),
                    x,
                    y,
                }),
                _ => Err(KnitError::Convert {
                    message: format!("Node {} has no coordinates; run a layout first", node.id),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        let links = document
            .edges
            .iter()
            .enumerate()
            .map(|(seq, edge)| Link {
                id: seq.to_string(),
                source: edge.source.to_string(),
                target: edge.target.to_string(),
                weight: edge.weight,
            })
            .collect();

        Ok(Self {
            directed: false,
            multigraph: false,
            graph: GraphAttributes {
                name: "G".to_string(),
                ..Default::default()
            },
            nodes,
            links,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Convert node/edge JSON text to compact node-link JSON text.
pub fn convert_str(input: &str) -> Result<String> {
    let document: GraphDocument = serde_json::from_str(input)?;
    let converted = NodeLinkDocument::from_document(&document)?;
    debug!(
        "Converted {} nodes and {} links",
        converted.nodes.len(),
        converted.links.len()
    );
    converted.to_json()
}

/// Convert the document at `input` and write the result to `output`.
pub fn convert_file(input: &Path, output: &Path) -> Result<NodeLinkDocument> {
    let content = fs::read_to_string(input)?;
    let document: GraphDocument = serde_json::from_str(&content)?;
    let converted = NodeLinkDocument::from_document(&document)?;
    fs::write(output, converted.to_json()?)?;
    Ok(converted)
}
