//! Graph exporters.
//!
//! Pure serialization of a built [`StitchGraph`](crate::types::StitchGraph):
//! - `dot`: undirected Graphviz text, one line per edge
//! - `matrix`: dense symmetric adjacency indicator, optionally as CSV
//! - `json`: node/edge document consumed by layout and conversion tools

pub mod dot;
pub mod json;
pub mod matrix;
