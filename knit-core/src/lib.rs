//! Knit Core - knitting pattern to stitch graph engine.
//!
//! Interprets a knitting pattern (rows of stitch symbols) by simulating two
//! needles, and produces the fabric as an undirected weighted graph: one node
//! per stitch, horizontal edges between neighbours on a row and vertical
//! edges from each consumed stitch to the stitches worked into it.
//!
//! # Features
//!
//! - **Technique tables**: stitch definitions loaded from a mapping literal
//! - **Cables**: `c<N><letter>` crossings without table entries
//! - **Exporters**: Graphviz DOT, adjacency matrix, JSON node/edge documents
//! - **Batch builds**: parallel, failure-isolated builds with Rayon
//! - **Analysis**: petgraph-backed fabric statistics
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use knit_core::{GraphBuilder, TechniqueTable};
//!
//! let table = TechniqueTable::load(Path::new("stitches.txt"))?;
//! let graph = GraphBuilder::new(&table).build_text("co co co\nturn k k k")?;
//! println!("{}", knit_core::exporter::dot::export(&graph));
//! # Ok::<(), knit_core::KnitError>(())
//! ```

pub mod batch;
pub mod builder;
pub mod cable;
pub mod convert;
pub mod error;
pub mod exporter;
pub mod graph;
pub mod grid;
pub mod pattern;
pub mod scanner;
pub mod technique;
pub mod types;
pub mod vocabulary;

pub use builder::{GraphBuilder, NeedleState};
pub use error::{KnitError, Result};
pub use graph::FabricGraph;
pub use technique::TechniqueTable;
pub use types::{Edge, EdgeKind, EdgeWeights, StitchGraph, StitchId, Technique, Token};
