//! Fabric analysis view powered by petgraph.
//!
//! Loads a built [`StitchGraph`] into an undirected petgraph graph so the
//! fabric can be inspected: degrees, neighbours, loose stitches and how many
//! disconnected pieces the pattern produced.
//!
//! Node indices equal stitch ids, since every stitch `0..count` is inserted
//! in order before any edge.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::types::{EdgeKind, StitchGraph, StitchId};

/// Undirected stitch graph with edge kinds as weights.
pub struct FabricGraph {
    graph: UnGraph<StitchId, EdgeKind>,
}

impl FabricGraph {
    pub fn from_stitch_graph(stitches: &StitchGraph) -> Self {
        let mut graph = UnGraph::with_capacity(stitches.count, stitches.edges.len());

        for id in 0..stitches.count {
            graph.add_node(id);
        }

        // Skip edges pointing outside the allocated range
        for edge in &stitches.edges {
            if edge.source < stitches.count && edge.target < stitches.count {
                graph.add_edge(
                    NodeIndex::new(edge.source),
                    NodeIndex::new(edge.target),
                    edge.kind,
                );
            }
        }

        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge_count_of_kind(&self, kind: EdgeKind) -> usize {
        self.graph
            .edge_references()
            .filter(|e| *e.weight() == kind)
            .count()
    }

    fn index(&self, id: StitchId) -> Option<NodeIndex> {
        (id < self.graph.node_count()).then(|| NodeIndex::new(id))
    }

    /// Number of edges touching a stitch, or `None` for an unknown id.
    pub fn degree(&self, id: StitchId) -> Option<usize> {
        let idx = self.index(id)?;
        Some(self.graph.edges(idx).count())
    }

    /// Adjacent stitches in ascending order.
    pub fn neighbors(&self, id: StitchId) -> Vec<StitchId> {
        let Some(idx) = self.index(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<StitchId> =
            self.graph.neighbors(idx).map(|n| self.graph[n]).collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Stitches with no edges at all.
    pub fn isolated_stitches(&self) -> Vec<StitchId> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges(idx).next().is_none())
            .map(|idx| self.graph[idx])
            .collect()
    }

    /// Number of connected pieces of fabric.
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    pub fn max_degree(&self) -> usize {
        self.graph
            .node_indices()
            .map(|idx| self.graph.edges(idx).count())
            .max()
            .unwrap_or(0)
    }

    pub fn stats(&self) -> FabricStats {
        FabricStats {
            stitches: self.node_count(),
            edges: self.edge_count(),
            horizontal_edges: self.edge_count_of_kind(EdgeKind::Horizontal),
            vertical_edges: self.edge_count_of_kind(EdgeKind::Vertical),
            components: self.component_count(),
            isolated: self.isolated_stitches().len(),
            max_degree: self.max_degree(),
        }
    }
}

/// Summary numbers for one fabric.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FabricStats {
    pub stitches: usize,
    pub edges: usize,
    pub horizontal_edges: usize,
    pub vertical_edges: usize,
    pub components: usize,
    pub isolated: usize,
    pub max_degree: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::technique::TechniqueTable;
    use crate::types::{Edge, EdgeWeights, Technique};

    fn table() -> TechniqueTable {
        TechniqueTable::from_entries([
            ("co", Technique::new("co", 0, 1, false)),
            ("k", Technique::new("k", 1, 1, false)),
            ("turn", Technique::new("t", 0, 0, true)),
        ])
    }

    #[test]
    fn test_garter_swatch() {
        let table = table();
        let stitches = GraphBuilder::new(&table)
            .build_text("co co co\nturn k k k")
            .unwrap();
        let fabric = FabricGraph::from_stitch_graph(&stitches);

        assert_eq!(fabric.node_count(), 6);
        assert_eq!(fabric.edge_count(), stitches.edge_count());
        assert_eq!(fabric.component_count(), 1);
        assert!(fabric.isolated_stitches().is_empty());
        assert_eq!(
            fabric.edge_count_of_kind(EdgeKind::Vertical),
            stitches.edges_of_kind(EdgeKind::Vertical).count()
        );
    }

    #[test]
    fn test_degree_and_neighbors() {
        let weights = EdgeWeights::default();
        let stitches = StitchGraph::new(
            4,
            vec![
                Edge::horizontal(1, 0, &weights),
                Edge::horizontal(2, 1, &weights),
                Edge::vertical(0, 2, &weights),
            ],
        );
        let fabric = FabricGraph::from_stitch_graph(&stitches);

        assert_eq!(fabric.degree(1), Some(2));
        assert_eq!(fabric.degree(3), Some(0));
        assert_eq!(fabric.degree(9), None);
        assert_eq!(fabric.neighbors(0), vec![1, 2]);
        assert!(fabric.neighbors(9).is_empty());
        assert_eq!(fabric.isolated_stitches(), vec![3]);
        assert_eq!(fabric.component_count(), 2);
        assert_eq!(fabric.max_degree(), 2);
    }

    #[test]
    fn test_stats() {
        let weights = EdgeWeights::default();
        let stitches = StitchGraph::new(
            3,
            vec![Edge::horizontal(1, 0, &weights), Edge::vertical(0, 2, &weights)],
        );
        let stats = FabricGraph::from_stitch_graph(&stitches).stats();

        assert_eq!(
            stats,
            FabricStats {
                stitches: 3,
                edges: 2,
                horizontal_edges: 1,
                vertical_edges: 1,
                components: 1,
                isolated: 0,
                max_degree: 2,
            }
        );
    }

    #[test]
    fn test_empty_fabric() {
        let fabric = FabricGraph::from_stitch_graph(&StitchGraph::default());
        assert_eq!(fabric.component_count(), 0);
        assert_eq!(fabric.max_degree(), 0);
    }
}
