//! Graphviz DOT exporter.

use crate::types::StitchGraph;

/// Export a stitch graph as an undirected DOT graph.
///
/// ```text
/// Graph {
///   1 -- 0 [weight=1];
///   0 -- 2 [weight=1.5];
/// }
/// ```
pub fn export(graph: &StitchGraph) -> String {
    let mut output = String::from("Graph {\n");

    for edge in &graph.edges {
        output.push_str(&format!(
            "  {} -- {} [weight={}];\n",
            edge.source, edge.target, edge.weight
        ));
    }

    output.push_str("}\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, EdgeWeights};

    #[test]
    fn test_export_single_edge() {
        let graph = StitchGraph::new(2, vec![Edge::horizontal(1, 0, &EdgeWeights::default())]);
        assert_eq!(export(&graph), "Graph {\n  1 -- 0 [weight=1];\n}\n");
    }

    #[test]
    fn test_export_fractional_weight() {
        let graph = StitchGraph::new(3, vec![Edge::vertical(0, 2, &EdgeWeights::default())]);
        assert!(export(&graph).contains("  0 -- 2 [weight=1.5];\n"));
    }

    #[test]
    fn test_export_empty_graph() {
        assert_eq!(export(&StitchGraph::default()), "Graph {\n}\n");
    }
}
