//! Adjacency matrix exporter.

use crate::types::StitchGraph;

/// Dense `count x count` adjacency indicator.
///
/// Edges are undirected, so an edge between `i` and `j` sets both cells.
pub fn adjacency(graph: &StitchGraph) -> Vec<Vec<u8>> {
    let mut matrix = vec![vec![0u8; graph.count]; graph.count];

    for edge in &graph.edges {
        let (a, b) = edge.endpoints();
        if a < graph.count && b < graph.count {
            matrix[a][b] = 1;
            matrix[b][a] = 1;
        }
    }

    matrix
}

/// Render a matrix as CSV with a header row of column indices.
pub fn to_csv(matrix: &[Vec<u8>]) -> String {
    let mut output = String::new();

    let header: Vec<String> = (0..matrix.len()).map(|i| i.to_string()).collect();
    output.push_str(&header.join(","));
    output.push('\n');

    for row in matrix {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, EdgeWeights};

    fn graph() -> StitchGraph {
        let weights = EdgeWeights::default();
        StitchGraph::new(
            3,
            vec![Edge::horizontal(1, 0, &weights), Edge::vertical(0, 2, &weights)],
        )
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let matrix = adjacency(&graph());
        assert_eq!(matrix, vec![vec![0, 1, 1], vec![1, 0, 0], vec![1, 0, 0]]);
        for (i, row) in matrix.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                assert_eq!(*cell, matrix[j][i]);
            }
        }
    }

    #[test]
    fn test_to_csv() {
        let csv = to_csv(&adjacency(&graph()));
        assert_eq!(csv, "0,1,2\n0,1,1\n1,0,0\n1,0,0\n");
    }

    #[test]
    fn test_empty_matrix() {
        assert!(adjacency(&StitchGraph::default()).is_empty());
        assert_eq!(to_csv(&[]), "\n");
    }
}
