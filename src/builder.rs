use std::cmp::Ordering;

use tracing::{info, trace};

use crate::ElevationGrid;
use crate::Node;
use crate::TerrainGraph;

/// Add the descent edge between two neighbouring cells, if any.
/// Equal elevations are not traversable in either direction.
fn connect(graph: &mut TerrainGraph, a: Node, b: Node) {
    match graph.elevation(a).cmp(&graph.elevation(b)) {
        Ordering::Greater => {
            let _ = graph.insert_edge(a, b);
        }
        Ordering::Less => {
            let _ = graph.insert_edge(b, a);
        }
        Ordering::Equal => (),
    }
}

impl TerrainGraph {
    /// Build the descent graph of `grid` in a single row-major scan.
    ///
    /// Each cell is compared with its left neighbour and the cell above
    /// it, so every 4-connected pair is considered exactly once and both
    /// endpoints exist by the time their edge is inserted.
    pub fn build(grid: &ElevationGrid) -> Self {
        info!(
            width = grid.width(),
            height = grid.height(),
            "building descent graph"
        );
        let mut graph = Self::with_nodes(grid);
        let width = grid.width();
        for y in 0..grid.height() {
            for x in 0..width {
                let node = Node(y * width + x);
                if x > 0 {
                    connect(&mut graph, node, Node(node.as_index() - 1));
                }
                if y > 0 {
                    connect(&mut graph, node, Node(node.as_index() - width));
                }
            }
            trace!(row = y, summits = graph.num_summits(), "scanned row");
        }
        debug_assert!(graph.validate().is_ok());
        info!(
            nodes = graph.len(),
            edges = graph.num_edges(),
            summits = graph.num_summits(),
            "descent graph built"
        );
        graph
    }
}
