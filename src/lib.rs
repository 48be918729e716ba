//! Longest strictly-descending paths over a 2-D elevation grid.
//!
//! Every cell becomes a node and every pair of orthogonal neighbours
//! with different elevations becomes a descent edge from the higher to
//! the lower cell. While the grid is scanned, each node keeps the edge
//! count of the longest descent that starts at it, and the graph keeps
//! the set of summits: nodes with no way up and at least one way down.
//!
//! ```
//! use descent_graph::{DescentReport, ElevationGrid, ReconstructionOptions, TerrainGraph};
//!
//! let grid = ElevationGrid::parse("3 1\n3 2 1\n").unwrap();
//! let graph = TerrainGraph::build(&grid);
//! let report = DescentReport::compute(&graph, 0, ReconstructionOptions::default());
//! assert_eq!(report.longest_path, 2);
//! assert_eq!(report.max_vertical_drop, 2);
//! ```

use nohash::BuildNoHashHasher;
use std::collections::HashSet;

mod builder;
mod error;
mod flags;
mod graph;
mod grid;
mod query;
mod reconstruct;
mod report;

pub use error::{GridError, InvariantViolation};
pub use flags::ReconstructionOptions;
pub use graph::{EdgeInsertion, SummitChange, TerrainGraph};
pub use grid::ElevationGrid;
pub use reconstruct::DropTrace;
pub use report::{AlternativeCount, Cell, DescentReport, PeakReport};

/// Index of a cell's node: `y * width + x`.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Node(usize);

impl Node {
    pub fn as_index(&self) -> usize {
        self.0
    }
}

type NodeHash = HashSet<Node, BuildNoHashHasher<usize>>;
