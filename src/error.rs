use std::path::PathBuf;

use crate::Node;

/// Errors raised while turning text into an [`ElevationGrid`](crate::ElevationGrid).
///
/// All of these are fatal: no partial grid is ever handed to the builder.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid must have a positive width and height, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid of {width}x{height} cells is too large to address")]
    TooLarge { width: usize, height: usize },
    #[error("malformed header: expected `width height`, got {0:?}")]
    Header(String),
    #[error("malformed grid: row {row} has {found} values, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {token:?} does not fit in an elevation")]
    Elevation { line: usize, token: String },
    #[error("malformed grid: found {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A broken internal invariant of a [`TerrainGraph`](crate::TerrainGraph).
///
/// These never occur given correct edge insertion and only
/// show up through [`TerrainGraph::validate`](crate::TerrainGraph::validate).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("node {node:?} has longest_path {found}, expected {expected}")]
    LongestPath {
        node: Node,
        expected: usize,
        found: usize,
    },
    #[error("node {0:?} is a summit but is missing from the summit set")]
    MissingSummit(Node),
    #[error("node {0:?} is in the summit set but is not a summit")]
    SpuriousSummit(Node),
    #[error("descent edge {upper:?} -> {lower:?} has no matching ascent edge")]
    UnpairedEdge { upper: Node, lower: Node },
}
