use tracing::debug;

use crate::flags::ReconstructionOptions;
use crate::Node;
use crate::TerrainGraph;

/// Outcome of walking down the longest routes from one summit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTrace {
    pub summit: Node,
    pub path_length: usize,
    /// Lowest elevation seen on any route of full length.
    pub min_elevation: i64,
    /// Summit elevation minus `min_elevation`; `u64` holds any `i64` span.
    pub vertical_drop: u64,
    /// Frontier of each level `1..=path_length`, sorted by node.
    /// Only filled in when level tracing was requested.
    pub levels: Vec<Vec<Node>>,
}

impl TerrainGraph {
    /// Walk down from `summit`, keeping at level `k` only the successors
    /// whose `longest_path` is exactly `path_length - k`, i.e. those that
    /// still lie on a route of the full length.
    pub fn vertical_drop(
        &self,
        summit: Node,
        path_length: usize,
        options: ReconstructionOptions,
    ) -> DropTrace {
        let summit_elevation = self.elevation(summit);
        let mut min_elevation = summit_elevation;
        let mut levels = vec![];
        let mut frontier = vec![summit];

        for level in 1..=path_length {
            let remaining = path_length - level;
            let mut next_frontier = frontier
                .iter()
                .flat_map(|&n| self.go_down(n).iter().copied())
                .filter(|&n| self.longest_path(n) == remaining)
                .collect::<Vec<_>>();
            next_frontier.sort_unstable();
            next_frontier.dedup();

            if let Some(lowest) = next_frontier.iter().map(|&n| self.elevation(n)).min() {
                min_elevation = min_elevation.min(lowest);
            }
            debug!(
                ?summit,
                level,
                width = next_frontier.len(),
                min_elevation,
                "descended one level"
            );
            if options.level_trace() {
                levels.push(next_frontier.clone());
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        DropTrace {
            summit,
            path_length,
            min_elevation,
            vertical_drop: summit_elevation.abs_diff(min_elevation),
            levels,
        }
    }

    /// The largest drop among `peaks`, all assumed to reach `path_length`.
    /// The earliest peak wins a tie.
    pub fn max_vertical_drop(
        &self,
        peaks: &[Node],
        path_length: usize,
        options: ReconstructionOptions,
    ) -> Option<DropTrace> {
        let mut best: Option<DropTrace> = None;
        for &peak in peaks {
            let trace = self.vertical_drop(peak, path_length, options);
            match &best {
                Some(b) if b.vertical_drop >= trace.vertical_drop => (),
                _ => best = Some(trace),
            }
        }
        best
    }
}
