use serde::Serialize;
use tracing::info;

use crate::flags::ReconstructionOptions;
use crate::DropTrace;
use crate::Node;
use crate::TerrainGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub elevation: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakReport {
    pub cell: Cell,
    pub vertical_drop: u64,
    pub min_elevation: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlternativeCount {
    pub path_length: usize,
    pub summits: usize,
}

/// Everything the driver prints about a terrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescentReport {
    pub width: usize,
    pub height: usize,
    pub nodes: usize,
    pub edges: usize,
    pub summits: usize,
    /// Edge count of the longest descent; 0 if the terrain has no summit.
    pub longest_path: usize,
    /// Largest drop among the longest descents; 0 if there are none.
    pub max_vertical_drop: u64,
    /// The peak that produced `max_vertical_drop`.
    pub best_peak: Option<Cell>,
    pub peaks: Vec<PeakReport>,
    /// Summit counts for the next shorter path lengths.
    pub alternatives: Vec<AlternativeCount>,
}

impl DescentReport {
    pub fn compute(
        graph: &TerrainGraph,
        alternatives: usize,
        options: ReconstructionOptions,
    ) -> Self {
        let peaks = graph.peak_longest_path(None);
        let longest_path = graph.max_summit_path().unwrap_or(0);
        info!(peaks = peaks.len(), longest_path, "found longest descents");

        let traces = peaks
            .iter()
            .map(|&p| graph.vertical_drop(p, longest_path, options))
            .collect::<Vec<_>>();
        let best = graph.max_vertical_drop(&peaks, longest_path, options);

        let histogram = graph.path_length_histogram();
        let alternatives = (1..longest_path)
            .rev()
            .take(alternatives)
            .map(|path_length| AlternativeCount {
                path_length,
                summits: histogram
                    .iter()
                    .find(|&&(len, _)| len == path_length)
                    .map_or(0, |&(_, count)| count),
            })
            .collect();

        Self {
            width: graph.width(),
            height: graph.height(),
            nodes: graph.len(),
            edges: graph.num_edges(),
            summits: graph.num_summits(),
            longest_path,
            max_vertical_drop: best.as_ref().map_or(0, |b| b.vertical_drop),
            best_peak: best.map(|b| cell(graph, b.summit)),
            peaks: traces.iter().map(|t| peak_report(graph, t)).collect(),
            alternatives,
        }
    }
}

fn cell(graph: &TerrainGraph, node: Node) -> Cell {
    let (x, y) = graph.coordinates(node);
    Cell {
        x,
        y,
        elevation: graph.elevation(node),
    }
}

fn peak_report(graph: &TerrainGraph, trace: &DropTrace) -> PeakReport {
    PeakReport {
        cell: cell(graph, trace.summit),
        vertical_drop: trace.vertical_drop,
        min_elevation: trace.min_elevation,
        levels: trace
            .levels
            .iter()
            .map(|level| level.iter().map(|&n| cell(graph, n)).collect())
            .collect(),
    }
}

#[cfg(test)]
mod test_report {
    use super::*;
    use crate::ElevationGrid;

    fn build(width: usize, height: usize, rows: Vec<Vec<i64>>) -> TerrainGraph {
        TerrainGraph::build(&ElevationGrid::from_rows(width, height, rows).unwrap())
    }

    #[test]
    fn test_flat_terrain_reports_zero() {
        let g = build(2, 2, vec![vec![5, 5], vec![5, 5]]);
        let report = DescentReport::compute(&g, 3, ReconstructionOptions::default());
        assert_eq!(report.longest_path, 0);
        assert_eq!(report.max_vertical_drop, 0);
        assert!(report.peaks.is_empty());
        assert!(report.best_peak.is_none());
        assert!(report.alternatives.is_empty());
    }

    #[test]
    fn test_sample_map() {
        let g = build(
            4,
            4,
            vec![
                vec![4, 8, 7, 3],
                vec![2, 5, 9, 3],
                vec![6, 3, 2, 5],
                vec![4, 4, 1, 6],
            ],
        );
        let report = DescentReport::compute(&g, 3, ReconstructionOptions::default());
        // 8 -> 5 -> 3 -> 2 -> 1 and 9 -> 5 -> 3 -> 2 -> 1
        assert_eq!(report.longest_path, 4);
        assert_eq!(report.max_vertical_drop, 8);
        assert_eq!(report.peaks.len(), 2);
        assert_eq!(report.peaks[0].vertical_drop, 7);
        assert_eq!(
            report.peaks[1].cell,
            Cell {
                x: 2,
                y: 1,
                elevation: 9
            }
        );
        assert_eq!(report.best_peak, Some(report.peaks[1].cell));
        // Length 3 from both 6s and the 4 at (1, 3); nothing shorter.
        assert_eq!(
            report
                .alternatives
                .iter()
                .map(|a| (a.path_length, a.summits))
                .collect::<Vec<_>>(),
            vec![(3, 3), (2, 0), (1, 0)]
        );
    }

    #[test]
    fn test_extreme_elevations() {
        let grid = ElevationGrid::parse("2 1\n9223372036854775807 -9223372036854775808\n").unwrap();
        let g = TerrainGraph::build(&grid);
        let report = DescentReport::compute(&g, 3, ReconstructionOptions::default());
        assert_eq!(report.longest_path, 1);
        assert_eq!(report.max_vertical_drop, u64::MAX);
        assert_eq!(report.peaks[0].vertical_drop, u64::MAX);
    }

    #[test]
    fn test_json_omits_empty_levels() {
        let g = build(3, 1, vec![vec![3, 2, 1]]);
        let report = DescentReport::compute(&g, 0, ReconstructionOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["longest_path"], 2);
        assert_eq!(json["max_vertical_drop"], 2);
        assert!(json["peaks"][0].get("levels").is_none());

        let traced = DescentReport::compute(
            &g,
            0,
            ReconstructionOptions::default().with_level_trace(),
        );
        let json = serde_json::to_value(&traced).unwrap();
        assert_eq!(json["peaks"][0]["levels"].as_array().unwrap().len(), 2);
    }
}
