use std::collections::VecDeque;
use std::hash::BuildHasherDefault;

use crate::ElevationGrid;
use crate::InvariantViolation;
use crate::Node;
use crate::NodeHash;

/// A change in summit status caused by a single edge insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummitChange {
    Entered(Node),
    Left(Node),
}

/// What happened while recording one descent edge.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EdgeInsertion {
    /// Number of `longest_path` values raised, the upper node included.
    /// Ancestors that were reached but not raised are not counted.
    pub raised: usize,
    pub summit_changes: Vec<SummitChange>,
}

/// Descent graph over an elevation grid.
///
/// Nodes live in a flat arena indexed row-major. Descent and ascent
/// edges are index lists into that arena, and the ascent lists are
/// the exact reverse of the descent lists.
#[derive(Debug, Clone)]
pub struct TerrainGraph {
    width: usize,
    height: usize,
    elevation: Vec<i64>,
    go_down: Vec<Vec<Node>>,
    go_up: Vec<Vec<Node>>,
    longest_path: Vec<usize>,
    summits: NodeHash,
}

// Constructors
impl TerrainGraph {
    /// One node per cell of `grid` and no edges.
    pub fn with_nodes(grid: &ElevationGrid) -> Self {
        let num_nodes = grid.len();
        let elevation = grid.rows().flatten().copied().collect::<Vec<_>>();
        debug_assert_eq!(elevation.len(), num_nodes);
        Self {
            width: grid.width(),
            height: grid.height(),
            elevation,
            go_down: vec![vec![]; num_nodes],
            go_up: vec![vec![]; num_nodes],
            longest_path: vec![0; num_nodes],
            summits: NodeHash::with_hasher(BuildHasherDefault::default()),
        }
    }
}

// Node access
impl TerrainGraph {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.elevation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevation.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.go_down.iter().map(|d| d.len()).sum()
    }

    pub fn node_at(&self, x: usize, y: usize) -> Option<Node> {
        if x < self.width && y < self.height {
            Some(Node(y * self.width + x))
        } else {
            None
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> {
        (0..self.len()).map(Node)
    }

    // NOTE: the accessors below panic if node is out of bounds

    /// `(x, y)` of the cell behind `node`.
    pub fn coordinates(&self, node: Node) -> (usize, usize) {
        assert!(node.as_index() < self.len());
        (node.as_index() % self.width, node.as_index() / self.width)
    }

    pub fn elevation(&self, node: Node) -> i64 {
        self.elevation[node.as_index()]
    }

    /// Edge count of the longest descent from `node` to any sink.
    pub fn longest_path(&self, node: Node) -> usize {
        self.longest_path[node.as_index()]
    }

    pub fn go_down(&self, node: Node) -> &[Node] {
        &self.go_down[node.as_index()]
    }

    pub fn go_up(&self, node: Node) -> &[Node] {
        &self.go_up[node.as_index()]
    }

    pub fn is_summit(&self, node: Node) -> bool {
        self.summits.contains(&node)
    }

    /// Current summits, in no particular order.
    pub fn summits(&self) -> impl Iterator<Item = Node> + '_ {
        self.summits.iter().copied()
    }

    pub fn num_summits(&self) -> usize {
        self.summits.len()
    }

    pub fn sinks(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes().filter(|n| self.go_down[n.as_index()].is_empty())
    }
}

// Edge insertion
impl TerrainGraph {
    /// Record that `upper` descends to `lower`.
    ///
    /// The caller guarantees `upper` is strictly higher than `lower`.
    /// Duplicate edges are tolerated. On return every node satisfies
    /// `longest_path == 1 + max(longest_path of go_down)` (or 0 for sinks)
    /// and the summit set is current.
    pub fn insert_edge(&mut self, upper: Node, lower: Node) -> EdgeInsertion {
        debug_assert!(self.elevation(upper) > self.elevation(lower));
        self.go_down[upper.as_index()].push(lower);
        self.go_up[lower.as_index()].push(upper);

        let mut insertion = EdgeInsertion::default();
        let proposed = self.longest_path(lower) + 1;
        if proposed > self.longest_path(upper) {
            self.longest_path[upper.as_index()] = proposed;
            insertion.raised = 1 + self.propagate_increase(upper);
        }

        insertion.summit_changes = self.summit_transitions(upper, lower);
        for change in &insertion.summit_changes {
            self.apply_summit_change(*change);
        }
        insertion
    }

    /// Push the new value of `start` up through its ancestors, one
    /// ascent level at a time. Returns the number of values raised.
    ///
    /// An ancestor that is not raised stops the walk along its branch:
    /// its own ancestors already sit at least one step above it.
    fn propagate_increase(&mut self, start: Node) -> usize {
        let base = self.longest_path(start);
        let mut raised = 0;
        let mut frontier = self.go_up[start.as_index()].clone();
        let mut next_frontier = vec![];
        let mut level = 1;
        while !frontier.is_empty() {
            let proposed = base + level;
            for node in frontier.drain(..) {
                let current = &mut self.longest_path[node.as_index()];
                if proposed > *current {
                    *current = proposed;
                    raised += 1;
                    next_frontier.extend_from_slice(&self.go_up[node.as_index()]);
                }
            }
            std::mem::swap(&mut frontier, &mut next_frontier);
            level += 1;
        }
        raised
    }

    /// Summit status changes implied by the edge `upper -> lower`,
    /// which has already been appended to both adjacency lists.
    fn summit_transitions(&self, upper: Node, lower: Node) -> Vec<SummitChange> {
        let mut changes = vec![];
        if self.is_summit(lower) {
            changes.push(SummitChange::Left(lower));
        }
        if self.go_up(upper).is_empty() && !self.is_summit(upper) {
            debug_assert!(!self.go_down(upper).is_empty());
            changes.push(SummitChange::Entered(upper));
        }
        changes
    }

    fn apply_summit_change(&mut self, change: SummitChange) {
        match change {
            SummitChange::Entered(node) => {
                let _ = self.summits.insert(node);
            }
            SummitChange::Left(node) => {
                let _ = self.summits.remove(&node);
            }
        }
    }
}

// Validation
impl TerrainGraph {
    /// `longest_path` of every node recomputed from scratch, walking
    /// up from the sinks in reverse topological order.
    pub fn recompute_longest_paths(&self) -> Vec<usize> {
        let mut expected = vec![0_usize; self.len()];
        let mut out_remaining = self.go_down.iter().map(|d| d.len()).collect::<Vec<_>>();
        let mut queue = self.sinks().collect::<VecDeque<_>>();

        while let Some(node) = queue.pop_front() {
            let child_depth = expected[node.as_index()];
            for &parent in self.go_up(node) {
                let p = parent.as_index();
                expected[p] = expected[p].max(child_depth + 1);
                out_remaining[p] -= 1;
                if out_remaining[p] == 0 {
                    queue.push_back(parent);
                }
            }
        }
        expected
    }

    /// Check edge pairing, the `longest_path` invariant and the summit
    /// set against their definitions.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for upper in self.nodes() {
            for &lower in self.go_down(upper) {
                let down = self.go_down(upper).iter().filter(|&&n| n == lower).count();
                let up = self.go_up(lower).iter().filter(|&&n| n == upper).count();
                if down != up {
                    return Err(InvariantViolation::UnpairedEdge { upper, lower });
                }
            }
        }

        for (i, expected) in self.recompute_longest_paths().into_iter().enumerate() {
            let found = self.longest_path[i];
            if found != expected {
                return Err(InvariantViolation::LongestPath {
                    node: Node(i),
                    expected,
                    found,
                });
            }
        }

        for node in self.nodes() {
            let summit = self.go_up(node).is_empty() && !self.go_down(node).is_empty();
            let recorded = self.is_summit(node);
            match (summit, recorded) {
                (true, false) => return Err(InvariantViolation::MissingSummit(node)),
                (false, true) => return Err(InvariantViolation::SpuriousSummit(node)),
                _ => (),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_insertion {
    use super::*;

    fn row_graph(elevations: Vec<i64>) -> TerrainGraph {
        let width = elevations.len();
        let grid = ElevationGrid::from_rows(width, 1, vec![elevations]).unwrap();
        TerrainGraph::with_nodes(&grid)
    }

    #[test]
    fn test_with_nodes() {
        let g = row_graph(vec![3, 2, 1]);
        assert_eq!(g.len(), 3);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.num_summits(), 0);
        assert!(g.nodes().all(|n| g.longest_path(n) == 0));
        assert_eq!(g.sinks().count(), 3);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_first_edge_creates_summit() {
        let mut g = row_graph(vec![3, 2, 1]);
        let insertion = g.insert_edge(Node(1), Node(2));
        assert_eq!(insertion.raised, 1);
        assert_eq!(
            insertion.summit_changes,
            vec![SummitChange::Entered(Node(1))]
        );
        assert_eq!(g.longest_path(Node(1)), 1);
        assert!(g.is_summit(Node(1)));
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_summit_moves_uphill() {
        let mut g = row_graph(vec![3, 2, 1]);
        let _ = g.insert_edge(Node(1), Node(2));
        let insertion = g.insert_edge(Node(0), Node(1));
        assert_eq!(
            insertion.summit_changes,
            vec![
                SummitChange::Left(Node(1)),
                SummitChange::Entered(Node(0))
            ]
        );
        assert_eq!(g.summits().collect::<Vec<_>>(), vec![Node(0)]);
        assert_eq!(g.longest_path(Node(0)), 2);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_propagation_reaches_ancestors() {
        // Insert top-down so that the last edge must raise both ancestors.
        let mut g = row_graph(vec![4, 3, 2, 1]);
        let _ = g.insert_edge(Node(0), Node(1));
        let _ = g.insert_edge(Node(1), Node(2));
        assert_eq!(g.longest_path(Node(0)), 2);
        let insertion = g.insert_edge(Node(2), Node(3));
        assert_eq!(insertion.raised, 3);
        assert!(insertion.summit_changes.is_empty());
        assert_eq!(g.longest_path(Node(0)), 3);
        assert_eq!(g.longest_path(Node(1)), 2);
        assert_eq!(g.longest_path(Node(2)), 1);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_shorter_branch_does_not_raise() {
        //  9 -> 5 -> 4 -> 3
        //  9 -> 1
        let grid =
            ElevationGrid::from_rows(4, 2, vec![vec![9, 5, 4, 3], vec![1, 0, 0, 0]]).unwrap();
        let mut g = TerrainGraph::with_nodes(&grid);
        let _ = g.insert_edge(Node(2), Node(3));
        let _ = g.insert_edge(Node(1), Node(2));
        let _ = g.insert_edge(Node(0), Node(1));
        let insertion = g.insert_edge(Node(0), Node(4));
        assert_eq!(insertion.raised, 0);
        assert_eq!(g.longest_path(Node(0)), 3);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_reached_ancestor_not_counted_as_raised() {
        // 9 -> 8 -> 1 is already length 2; 9 -> 7 -> 0 only ties it.
        let grid = ElevationGrid::from_rows(3, 2, vec![vec![9, 8, 1], vec![7, 0, 0]]).unwrap();
        let mut g = TerrainGraph::with_nodes(&grid);
        let _ = g.insert_edge(Node(1), Node(2));
        let _ = g.insert_edge(Node(0), Node(1));
        let _ = g.insert_edge(Node(0), Node(3));
        let insertion = g.insert_edge(Node(3), Node(4));
        // only the 7 itself; the 9 is visited but stays at 2
        assert_eq!(insertion.raised, 1);
        assert_eq!(g.longest_path(Node(3)), 1);
        assert_eq!(g.longest_path(Node(0)), 2);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_duplicate_edges_are_tolerated() {
        let mut g = row_graph(vec![2, 1]);
        let first = g.insert_edge(Node(0), Node(1));
        let second = g.insert_edge(Node(0), Node(1));
        assert_eq!(first.summit_changes.len(), 1);
        assert!(second.summit_changes.is_empty());
        assert_eq!(second.raised, 0);
        assert_eq!(g.go_down(Node(0)), &[Node(1), Node(1)]);
        assert_eq!(g.num_summits(), 1);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_is_summit_reads_the_summit_set() {
        let mut g = row_graph(vec![3, 2, 1]);
        let _ = g.insert_edge(Node(1), Node(2));
        let _ = g.insert_edge(Node(0), Node(1));
        for n in g.nodes() {
            assert_eq!(g.is_summit(n), g.summits().any(|s| s == n));
        }
        g.apply_summit_change(SummitChange::Left(Node(0)));
        assert!(!g.is_summit(Node(0)));
        assert_eq!(g.num_summits(), 0);
        assert_eq!(
            g.validate(),
            Err(InvariantViolation::MissingSummit(Node(0)))
        );
    }

    #[test]
    fn test_sink_gaining_incoming_edge_is_not_a_summit() {
        let mut g = row_graph(vec![1, 5, 3]);
        let _ = g.insert_edge(Node(1), Node(0));
        let _ = g.insert_edge(Node(1), Node(2));
        assert_eq!(g.summits().collect::<Vec<_>>(), vec![Node(1)]);
        assert!(!g.is_summit(Node(0)));
        assert!(!g.is_summit(Node(2)));
    }

    #[test]
    fn test_coordinates() {
        let grid = ElevationGrid::from_rows(3, 2, vec![vec![0; 3], vec![0; 3]]).unwrap();
        let g = TerrainGraph::with_nodes(&grid);
        assert_eq!(g.node_at(2, 1), Some(Node(5)));
        assert_eq!(g.node_at(3, 0), None);
        assert_eq!(g.coordinates(Node(4)), (1, 1));
    }
}
