use std::collections::BTreeMap;

use crate::Node;
use crate::TerrainGraph;

impl TerrainGraph {
    /// The greatest `longest_path` over all summits, if there are any.
    pub fn max_summit_path(&self) -> Option<usize> {
        self.summits().map(|s| self.longest_path(s)).max()
    }

    /// Summits whose `longest_path` equals `target_len`, or the maximum
    /// over all summits when `target_len` is `None`.
    ///
    /// The result is sorted by node index and is empty when the graph
    /// has no summits; callers must treat that as "no answer".
    pub fn peak_longest_path(&self, target_len: Option<usize>) -> Vec<Node> {
        let target = match target_len.or_else(|| self.max_summit_path()) {
            Some(t) => t,
            None => return vec![],
        };
        let mut peaks = self
            .summits()
            .filter(|&s| self.longest_path(s) == target)
            .collect::<Vec<_>>();
        peaks.sort_unstable();
        peaks
    }

    /// Number of summits for each path length, longest first.
    pub fn path_length_histogram(&self) -> Vec<(usize, usize)> {
        let mut counts = BTreeMap::new();
        for summit in self.summits() {
            *counts.entry(self.longest_path(summit)).or_insert(0_usize) += 1;
        }
        counts.into_iter().rev().collect()
    }
}
