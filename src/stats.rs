/// Counters describing the work done by a search so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// The number of nodes of the search tree entered, counting the root.
    pub nodes: u64,
    /// The number of rows selected.
    pub selections: u64,
    /// The number of selections abandoned because a column went past its
    /// target.
    pub overshoots: u64,
    /// The number of solutions produced.
    pub solutions: u64,
    /// The deepest level of the search tree reached.
    pub max_depth: usize,
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} selections, {} overshoots, {} solutions, depth {}",
            self.nodes, self.selections, self.overshoots, self.solutions, self.max_depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_start_at_zero() {
        let stats = SearchStatistics::default();
        assert_eq!(stats.nodes, 0);
        assert_eq!(
            stats.to_string(),
            "0 nodes, 0 selections, 0 overshoots, 0 solutions, depth 0"
        );
    }
}
