use crate::analyze::{Ranking, RepoTotal, RepoTotals};
use itertools::Itertools;

pub trait Ranker {
    fn rank_top(self, limit: usize) -> Ranking;
}

impl Ranker for RepoTotals {
    /// Highest totals first. The sort is stable, so equal totals stay in
    /// document order.
    fn rank_top(self, limit: usize) -> Ranking {
        self.into_iter()
            .sorted_by(|(_, t1), (_, t2)| t2.cmp(t1))
            .take(limit)
            .map(RepoTotal::from)
            .collect()
    }
}
