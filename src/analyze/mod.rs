pub mod aggregator;
mod model;
pub mod ranker;

pub use model::{Ranking, RepoTotal, RepoTotals};
