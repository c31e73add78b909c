use indexmap::IndexMap;

/// Total macro count per repository, in document order.
pub type RepoTotals = IndexMap<String, u64>;

/// Repositories ordered by total macro count, highest first.
pub type Ranking = Vec<RepoTotal>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTotal {
    pub name: String,
    pub total: u64,
}

impl RepoTotal {
    pub fn new(name: impl ToString, total: u64) -> Self {
        Self {
            name: name.to_string(),
            total,
        }
    }
}

impl From<(String, u64)> for RepoTotal {
    fn from((name, total): (String, u64)) -> Self {
        Self::new(name, total)
    }
}
