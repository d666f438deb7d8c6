use serde::{Deserialize, Serialize};

/// Result of a vote. Only `Accepted` changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// New voter: vote count and score both went up.
    Accepted { votes: u64, score: f64 },
    /// This user already voted on the article.
    Duplicate,
    /// The article is older than the voting window.
    WindowClosed,
}

impl VoteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// How many group memberships actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChange {
    pub added: usize,
    pub removed: usize,
}

impl GroupChange {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}
