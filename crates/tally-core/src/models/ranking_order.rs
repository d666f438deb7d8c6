use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{TallyError, TallyResult};
use crate::keys::{self, SCORE_INDEX, TIME_INDEX};

/// Which global index a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOrder {
    /// Recency plus votes.
    Score,
    /// Posting time only.
    Time,
}

impl RankingOrder {
    pub const ALL: [RankingOrder; 2] = [RankingOrder::Score, RankingOrder::Time];

    pub fn index_key(self) -> &'static str {
        match self {
            Self::Score => SCORE_INDEX,
            Self::Time => TIME_INDEX,
        }
    }

    /// Name of the cached view of `group` ordered by this index, e.g. `score:tech`.
    pub fn group_view_key(self, group: &str) -> TallyResult<String> {
        keys::check_group_name(group)?;
        Ok(format!("{}{}", self.index_key(), group))
    }
}

impl fmt::Display for RankingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score => f.write_str("score"),
            Self::Time => f.write_str("time"),
        }
    }
}

impl FromStr for RankingOrder {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        match s {
            "score" | "score:" => Ok(Self::Score),
            "time" | "time:" => Ok(Self::Time),
            other => Err(TallyError::invalid(format!("unknown ranking order {other:?}"))),
        }
    }
}
