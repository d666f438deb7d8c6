mod article;
mod outcomes;
mod ranking_order;

pub use article::{fields, Article};
pub use outcomes::{GroupChange, VoteOutcome};
pub use ranking_order::RankingOrder;
