//! # tally-core
//!
//! Foundation crate for the tally ranking engine.
//! Defines the key namespace, article model, clock, errors, config, constants,
//! and the store trait every backend implements.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod keys;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TallyConfig;
pub use errors::{TallyError, TallyResult};
pub use keys::{ArticleId, EntityKey, EntityKind};
pub use models::{Article, GroupChange, RankingOrder, VoteOutcome};
pub use traits::{IRankStore, RangeOrder};
