mod rank_store;

pub use rank_store::{resolve_rank_range, IRankStore, RangeOrder};
