#![allow(dead_code)]

use std::sync::Arc;

use tally_core::{ManualClock, TallyConfig};
use tally_ranking::RankingEngine;
use tally_storage::{MemoryStore, SqliteStore};

pub const START: i64 = 1_700_000_000;
pub const WEEK: i64 = 604_800;

/// Engine over a fresh in-memory store with a manual clock at `START`.
pub fn memory_engine() -> (RankingEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    (RankingEngine::with_defaults(store, clock.clone()), clock)
}

/// Engine over a fresh in-memory SQLite database.
pub fn sqlite_engine() -> (RankingEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(SqliteStore::open_in_memory(clock.clone()).unwrap());
    (RankingEngine::with_defaults(store, clock.clone()), clock)
}

/// Engine with overridden ranking settings.
pub fn engine_with(toml: &str) -> (RankingEngine, Arc<ManualClock>) {
    let config = TallyConfig::from_toml(toml).unwrap();
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let engine = RankingEngine::new(store, clock.clone(), config.ranking).unwrap();
    (engine, clock)
}

/// Submit `n` articles one second apart; returns their ids in posting order.
pub fn seed(engine: &RankingEngine, clock: &ManualClock, n: usize) -> Vec<tally_core::ArticleId> {
    (0..n)
        .map(|i| {
            clock.advance(1);
            engine
                .submit(&format!("poster-{i}"), &format!("title {i}"), "http://example.com")
                .unwrap()
        })
        .collect()
}
