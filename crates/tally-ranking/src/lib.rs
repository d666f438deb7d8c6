//! # tally-ranking
//!
//! The ranking engine. Holds no mutable state of its own: every fact lives in
//! the injected `IRankStore`, and every time-based effect is evaluated against
//! the injected `Clock` at the moment of the call.
//!
//! ## Modules
//!
//! - `articles`: submit and hydrate article records, index probes
//! - `ledger`: one vote per user per article inside the voting window
//! - `pagination`: page bounds and hydrated slices of a ranked index
//! - `groups`: explicit group membership
//! - `group_cache`: TTL-bounded group-ranked views
//! - `engine`: `RankingEngine`, the facade binding store, clock and config
//! - `tracing_setup`: subscriber installation

pub mod articles;
pub mod engine;
pub mod group_cache;
pub mod groups;
pub mod ledger;
pub mod pagination;
pub mod tracing_setup;

pub use engine::RankingEngine;
pub use pagination::page_bounds;
