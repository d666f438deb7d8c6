//! Article Store Adapter: submit, hydrate, index probes.

mod common;

use std::time::Duration;

use tally_core::errors::TallyError;
use tally_core::ArticleId;

use common::*;

#[test]
fn submit_then_hydrate_returns_fresh_article() {
    let (engine, _) = memory_engine();
    let before = engine.now();
    let id = engine.submit("alice", "A title", "http://example.com").unwrap();
    let after = engine.now();

    let article = engine.hydrate(id).unwrap();
    assert_eq!(article.id, id);
    assert_eq!(article.title, "A title");
    assert_eq!(article.link, "http://example.com");
    assert_eq!(article.poster, "alice");
    assert_eq!(article.votes, 1);
    assert!(article.time >= before && article.time <= after);
}

#[test]
fn first_article_gets_id_one() {
    let (engine, _) = memory_engine();
    assert_eq!(engine.submit("alice", "t", "l").unwrap(), ArticleId(1));
}

#[test]
fn consecutive_submits_return_increasing_ids() {
    let (engine, _) = memory_engine();
    let a = engine.submit("alice", "one", "http://a").unwrap();
    let b = engine.submit("alice", "two", "http://b").unwrap();
    let c = engine.submit("bob", "three", "http://c").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn submit_writes_both_indices() {
    let (engine, _) = memory_engine();
    let id = engine.submit("alice", "t", "l").unwrap();
    assert_eq!(engine.posted_at(id).unwrap(), Some(START));
    assert_eq!(engine.score(id).unwrap(), Some(START as f64 + 432.0));
}

#[test]
fn poster_is_recorded_as_voter_until_window_closes() {
    let (engine, _) = memory_engine();
    let id = engine.submit("alice", "t", "l").unwrap();
    let voted = id.voted_key().to_string();

    let store = engine.store();
    assert!(store.set_contains(&voted, "alice").unwrap());
    assert_eq!(store.set_members(&voted).unwrap(), vec!["alice"]);
    assert_eq!(store.ttl(&voted).unwrap(), Some(Duration::from_secs(WEEK as u64)));
}

#[test]
fn hydrate_unknown_id_is_not_found() {
    let (engine, _) = memory_engine();
    let err = engine.hydrate(ArticleId(99)).unwrap_err();
    assert!(matches!(err, TallyError::ArticleNotFound { ref id } if id == "99"));
}

#[test]
fn hydrate_reports_malformed_records() {
    let (engine, _) = memory_engine();
    engine
        .store()
        .hash_set_all("article:5", &[("title", "only a title".to_string())])
        .unwrap();
    let err = engine.hydrate(ArticleId(5)).unwrap_err();
    assert!(matches!(err, TallyError::MalformedRecord { .. }));
}

#[test]
fn sqlite_backend_submits_identically() {
    let (engine, _) = sqlite_engine();
    let id = engine.submit("alice", "A title", "http://example.com").unwrap();
    assert_eq!(id, ArticleId(1));
    let article = engine.hydrate(id).unwrap();
    assert_eq!(article.votes, 1);
    assert_eq!(article.time, START);
    assert_eq!(engine.score(id).unwrap(), Some(START as f64 + 432.0));
}

#[test]
fn store_failure_propagates() {
    let (engine, _) = memory_engine();
    // A key of the wrong structure where the id counter lives.
    engine.store().set_add("article:", "oops").unwrap();
    let err = engine.submit("alice", "t", "l").unwrap_err();
    assert!(err.is_store_failure());
}
