//! Behaviour every `IRankStore` backend must share.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tally_core::errors::{StorageError, TallyError};
use tally_core::{IRankStore, ManualClock, RangeOrder};

pub const START: i64 = 1_700_000_000;

pub fn counter_increments_from_one(store: &dyn IRankStore) {
    assert_eq!(store.incr("article:").unwrap(), 1);
    assert_eq!(store.incr("article:").unwrap(), 2);
    assert_eq!(store.incr("other:").unwrap(), 1);
}

pub fn set_add_reports_insertion(store: &dyn IRankStore) {
    assert!(store.set_add("voted:1", "alice").unwrap());
    assert!(!store.set_add("voted:1", "alice").unwrap());
    assert!(store.set_add("voted:1", "bob").unwrap());
    assert!(store.set_contains("voted:1", "bob").unwrap());
    assert!(!store.set_contains("voted:1", "carol").unwrap());
    assert_eq!(store.set_members("voted:1").unwrap(), vec!["alice", "bob"]);
}

pub fn set_remove_is_idempotent(store: &dyn IRankStore) {
    store.set_add("group:tech", "article:1").unwrap();
    assert!(store.set_remove("group:tech", "article:1").unwrap());
    assert!(!store.set_remove("group:tech", "article:1").unwrap());
    assert!(!store.exists("group:tech").unwrap());
    assert!(!store.set_remove("group:none", "article:1").unwrap());
}

pub fn hash_fields_round_trip(store: &dyn IRankStore) {
    store
        .hash_set_all(
            "article:1",
            &[("title", "A title".to_string()), ("votes", "1".to_string())],
        )
        .unwrap();
    assert_eq!(store.hash_incr("article:1", "votes", 1).unwrap(), 2);
    assert_eq!(
        store.hash_get("article:1", "votes").unwrap().as_deref(),
        Some("2")
    );
    let record = store.hash_get_all("article:1").unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(record["title"], "A title");
    assert!(store.hash_get_all("article:2").unwrap().is_empty());
    assert_eq!(store.hash_get("article:2", "title").unwrap(), None);
}

pub fn hash_incr_refuses_text(store: &dyn IRankStore) {
    store
        .hash_set_all("article:1", &[("title", "A title".to_string())])
        .unwrap();
    let err = store.hash_incr("article:1", "title", 1).unwrap_err();
    assert!(matches!(
        err,
        TallyError::StoreUnavailable(StorageError::InvalidValue { .. })
    ));
}

pub fn zset_scores_and_ranges(store: &dyn IRankStore) {
    assert!(store.zset_add("score:", "article:1", 100.0).unwrap());
    assert!(store.zset_add("score:", "article:2", 300.0).unwrap());
    assert!(store.zset_add("score:", "article:3", 200.0).unwrap());
    assert!(!store.zset_add("score:", "article:1", 150.0).unwrap());

    assert_eq!(store.zset_card("score:").unwrap(), 3);
    assert_eq!(store.zset_score("score:", "article:1").unwrap(), Some(150.0));
    assert_eq!(store.zset_score("score:", "article:9").unwrap(), None);

    assert_eq!(
        store.zset_range("score:", 0, -1, RangeOrder::Descending).unwrap(),
        vec!["article:2", "article:3", "article:1"]
    );
    assert_eq!(
        store.zset_range("score:", 0, 1, RangeOrder::Ascending).unwrap(),
        vec!["article:1", "article:3"]
    );
    assert_eq!(
        store.zset_range("score:", 1, 1, RangeOrder::Descending).unwrap(),
        vec!["article:3"]
    );
    assert!(store
        .zset_range("score:", 25, 49, RangeOrder::Descending)
        .unwrap()
        .is_empty());
    assert!(store
        .zset_range("missing:", 0, -1, RangeOrder::Descending)
        .unwrap()
        .is_empty());
}

pub fn zset_incr_accumulates(store: &dyn IRankStore) {
    store.zset_add("score:", "article:1", 1_000.0).unwrap();
    assert_eq!(store.zset_incr("score:", "article:1", 432.0).unwrap(), 1_432.0);
    assert_eq!(store.zset_incr("score:", "article:2", 432.0).unwrap(), 432.0);
    assert_eq!(store.zset_card("score:").unwrap(), 2);
}

pub fn intersection_keeps_max_score(store: &dyn IRankStore) {
    store.zset_add("score:", "article:1", 500.0).unwrap();
    store.zset_add("score:", "article:2", 900.0).unwrap();
    store.zset_add("score:", "article:3", 700.0).unwrap();
    store.set_add("group:tech", "article:1").unwrap();
    store.set_add("group:tech", "article:3").unwrap();
    store.set_add("group:tech", "article:4").unwrap();

    let n = store
        .zset_intersect_max("score:tech", &["group:tech", "score:"])
        .unwrap();
    assert_eq!(n, 2);
    assert_eq!(
        store.zset_range("score:tech", 0, -1, RangeOrder::Descending).unwrap(),
        vec!["article:3", "article:1"]
    );
    assert_eq!(store.zset_score("score:tech", "article:1").unwrap(), Some(500.0));
    assert_eq!(store.ttl("score:tech").unwrap(), None);
}

pub fn intersection_replaces_destination(store: &dyn IRankStore) {
    store.zset_add("score:", "article:1", 500.0).unwrap();
    store.set_add("group:tech", "article:1").unwrap();
    store.zset_add("score:tech", "article:stale", 1.0).unwrap();

    store
        .zset_intersect_max("score:tech", &["group:tech", "score:"])
        .unwrap();
    assert_eq!(
        store.zset_range("score:tech", 0, -1, RangeOrder::Descending).unwrap(),
        vec!["article:1"]
    );

    store.set_remove("group:tech", "article:1").unwrap();
    let n = store
        .zset_intersect_max("score:tech", &["group:tech", "score:"])
        .unwrap();
    assert_eq!(n, 0);
    assert!(!store.exists("score:tech").unwrap());
}

/// A reader racing a recomputing writer always sees the full view.
pub fn recompute_never_hides_the_view(store: &dyn IRankStore) {
    store.set_add("group:tech", "article:1").unwrap();
    store.zset_add("score:", "article:1", 10.0).unwrap();
    store.zset_add("score:", "article:2", 20.0).unwrap();
    store
        .zset_intersect_max("score:tech", &["group:tech", "score:"])
        .unwrap();

    let done = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..2_000 {
                store
                    .zset_intersect_max("score:tech", &["group:tech", "score:"])
                    .unwrap();
                store.expire("score:tech", Duration::from_secs(60)).unwrap();
            }
            done.store(true, Ordering::Release);
        });

        let mut reads = 0;
        while reads < 1_000 || !done.load(Ordering::Acquire) {
            let view = store
                .zset_range("score:tech", 0, -1, RangeOrder::Descending)
                .unwrap();
            assert_eq!(view, vec!["article:1"], "view vanished after {reads} reads");
            reads += 1;
        }
    });
}

pub fn wrong_type_is_refused(store: &dyn IRankStore) {
    store.zset_add("score:", "article:1", 1.0).unwrap();
    let err = store.set_add("score:", "article:1").unwrap_err();
    assert!(matches!(
        err,
        TallyError::StoreUnavailable(StorageError::WrongType { .. })
    ));
    assert!(store.hash_get_all("score:").is_err());
}

pub fn keys_expire_lazily(store: &dyn IRankStore, clock: &ManualClock) {
    store.zset_add("score:tech", "article:1", 1.0).unwrap();
    assert!(store.expire("score:tech", Duration::from_secs(60)).unwrap());
    assert_eq!(store.ttl("score:tech").unwrap(), Some(Duration::from_secs(60)));

    clock.advance(59);
    assert!(store.exists("score:tech").unwrap());
    assert_eq!(store.ttl("score:tech").unwrap(), Some(Duration::from_secs(1)));

    clock.advance(1);
    assert!(store.exists("score:tech").unwrap());
    assert_eq!(store.ttl("score:tech").unwrap(), Some(Duration::ZERO));

    clock.advance(1);
    assert!(!store.exists("score:tech").unwrap());
    assert_eq!(store.zset_card("score:tech").unwrap(), 0);
    assert!(store
        .zset_range("score:tech", 0, -1, RangeOrder::Descending)
        .unwrap()
        .is_empty());
    assert!(!store.expire("score:tech", Duration::from_secs(60)).unwrap());
}

pub fn expired_set_accepts_fresh_members(store: &dyn IRankStore, clock: &ManualClock) {
    store.set_add("voted:1", "alice").unwrap();
    store.expire("voted:1", Duration::from_secs(10)).unwrap();
    clock.advance(11);
    assert!(!store.set_contains("voted:1", "alice").unwrap());
    assert!(store.set_add("voted:1", "alice").unwrap());
    assert_eq!(store.ttl("voted:1").unwrap(), None);
}

pub fn expire_on_missing_key_is_false(store: &dyn IRankStore) {
    assert!(!store.expire("nothing", Duration::from_secs(5)).unwrap());
    assert_eq!(store.ttl("nothing").unwrap(), None);
}

pub fn nan_scores_are_refused(store: &dyn IRankStore) {
    assert!(store.zset_add("score:", "article:1", f64::NAN).is_err());
    store.zset_add("score:", "article:1", 1.0).unwrap();
    assert!(store.zset_incr("score:", "article:1", f64::NAN).is_err());
    assert_eq!(store.zset_score("score:", "article:1").unwrap(), Some(1.0));
}

/// Declares one `#[test]` per conformance check for a backend constructor
/// `fn() -> (impl IRankStore, Arc<ManualClock>)`.
macro_rules! conformance_tests {
    ($make:path) => {
        #[test]
        fn counter_increments_from_one() {
            let (store, _) = $make();
            common::counter_increments_from_one(&store);
        }

        #[test]
        fn set_add_reports_insertion() {
            let (store, _) = $make();
            common::set_add_reports_insertion(&store);
        }

        #[test]
        fn set_remove_is_idempotent() {
            let (store, _) = $make();
            common::set_remove_is_idempotent(&store);
        }

        #[test]
        fn hash_fields_round_trip() {
            let (store, _) = $make();
            common::hash_fields_round_trip(&store);
        }

        #[test]
        fn hash_incr_refuses_text() {
            let (store, _) = $make();
            common::hash_incr_refuses_text(&store);
        }

        #[test]
        fn zset_scores_and_ranges() {
            let (store, _) = $make();
            common::zset_scores_and_ranges(&store);
        }

        #[test]
        fn zset_incr_accumulates() {
            let (store, _) = $make();
            common::zset_incr_accumulates(&store);
        }

        #[test]
        fn intersection_keeps_max_score() {
            let (store, _) = $make();
            common::intersection_keeps_max_score(&store);
        }

        #[test]
        fn intersection_replaces_destination() {
            let (store, _) = $make();
            common::intersection_replaces_destination(&store);
        }

        #[test]
        fn recompute_never_hides_the_view() {
            let (store, _) = $make();
            common::recompute_never_hides_the_view(&store);
        }

        #[test]
        fn wrong_type_is_refused() {
            let (store, _) = $make();
            common::wrong_type_is_refused(&store);
        }

        #[test]
        fn keys_expire_lazily() {
            let (store, clock) = $make();
            common::keys_expire_lazily(&store, &clock);
        }

        #[test]
        fn expired_set_accepts_fresh_members() {
            let (store, clock) = $make();
            common::expired_set_accepts_fresh_members(&store, &clock);
        }

        #[test]
        fn expire_on_missing_key_is_false() {
            let (store, _) = $make();
            common::expire_on_missing_key_is_false(&store);
        }

        #[test]
        fn nan_scores_are_refused() {
            let (store, _) = $make();
            common::nan_scores_are_refused(&store);
        }
    };
}
