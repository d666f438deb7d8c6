use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use tally_core::{ArticleId, ManualClock, RankingOrder};
use tally_ranking::RankingEngine;
use tally_storage::MemoryStore;

/// 1K articles, every tenth in group "bench", a handful of votes each.
fn build_engine() -> (RankingEngine, Arc<ManualClock>, Vec<ArticleId>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let engine = RankingEngine::with_defaults(store, clock.clone());

    let mut ids = Vec::with_capacity(1_000);
    for i in 0..1_000 {
        clock.advance(1);
        let id = engine
            .submit(&format!("poster-{i}"), &format!("Article {i}"), "http://example.com")
            .unwrap();
        for v in 0..(i % 7) {
            engine.cast_vote(&format!("voter-{v}"), id).unwrap();
        }
        if i % 10 == 0 {
            engine.add_to_groups(id, &["bench"]).unwrap();
        }
        ids.push(id);
    }
    (engine, clock, ids)
}

fn bench_list_first_page(c: &mut Criterion) {
    let (engine, _, _) = build_engine();
    c.bench_function("list_score_page_1_of_1k", |b| {
        b.iter(|| engine.list_default(RankingOrder::Score, 1).unwrap());
    });
}

fn bench_group_view_cached(c: &mut Criterion) {
    let (engine, _, _) = build_engine();
    engine.group_view_default("bench", RankingOrder::Score, 1).unwrap();
    c.bench_function("group_view_cached", |b| {
        b.iter(|| engine.group_view_default("bench", RankingOrder::Score, 1).unwrap());
    });
}

fn bench_group_view_recompute(c: &mut Criterion) {
    let (engine, clock, _) = build_engine();
    c.bench_function("group_view_recompute", |b| {
        b.iter(|| {
            clock.advance(61);
            engine.group_view_default("bench", RankingOrder::Score, 1).unwrap()
        });
    });
}

fn bench_duplicate_vote(c: &mut Criterion) {
    let (engine, _, ids) = build_engine();
    let target = ids[ids.len() - 1];
    engine.cast_vote("bench-voter", target).unwrap();
    c.bench_function("duplicate_vote", |b| {
        b.iter(|| engine.cast_vote("bench-voter", target).unwrap());
    });
}

criterion_group!(
    benches,
    bench_list_first_page,
    bench_group_view_cached,
    bench_group_view_recompute,
    bench_duplicate_vote
);
criterion_main!(benches);
