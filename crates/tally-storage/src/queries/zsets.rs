use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use tally_core::errors::{StorageError, TallyResult};
use tally_core::traits::resolve_rank_range;
use tally_core::RangeOrder;

use super::keyspace::{expect_kind, live_kind, prepare_write, purge_key, KeyKind};
use crate::to_storage_err;

fn check_score(key: &str, score: f64) -> TallyResult<()> {
    if score.is_nan() {
        return Err(StorageError::InvalidValue {
            key: key.to_string(),
            reason: "score is not a number".to_string(),
        }
        .into());
    }
    Ok(())
}

fn stored_score(conn: &Connection, key: &str, member: &str) -> TallyResult<Option<f64>> {
    conn.query_row(
        "SELECT score FROM kv_zsets WHERE key = ?1 AND member = ?2",
        params![key, member],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

fn upsert(conn: &Connection, key: &str, member: &str, score: f64) -> TallyResult<()> {
    conn.execute(
        "INSERT INTO kv_zsets (key, member, score) VALUES (?1, ?2, ?3)
         ON CONFLICT(key, member) DO UPDATE SET score = excluded.score",
        params![key, member, score],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn add(conn: &Connection, key: &str, member: &str, score: f64, now: i64) -> TallyResult<bool> {
    check_score(key, score)?;
    prepare_write(conn, key, KeyKind::SortedSet, now)?;
    let existed = stored_score(conn, key, member)?.is_some();
    upsert(conn, key, member, score)?;
    Ok(!existed)
}

pub fn incr(conn: &Connection, key: &str, member: &str, delta: f64, now: i64) -> TallyResult<f64> {
    check_score(key, delta)?;
    prepare_write(conn, key, KeyKind::SortedSet, now)?;
    let next = stored_score(conn, key, member)?.unwrap_or(0.0) + delta;
    check_score(key, next)?;
    upsert(conn, key, member, next)?;
    Ok(next)
}

pub fn score(conn: &Connection, key: &str, member: &str, now: i64) -> TallyResult<Option<f64>> {
    if !expect_kind(conn, key, KeyKind::SortedSet, now)? {
        return Ok(None);
    }
    stored_score(conn, key, member)
}

pub fn card(conn: &Connection, key: &str, now: i64) -> TallyResult<usize> {
    if !expect_kind(conn, key, KeyKind::SortedSet, now)? {
        return Ok(0);
    }
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM kv_zsets WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

pub fn range(
    conn: &Connection,
    key: &str,
    start: i64,
    stop: i64,
    order: RangeOrder,
    now: i64,
) -> TallyResult<Vec<String>> {
    let len = card(conn, key, now)?;
    let Some((start, stop)) = resolve_rank_range(len, start, stop) else {
        return Ok(Vec::new());
    };
    let sql = match order {
        RangeOrder::Ascending => {
            "SELECT member FROM kv_zsets WHERE key = ?1
             ORDER BY score ASC, member ASC LIMIT ?2 OFFSET ?3"
        }
        RangeOrder::Descending => {
            "SELECT member FROM kv_zsets WHERE key = ?1
             ORDER BY score DESC, member DESC LIMIT ?2 OFFSET ?3"
        }
    };
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![key, (stop - start + 1) as i64, start as i64],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<String>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Member scores of a live set (1.0 each) or sorted set; empty when absent.
fn source_scores(conn: &Connection, key: &str, now: i64) -> TallyResult<HashMap<String, f64>> {
    let sql = match live_kind(conn, key, now)? {
        None => return Ok(HashMap::new()),
        Some(KeyKind::SortedSet) => "SELECT member, score FROM kv_zsets WHERE key = ?1",
        Some(KeyKind::Set) => "SELECT member, 1.0 FROM kv_sets WHERE key = ?1",
        Some(other) => {
            return Err(StorageError::WrongType {
                key: key.to_string(),
                expected: KeyKind::SortedSet.as_str(),
                actual: other.as_str(),
            }
            .into())
        }
    };
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![key], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<HashMap<String, f64>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Replace `dest` with the max-aggregated intersection of `sources`.
pub fn intersect_max(conn: &Connection, dest: &str, sources: &[&str], now: i64) -> TallyResult<usize> {
    let mut result: Option<HashMap<String, f64>> = None;
    for source in sources {
        let scores = source_scores(conn, source, now)?;
        result = Some(match result {
            None => scores,
            Some(acc) => acc
                .into_iter()
                .filter_map(|(member, score)| {
                    scores.get(&member).map(|other| (member, score.max(*other)))
                })
                .collect(),
        });
    }
    let result = result.unwrap_or_default();

    purge_key(conn, dest)?;
    if result.is_empty() {
        return Ok(0);
    }
    prepare_write(conn, dest, KeyKind::SortedSet, now)?;
    for (member, score) in &result {
        upsert(conn, dest, member, *score)?;
    }
    Ok(result.len())
}
