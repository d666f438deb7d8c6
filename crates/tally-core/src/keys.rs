//! Key namespace: typed compound identifiers and the fixed key layout.
//!
//! ```text
//! article:          id counter
//! article:<id>      article record (hash)
//! voted:<id>        vote record (set)
//! score:            score index (sorted set)
//! time:             time index (sorted set)
//! group:<name>      group membership (set)
//! score:<name>      cached group-ranked view (sorted set), likewise time:<name>
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{TallyError, TallyResult};

pub const SEPARATOR: char = ':';

/// Counter that hands out article ids.
pub const ARTICLE_COUNTER: &str = "article:";
pub const SCORE_INDEX: &str = "score:";
pub const TIME_INDEX: &str = "time:";
pub const GROUP_PREFIX: &str = "group:";

/// Returns the text after the last separator, or `None` when `key` has no separator.
pub fn id_in_key(key: &str) -> Option<&str> {
    key.rfind(SEPARATOR).map(|idx| &key[idx + SEPARATOR.len_utf8()..])
}

/// Entity types that are addressed by a numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Article,
    Voted,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Voted => "voted",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "article" => Some(Self::Article),
            "voted" => Some(Self::Voted),
            _ => None,
        }
    }
}

/// Entity tag plus numeric id, rendered as `<tag>:<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: u64,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: u64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind.prefix(), SEPARATOR, self.id)
    }
}

impl FromStr for EntityKey {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        let idx = s
            .rfind(SEPARATOR)
            .ok_or_else(|| TallyError::invalid(format!("key {s:?} has no separator")))?;
        let kind = EntityKind::from_prefix(&s[..idx])
            .ok_or_else(|| TallyError::invalid(format!("key {s:?} has an unknown entity tag")))?;
        let id = parse_id(&s[idx + SEPARATOR.len_utf8()..], s)?;
        Ok(Self { kind, id })
    }
}

/// Identity of an article. Assigned by the id counter, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl ArticleId {
    /// `article:<id>`, the member stored in the indices and group sets.
    pub fn key(self) -> EntityKey {
        EntityKey::new(EntityKind::Article, self.0)
    }

    /// `voted:<id>`
    pub fn voted_key(self) -> EntityKey {
        EntityKey::new(EntityKind::Voted, self.0)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ArticleId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Accepts either a bare id (`"7"`) or an article key (`"article:7"`).
impl FromStr for ArticleId {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        if s.contains(SEPARATOR) {
            let key: EntityKey = s.parse()?;
            if key.kind != EntityKind::Article {
                return Err(TallyError::invalid(format!("{s:?} is not an article key")));
            }
            return Ok(Self(key.id));
        }
        parse_id(s, s).map(Self)
    }
}

/// `group:<name>`. Empty names are rejected.
pub fn group_key(name: &str) -> TallyResult<String> {
    check_group_name(name)?;
    Ok(format!("{GROUP_PREFIX}{name}"))
}

pub(crate) fn check_group_name(name: &str) -> TallyResult<()> {
    if name.is_empty() {
        return Err(TallyError::invalid("group name must not be empty"));
    }
    Ok(())
}

/// Ids are plain ASCII digits; `u64::from_str` alone would also take a leading `+`.
fn parse_id(text: &str, whole: &str) -> TallyResult<u64> {
    let invalid = || TallyError::invalid(format!("{whole:?} does not carry a numeric id"));
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    text.parse::<u64>().map_err(|_| invalid())
}
