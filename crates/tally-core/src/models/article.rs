use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{TallyError, TallyResult};
use crate::keys::ArticleId;

/// Field names of the article record.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const LINK: &str = "link";
    pub const POSTER: &str = "poster";
    pub const TIME: &str = "time";
    pub const VOTES: &str = "votes";
}

/// A hydrated article record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Identity, attached on hydration so callers can address the article directly.
    pub id: ArticleId,
    pub title: String,
    pub link: String,
    pub poster: String,
    /// Posting time, seconds since the unix epoch.
    pub time: i64,
    /// Accepted votes including the poster's implicit one. Never decreases.
    pub votes: u64,
}

impl Article {
    /// Field/value pairs written when the article is created.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (fields::TITLE, self.title.clone()),
            (fields::LINK, self.link.clone()),
            (fields::POSTER, self.poster.clone()),
            (fields::TIME, self.time.to_string()),
            (fields::VOTES, self.votes.to_string()),
        ]
    }

    /// Build from a stored record. An empty record means the article does not exist.
    pub fn from_fields(id: ArticleId, record: &HashMap<String, String>) -> TallyResult<Self> {
        if record.is_empty() {
            return Err(TallyError::ArticleNotFound { id: id.to_string() });
        }
        Ok(Self {
            id,
            title: text_field(id, record, fields::TITLE)?,
            link: text_field(id, record, fields::LINK)?,
            poster: text_field(id, record, fields::POSTER)?,
            time: numeric_field(id, record, fields::TIME)?,
            votes: numeric_field(id, record, fields::VOTES)?,
        })
    }
}

fn text_field(id: ArticleId, record: &HashMap<String, String>, name: &str) -> TallyResult<String> {
    record
        .get(name)
        .cloned()
        .ok_or_else(|| malformed(id, format!("missing field {name}")))
}

fn numeric_field<T: std::str::FromStr>(
    id: ArticleId,
    record: &HashMap<String, String>,
    name: &str,
) -> TallyResult<T> {
    let raw = text_field(id, record, name)?;
    raw.parse()
        .map_err(|_| malformed(id, format!("field {name} is not numeric: {raw:?}")))
}

fn malformed(id: ArticleId, reason: String) -> TallyError {
    TallyError::MalformedRecord {
        key: id.key().to_string(),
        reason,
    }
}
