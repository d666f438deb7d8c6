//! RankingEngine binds a store handle, a clock and the ranking config, and
//! exposes every engine operation.

use std::sync::Arc;

use tally_core::config::{RankingConfig, TallyConfig};
use tally_core::errors::TallyResult;
use tally_core::{
    Article, ArticleId, Clock, GroupChange, IRankStore, RankingOrder, SystemClock, VoteOutcome,
};

use crate::{articles, group_cache, groups, ledger, pagination};

/// The ranking engine. Cheap to clone; clones share the same store and clock.
#[derive(Clone)]
pub struct RankingEngine {
    store: Arc<dyn IRankStore>,
    clock: Arc<dyn Clock>,
    config: RankingConfig,
}

impl RankingEngine {
    /// Create an engine over `store`. Fails if `config` is invalid.
    pub fn new(
        store: Arc<dyn IRankStore>,
        clock: Arc<dyn Clock>,
        config: RankingConfig,
    ) -> TallyResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            config,
        })
    }

    /// Engine with the default ranking constants.
    pub fn with_defaults(store: Arc<dyn IRankStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            config: RankingConfig::default(),
        }
    }

    /// Open the configured store backend on the system clock.
    pub fn open(config: &TallyConfig) -> TallyResult<Self> {
        config.validate()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = tally_storage::open_store(&config.storage, clock.clone())?;
        Self::new(store, clock, config.ranking.clone())
    }

    pub fn store(&self) -> &dyn IRankStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    // --- Articles ---

    pub fn submit(&self, user: &str, title: &str, link: &str) -> TallyResult<ArticleId> {
        articles::submit(self.store(), &self.config, self.now(), user, title, link)
    }

    pub fn hydrate(&self, id: ArticleId) -> TallyResult<Article> {
        articles::hydrate(self.store(), id)
    }

    pub fn score(&self, id: ArticleId) -> TallyResult<Option<f64>> {
        articles::score(self.store(), id)
    }

    pub fn posted_at(&self, id: ArticleId) -> TallyResult<Option<i64>> {
        articles::posted_at(self.store(), id)
    }

    // --- Votes ---

    pub fn cast_vote(&self, user: &str, id: ArticleId) -> TallyResult<VoteOutcome> {
        ledger::cast_vote(self.store(), &self.config, self.now(), user, id)
    }

    // --- Listings ---

    pub fn list(
        &self,
        order: RankingOrder,
        page: usize,
        page_size: usize,
    ) -> TallyResult<Vec<Article>> {
        pagination::list(self.store(), order.index_key(), page, page_size)
    }

    /// `list` with the configured page size.
    pub fn list_default(&self, order: RankingOrder, page: usize) -> TallyResult<Vec<Article>> {
        self.list(order, page, self.config.articles_per_page)
    }

    // --- Groups ---

    pub fn add_to_groups(&self, id: ArticleId, groups: &[&str]) -> TallyResult<GroupChange> {
        groups::add_to_groups(self.store(), id, groups)
    }

    pub fn remove_from_groups(&self, id: ArticleId, groups: &[&str]) -> TallyResult<GroupChange> {
        groups::remove_from_groups(self.store(), id, groups)
    }

    pub fn update_groups(
        &self,
        id: ArticleId,
        to_add: &[&str],
        to_remove: &[&str],
    ) -> TallyResult<GroupChange> {
        groups::update_groups(self.store(), id, to_add, to_remove)
    }

    pub fn group_view(
        &self,
        group: &str,
        order: RankingOrder,
        page: usize,
        page_size: usize,
    ) -> TallyResult<Vec<Article>> {
        group_cache::group_view(self.store(), &self.config, group, order, page, page_size)
    }

    /// `group_view` with the configured page size.
    pub fn group_view_default(
        &self,
        group: &str,
        order: RankingOrder,
        page: usize,
    ) -> TallyResult<Vec<Article>> {
        self.group_view(group, order, page, self.config.articles_per_page)
    }
}
