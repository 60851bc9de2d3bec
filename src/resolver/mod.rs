//! Live-first resolution of catalog queries.
//!
//! Every operation tries the media server first (through the result cache)
//! and falls back to the local mirror on any live failure. Results carry the
//! path that produced them.

mod envelope;

pub use envelope::{HealthStatus, Provenance, Resolved};

use crate::cache::ResultCache;
use crate::config::AppConfig;
use crate::mirror_store::{MirrorStore, NullMirrorStore, SqliteMirrorStore};
use crate::model::{MediaKind, Record, TaggedRecord};
use crate::plex::{
    normalize_page, LiveFetchError, LivePage, LiveQuery, PlexClient, RemoteSource,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Resolver {
    live_mode: bool,
    remote: Arc<dyn RemoteSource>,
    cache: Arc<ResultCache>,
    store: Arc<dyn MirrorStore>,
}

impl Resolver {
    /// Create a new resolver.
    ///
    /// `live_mode` is fixed for the resolver's lifetime; with it off, every
    /// query is answered from the mirror without touching the network.
    pub fn new(
        live_mode: bool,
        remote: Arc<dyn RemoteSource>,
        cache: Arc<ResultCache>,
        store: Arc<dyn MirrorStore>,
    ) -> Self {
        Self {
            live_mode,
            remote,
            cache,
            store,
        }
    }

    /// Wires the production components from configuration.
    ///
    /// A mirror that cannot be opened is replaced by an empty store so the
    /// service still answers live queries.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn MirrorStore> =
            match SqliteMirrorStore::open(&config.db_path, config.read_pool_size) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    warn!(
                        "Mirror database unavailable at {:?}, fallback answers will be empty: {:#}",
                        config.db_path, e
                    );
                    Arc::new(NullMirrorStore)
                }
            };

        let remote = PlexClient::new(
            config.remote.url.clone(),
            config.remote.token.clone(),
            config.remote.timeout,
        )?;
        match remote.base_url() {
            _ if !config.remote.live_mode => info!("Live mode off, serving from the mirror only"),
            Some(url) if remote.is_configured() => {
                info!("Live mode on, media server at {}", url)
            }
            _ => info!("Media server URL or token missing, serving from the mirror only"),
        }

        let cache = ResultCache::new(config.cache.ttl, config.cache.max_entries);
        Ok(Self::new(
            config.remote.live_mode,
            Arc::new(remote),
            Arc::new(cache),
            store,
        ))
    }

    pub fn live_enabled(&self) -> bool {
        self.live_mode && self.remote.is_configured()
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            remote: self.live_enabled(),
            local: self.store.is_open(),
        }
    }

    pub async fn list_by_kind(
        &self,
        kind: MediaKind,
        limit: usize,
        offset: usize,
    ) -> Resolved<Vec<Record>> {
        let query = LiveQuery::ListByKind {
            kind,
            limit,
            offset,
        };
        match self.try_live(&query).await {
            Ok(mut page) => {
                page.items.truncate(limit);
                Resolved::live(page.items, Some(page.total))
            }
            Err(e) => {
                self.log_live_failure(&query, &e);
                let data = self
                    .from_mirror(move |store| store.list_by_kind(kind, limit, offset))
                    .await;
                let total = data.len();
                Resolved::from_mirror(data, Some(total))
            }
        }
    }

    /// Looks one record up. A live answer without the record is treated like
    /// a live failure, so `data: None` means neither path knows the id.
    pub async fn get_by_id(&self, kind: MediaKind, id: i64) -> Resolved<Option<Record>> {
        let query = LiveQuery::GetById { kind, id };
        match self.try_live(&query).await {
            Ok(page) => {
                if let Some(record) = page
                    .items
                    .into_iter()
                    .find(|r| r.kind() == kind && r.id() == id)
                {
                    return Resolved::live(Some(record), None);
                }
                debug!(query = %query, "Live answer did not contain the record, checking mirror");
            }
            Err(e) => self.log_live_failure(&query, &e),
        }
        let data = self.from_mirror(move |store| store.get_by_id(kind, id)).await;
        Resolved::from_mirror(data, None)
    }

    pub async fn list_children(
        &self,
        parent_kind: MediaKind,
        parent_id: i64,
    ) -> Resolved<Vec<Record>> {
        let query = LiveQuery::ListChildren {
            parent_kind,
            parent_id,
        };
        if parent_kind.child_kind().is_some() {
            match self.try_live(&query).await {
                Ok(page) => return Resolved::live(page.items, None),
                Err(e) => self.log_live_failure(&query, &e),
            }
        }
        let data = self
            .from_mirror(move |store| store.list_children(parent_kind, parent_id))
            .await;
        Resolved::from_mirror(data, None)
    }

    pub async fn search(&self, text: &str, limit: usize) -> Resolved<Vec<TaggedRecord>> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Resolved::from_mirror(Vec::new(), Some(0));
        }
        let query = LiveQuery::Search {
            text: text.clone(),
            limit,
        };
        match self.try_live(&query).await {
            Ok(page) => Self::tagged_live(page, limit),
            Err(e) => {
                self.log_live_failure(&query, &e);
                let data = self
                    .from_mirror(move |store| store.search(&text, limit))
                    .await;
                let total = data.len();
                Resolved::from_mirror(data, Some(total))
            }
        }
    }

    /// Recently added items. Mirror results are merged across kinds and
    /// re-sorted by recency.
    pub async fn list_recent(&self, limit: usize) -> Resolved<Vec<TaggedRecord>> {
        let query = LiveQuery::Recent { limit };
        match self.try_live(&query).await {
            Ok(page) => Self::tagged_live(page, limit),
            Err(e) => {
                self.log_live_failure(&query, &e);
                let data = self.from_mirror(move |store| store.list_recent(limit)).await;
                let total = data.len();
                Resolved::from_mirror(data, Some(total))
            }
        }
    }

    fn tagged_live(page: LivePage, limit: usize) -> Resolved<Vec<TaggedRecord>> {
        let data: Vec<TaggedRecord> = page
            .items
            .into_iter()
            .take(limit)
            .map(Record::tagged)
            .collect();
        Resolved::live(data, Some(page.total))
    }

    async fn try_live(&self, query: &LiveQuery) -> Result<LivePage, LiveFetchError> {
        if !self.live_enabled() {
            return Err(LiveFetchError::Disabled);
        }
        if let Some(page) = self.cache.get(query) {
            debug!(query = %query, "Serving live result from cache");
            return Ok(page);
        }
        let payload = self.remote.fetch(query).await?;
        let page = normalize_page(&payload, query.expected_kind())?;
        self.cache.put(query.clone(), page.clone());
        Ok(page)
    }

    fn log_live_failure(&self, query: &LiveQuery, error: &LiveFetchError) {
        match error {
            LiveFetchError::Disabled => debug!(query = %query, "Live mode off, serving from mirror"),
            _ => warn!(query = %query, error = %error, "Live fetch failed, serving from mirror"),
        }
    }

    /// Runs a mirror read on the blocking pool.
    async fn from_mirror<T, F>(&self, read: F) -> T
    where
        T: Default + Send + 'static,
        F: FnOnce(&dyn MirrorStore) -> T + Send + 'static,
    {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || read(store.as_ref())).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Mirror read task failed");
                T::default()
            }
        }
    }
}
