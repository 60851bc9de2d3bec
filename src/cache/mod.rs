//! Time-bounded memoization of live results, keyed by logical query.

use crate::plex::{LivePage, LiveQuery};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedPage {
    page: LivePage,
    stored_at: Instant,
}

pub struct ResultCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<LiveQuery, CachedPage>>,
}

impl ResultCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a copy of a fresh entry. An expired entry is dropped on the way.
    pub fn get(&self, key: &LiveQuery) -> Option<LivePage> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.page.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a page. At capacity, expired entries go first, then the oldest one.
    pub fn put(&self, key: LiveQuery, page: LivePage) {
        if self.max_entries == 0 || self.ttl.is_zero() {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.stored_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            key,
            CachedPage {
                page,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &LiveQuery) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    pub fn invalidate_all(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{test_records, MediaKind, Record};

    fn key(offset: usize) -> LiveQuery {
        LiveQuery::ListByKind {
            kind: MediaKind::Movie,
            limit: 2,
            offset,
        }
    }

    fn page(id: i64) -> LivePage {
        LivePage {
            items: vec![Record::Movie(test_records::movie(id, "Movie"))],
            total: 1,
        }
    }

    #[test]
    fn returns_stored_page_within_ttl() {
        let cache = ResultCache::new(Duration::from_secs(60), 10);
        assert!(cache.get(&key(0)).is_none());
        cache.put(key(0), page(1));
        assert_eq!(cache.get(&key(0)), Some(page(1)));
    }

    #[test]
    fn keys_include_every_parameter() {
        let cache = ResultCache::new(Duration::from_secs(60), 10);
        cache.put(key(0), page(1));
        assert!(cache.get(&key(2)).is_none());
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let cache = ResultCache::new(Duration::from_millis(20), 10);
        cache.put(key(0), page(1));
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get(&key(0)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest_entry() {
        let cache = ResultCache::new(Duration::from_secs(60), 2);
        cache.put(key(0), page(1));
        std::thread::sleep(Duration::from_millis(2));
        cache.put(key(1), page(2));
        std::thread::sleep(Duration::from_millis(2));
        cache.put(key(2), page(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(0)).is_none());
        assert_eq!(cache.get(&key(2)), Some(page(3)));
    }

    #[test]
    fn overwriting_a_key_does_not_evict() {
        let cache = ResultCache::new(Duration::from_secs(60), 2);
        cache.put(key(0), page(1));
        cache.put(key(1), page(2));
        cache.put(key(1), page(3));
        assert_eq!(cache.get(&key(0)), Some(page(1)));
        assert_eq!(cache.get(&key(1)), Some(page(3)));
    }

    #[test]
    fn invalidation() {
        let cache = ResultCache::new(Duration::from_secs(60), 10);
        cache.put(key(0), page(1));
        cache.put(key(1), page(2));
        cache.invalidate(&key(0));
        assert!(cache.get(&key(0)).is_none());
        assert!(cache.get(&key(1)).is_some());
        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
