//! Per-instance, time-bounded cache of resolved display names.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::domain::entities::{ClassName, MarketInstanceId};
use crate::util::age_string;

/// Cache TTL: 1 hour, counted from insertion.
pub const NAME_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct Cached {
    name: String,
    cached_at: Instant,
}

impl Cached {
    fn new(name: String) -> Self {
        Self {
            name,
            cached_at: Instant::now(),
        }
    }

    fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

type InstanceEntries = HashMap<ClassName, Cached>;

#[derive(Debug, Default)]
struct CacheState {
    instances: HashMap<MarketInstanceId, InstanceEntries>,
    /// Bumped by every invalidation of the instance.
    generations: HashMap<MarketInstanceId, u64>,
}

impl CacheState {
    fn generation(&self, instance_id: &str) -> u64 {
        self.generations.get(instance_id).copied().unwrap_or(0)
    }
}

/// Shared handle to the name cache. Clones see the same entries.
///
/// Writers read [`NameCache::generation`] before asking the name service and
/// pass it back on insert; an insert whose generation was overtaken by an
/// invalidation is dropped.
#[derive(Clone, Debug)]
pub struct NameCache {
    state: Arc<Mutex<CacheState>>,
    ttl: Duration,
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NameCache {
    pub fn new() -> Self {
        Self::with_ttl(NAME_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current invalidation generation of `instance_id`.
    pub async fn generation(&self, instance_id: &str) -> u64 {
        self.state.lock().await.generation(instance_id)
    }

    pub async fn get(&self, instance_id: &str, class_name: &str) -> Option<String> {
        let mut state = self.state.lock().await;
        let entries = state.instances.get_mut(instance_id)?;
        let entry = entries.get(class_name)?;

        if entry.is_expired(self.ttl) {
            debug!(
                instance_id,
                class_name,
                age = %age_string(entry.age()),
                "name cache entry expired"
            );
            entries.remove(class_name);
            return None;
        }

        Some(entry.name.clone())
    }

    /// Splits `class_names` into cached names and misses, keeping input order
    /// for the misses.
    pub async fn get_many(
        &self,
        instance_id: &str,
        class_names: &[ClassName],
    ) -> (HashMap<ClassName, String>, Vec<ClassName>) {
        let mut hits = HashMap::new();
        let mut misses: Vec<ClassName> = Vec::new();

        for class_name in class_names {
            if hits.contains_key(class_name) || misses.contains(class_name) {
                continue;
            }
            match self.get(instance_id, class_name).await {
                Some(name) => {
                    hits.insert(class_name.clone(), name);
                }
                None => misses.push(class_name.clone()),
            }
        }

        debug!(
            instance_id,
            hits = hits.len(),
            misses = misses.len(),
            "name cache lookup"
        );
        (hits, misses)
    }

    /// Stores `name` unless `instance_id` was invalidated after `generation`
    /// was read. Returns whether the entry was stored.
    pub async fn insert(
        &self,
        instance_id: &str,
        generation: u64,
        class_name: &str,
        name: String,
    ) -> bool {
        self.insert_many(instance_id, generation, [(class_name.to_string(), name)])
            .await
    }

    /// Batch form of [`NameCache::insert`].
    pub async fn insert_many<I>(&self, instance_id: &str, generation: u64, names: I) -> bool
    where
        I: IntoIterator<Item = (ClassName, String)>,
    {
        let mut state = self.state.lock().await;
        if state.generation(instance_id) != generation {
            debug!(instance_id, generation, "stale name lookup discarded");
            return false;
        }

        let entries = state.instances.entry(instance_id.to_string()).or_default();
        for (class_name, name) in names {
            entries.insert(class_name, Cached::new(name));
        }
        true
    }

    /// Drops every entry of `instance_id` and discards lookups still in
    /// flight for it. Returns how many entries were dropped.
    pub async fn invalidate(&self, instance_id: &str) -> usize {
        let removed = {
            let mut state = self.state.lock().await;
            *state.generations.entry(instance_id.to_string()).or_default() += 1;
            state
                .instances
                .remove(instance_id)
                .map(|entries| entries.len())
                .unwrap_or(0)
        };
        info!(instance_id, removed, "name cache invalidated");
        removed
    }

    /// Drops expired entries across all instances.
    pub async fn purge_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let mut removed = 0;
        for entries in state.instances.values_mut() {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(self.ttl));
            removed += before - entries.len();
        }
        state.instances.retain(|_, entries| !entries.is_empty());
        removed
    }

    pub async fn len(&self) -> usize {
        self.state
            .lock()
            .await
            .instances
            .values()
            .map(HashMap::len)
            .sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
