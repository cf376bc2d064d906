use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::cache::NameCache;
use super::names::{BulkResolution, NameService, NameServiceError};
use crate::domain::entities::{ClassName, MarketInstanceId};

/// Name tables held in memory, one per market instance.
///
/// Replacing or clearing a table invalidates that instance in every
/// subscribed [`NameCache`].
#[derive(Debug, Default)]
pub struct InMemoryNameService {
    tables: RwLock<HashMap<MarketInstanceId, HashMap<ClassName, String>>>,
    subscribers: RwLock<Vec<NameCache>>,
}

impl InMemoryNameService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, cache: NameCache) {
        self.subscribers.write().await.push(cache);
    }

    pub async fn replace_names(&self, instance_id: &str, table: HashMap<ClassName, String>) {
        let count = table.len();
        self.tables
            .write()
            .await
            .insert(instance_id.to_string(), table);
        info!(instance_id, count, "name table replaced");
        self.notify(instance_id).await;
    }

    pub async fn clear_names(&self, instance_id: &str) {
        self.tables.write().await.remove(instance_id);
        info!(instance_id, "name table cleared");
        self.notify(instance_id).await;
    }

    pub async fn names(&self, instance_id: &str) -> Option<HashMap<ClassName, String>> {
        self.tables.read().await.get(instance_id).cloned()
    }

    async fn notify(&self, instance_id: &str) {
        for cache in self.subscribers.read().await.iter() {
            cache.invalidate(instance_id).await;
        }
    }
}

#[async_trait]
impl NameService for InMemoryNameService {
    async fn resolve(
        &self,
        instance_id: &str,
        class_name: &str,
    ) -> Result<Option<String>, NameServiceError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(instance_id)
            .ok_or_else(|| NameServiceError::NotConfigured(instance_id.to_string()))?;
        Ok(table.get(class_name).cloned())
    }

    async fn resolve_bulk(
        &self,
        instance_id: &str,
        class_names: &[ClassName],
    ) -> Result<BulkResolution, NameServiceError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(instance_id)
            .ok_or_else(|| NameServiceError::NotConfigured(instance_id.to_string()))?;

        let mut response = BulkResolution::default();
        for class_name in class_names {
            match table.get(class_name) {
                Some(name) => {
                    response.resolved.insert(class_name.clone(), name.clone());
                }
                None => response.unresolved.push(class_name.clone()),
            }
        }
        Ok(response)
    }
}
