//! Display-name resolution for class names.
//!
//! - Looks names up through a [`NameService`] collaborator.
//! - Caches resolved names per market instance for a fixed TTL.
//! - Degrades to prettified class names whenever the service cannot answer.

use std::{collections::HashMap, fmt, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::cache::NameCache;
use crate::domain::entities::ClassName;
use crate::util::config::EngineConfig;

/// Marker appended to names derived from the class name.
pub const MISSING_NAME_TAG: &str = "(-)";

#[derive(Debug, Error)]
pub enum NameServiceError {
    #[error("name service unreachable: {0}")]
    Unavailable(String),
    #[error("no name table configured for instance {0}")]
    NotConfigured(String),
    #[error("name service timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of a bulk lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResolution {
    pub resolved: HashMap<ClassName, String>,
    pub unresolved: Vec<ClassName>,
}

impl BulkResolution {
    /// One display name per input class name, in input order.
    pub fn to_display_names(&self, class_names: &[ClassName]) -> Vec<DisplayName> {
        class_names
            .iter()
            .map(|class_name| match self.resolved.get(class_name) {
                Some(name) => DisplayName::resolved(name.clone()),
                None => DisplayName::prettified(class_name),
            })
            .collect()
    }
}

/// The name table of a market instance, owned by an external service.
#[async_trait]
pub trait NameService: Send + Sync {
    /// `Ok(None)` when the instance has a table but not this class.
    async fn resolve(
        &self,
        instance_id: &str,
        class_name: &str,
    ) -> Result<Option<String>, NameServiceError>;

    async fn resolve_bulk(
        &self,
        instance_id: &str,
        class_names: &[ClassName],
    ) -> Result<BulkResolution, NameServiceError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameSource {
    Resolved,
    Prettified,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName {
    pub name: String,
    pub source: NameSource,
}

impl DisplayName {
    pub fn resolved(name: String) -> Self {
        Self {
            name,
            source: NameSource::Resolved,
        }
    }

    pub fn prettified(class_name: &str) -> Self {
        Self {
            name: prettify_class_name(class_name),
            source: NameSource::Prettified,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.source == NameSource::Resolved
    }

    /// Name with `tag` appended if it was derived from the class name.
    pub fn tagged(&self, tag: &str) -> String {
        match self.source {
            NameSource::Resolved => self.name.clone(),
            NameSource::Prettified => format!("{} {tag}", self.name),
        }
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// `"unknown_class"` -> `"Unknown Class"`.
pub fn prettify_class_name(class_name: &str) -> String {
    class_name
        .replace(['-', '_'], " ")
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct NameResolver<S> {
    service: Arc<S>,
    cache: NameCache,
    lookup_timeout: Option<Duration>,
}

impl<S> Clone for NameResolver<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cache: self.cache.clone(),
            lookup_timeout: self.lookup_timeout,
        }
    }
}

impl<S: NameService> NameResolver<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            cache: NameCache::new(),
            lookup_timeout: None,
        }
    }

    pub fn from_config(service: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            service,
            cache: NameCache::with_ttl(config.name_cache_ttl()),
            lookup_timeout: config.lookup_timeout(),
        }
    }

    pub fn with_cache(mut self, cache: NameCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    /// Handle to hand to the name service so it can signal table changes.
    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    /// Forget every cached name of `instance_id`.
    pub async fn invalidate(&self, instance_id: &str) {
        self.cache.invalidate(instance_id).await;
    }

    /// Resolves one class name; never fails.
    pub async fn resolve_name(&self, instance_id: &str, class_name: &str) -> DisplayName {
        let generation = self.cache.generation(instance_id).await;
        if let Some(name) = self.cache.get(instance_id, class_name).await {
            debug!(instance_id, class_name, "name cache hit");
            return DisplayName::resolved(name);
        }

        match self.call(self.service.resolve(instance_id, class_name)).await {
            Ok(Some(name)) => {
                self.cache
                    .insert(instance_id, generation, class_name, name.clone())
                    .await;
                DisplayName::resolved(name)
            }
            Ok(None) => DisplayName::prettified(class_name),
            Err(error) => {
                warn!(instance_id, class_name, %error, "name lookup failed, prettifying");
                DisplayName::prettified(class_name)
            }
        }
    }

    /// Resolves many class names at once; never fails.
    ///
    /// `unresolved` lists the class names without a table entry, in input
    /// order and without duplicates.
    pub async fn resolve_names_bulk(
        &self,
        instance_id: &str,
        class_names: &[ClassName],
    ) -> BulkResolution {
        let generation = self.cache.generation(instance_id).await;
        let (mut resolved, misses) = self.cache.get_many(instance_id, class_names).await;

        if !misses.is_empty() {
            match self.call(self.service.resolve_bulk(instance_id, &misses)).await {
                Ok(response) => {
                    let fresh: Vec<(ClassName, String)> = response
                        .resolved
                        .into_iter()
                        .filter(|(class_name, _)| misses.contains(class_name))
                        .collect();
                    self.cache
                        .insert_many(instance_id, generation, fresh.iter().cloned())
                        .await;
                    resolved.extend(fresh);
                }
                Err(error) => {
                    warn!(
                        instance_id,
                        count = misses.len(),
                        %error,
                        "bulk name lookup failed, prettifying"
                    );
                }
            }
        }

        let unresolved = misses
            .into_iter()
            .filter(|class_name| !resolved.contains_key(class_name))
            .collect();

        BulkResolution {
            resolved,
            unresolved,
        }
    }

    /// Display names for `class_names`, in input order.
    pub async fn display_names(
        &self,
        instance_id: &str,
        class_names: &[ClassName],
    ) -> Vec<DisplayName> {
        if class_names.is_empty() {
            return Vec::new();
        }
        self.resolve_names_bulk(instance_id, class_names)
            .await
            .to_display_names(class_names)
    }

    async fn call<T, F>(&self, request: F) -> Result<T, NameServiceError>
    where
        F: Future<Output = Result<T, NameServiceError>>,
    {
        match self.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(NameServiceError::Timeout(limit))),
            None => request.await,
        }
    }
}
