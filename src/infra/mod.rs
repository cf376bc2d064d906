//! Collaborator seams: name service, name cache, configuration snapshot.

pub mod cache;
pub mod memory;
pub mod names;
pub mod snapshot;

pub use cache::{NameCache, NAME_CACHE_TTL};
pub use memory::InMemoryNameService;
pub use names::{
    prettify_class_name, BulkResolution, DisplayName, NameResolver, NameService,
    NameServiceError, NameSource, MISSING_NAME_TAG,
};
pub use snapshot::{MarketSnapshot, SnapshotError};
