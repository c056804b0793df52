//! Request-coalescing entity cache

mod entity_cache;
mod loading;

pub use entity_cache::{CacheSettings, EntityCache, DEFAULT_WAIT_TIMEOUT};

/// The cache as used for table metadata
pub type MetaCache = EntityCache<crate::domain::meta::TableMeta>;
