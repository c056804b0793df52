//! Table metadata cache
//!
//! Serves table schema records from memory, keyed by both canonical id and
//! title, in front of a remote schema API:
//! - Concurrent lookups of one key share a single fetch
//! - Titles are resolved to ids through the project's table list
//! - Explicit invalidation and forced refresh

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::DomainError;
use infrastructure::{
    CacheSettings, InMemoryTitleDirectory, MetaApiClient, MetaCache, TracingErrorReporter,
};
use tracing::info;

/// Everything needed to serve metadata lookups for one session
#[derive(Debug, Clone)]
pub struct MetaContext {
    pub cache: Arc<MetaCache>,
    pub client: Arc<MetaApiClient>,
    pub directory: Arc<InMemoryTitleDirectory>,
    project_id: Option<String>,
}

impl MetaContext {
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Reloads the table list used for title lookups
    ///
    /// Returns the number of known tables. Without a configured project the
    /// directory is left empty and only canonical ids can be looked up.
    pub async fn refresh_directory(&self) -> Result<usize, DomainError> {
        let Some(project_id) = self.project_id.as_deref() else {
            info!("No project configured, title lookups are disabled");
            return Ok(0);
        };

        let tables = self.client.list_tables(project_id).await?;
        let count = tables.len();
        self.directory.set_tables(tables);

        info!(project_id, tables = count, "Table directory loaded");
        Ok(count)
    }
}

/// Wires the cache to the HTTP client, the directory and the tracing reporter
pub fn create_meta_context(config: &AppConfig) -> Result<MetaContext, DomainError> {
    let client = Arc::new(MetaApiClient::new(&config.api)?);
    let directory = Arc::new(InMemoryTitleDirectory::new());

    let cache = Arc::new(MetaCache::new(
        client.clone(),
        directory.clone(),
        Arc::new(TracingErrorReporter),
        CacheSettings::from(&config.cache),
    ));

    Ok(MetaContext {
        cache,
        client,
        directory,
        project_id: config.api.project_id.clone(),
    })
}
