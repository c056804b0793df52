//! Infrastructure layer - cache engine, HTTP client and collaborators

pub mod cache;
pub mod directory;
pub mod logging;
pub mod meta_api;
pub mod metrics;
pub mod reporter;

pub use cache::{CacheSettings, EntityCache, MetaCache};
pub use directory::InMemoryTitleDirectory;
pub use meta_api::MetaApiClient;
pub use reporter::TracingErrorReporter;
