//! Collaborator traits the cache depends on

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Fetches a full record from the remote service by canonical id
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordFetcher<T: Send + Sync + 'static>: Send + Sync {
    /// Fails with [`DomainError::RemoteFetch`] on transport, server, or unknown-id errors
    async fn fetch_by_id(&self, id: &str) -> Result<T, DomainError>;
}

/// Maps a display title to its canonical identifier
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TitleDirectory: Send + Sync {
    async fn find_id_by_title(&self, title: &str) -> Option<String>;
}

/// User-facing error channel
#[cfg_attr(test, automock)]
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str);
}
