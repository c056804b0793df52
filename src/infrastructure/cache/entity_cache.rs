//! Request-coalescing record cache indexed by id and title

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use metrics::counter;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::loading::LoadingRegistry;
use crate::domain::meta::{
    CachedRecord, ErrorReporter, IdentifierFormat, RecordFetcher, TitleDirectory,
};
use crate::domain::DomainError;
use crate::infrastructure::metrics::{
    CACHE_FETCHES, CACHE_HITS, CACHE_MISSES, CACHE_WAIT_TIMEOUTS,
};

/// How long a caller waits on another caller's in-flight fetch before fetching itself
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings for [`EntityCache`]
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub id_format: IdentifierFormat,
    pub wait_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            id_format: IdentifierFormat::default(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl CacheSettings {
    pub fn with_id_format(mut self, id_format: IdentifierFormat) -> Self {
        self.id_format = id_format;
        self
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }
}

struct CacheState<T> {
    values: HashMap<String, Arc<T>>,
    loading: LoadingRegistry,
}

/// Outcome of the admission step of a lookup
enum Admission<'a, T> {
    Hit(Arc<T>),
    Wait(watch::Receiver<()>),
    Load(LoadingGuard<'a, T>),
}

/// Holds the loading mark for one key; releases it on drop
struct LoadingGuard<'a, T> {
    state: &'a Mutex<CacheState<T>>,
    key: String,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.loading.release(&self.key) {
            debug!(key = %self.key, "Loading finished");
        }
    }
}

/// In-memory cache of remote records, addressable by canonical id or by title
///
/// Every stored record is indexed under both aliases, sharing one `Arc`.
/// Concurrent lookups of the same key are coalesced: while one caller fetches,
/// others wait (bounded by [`CacheSettings::wait_timeout`]) and then re-read
/// the store. The cache is unbounded and only shrinks through
/// [`remove`](Self::remove) and [`clear`](Self::clear).
pub struct EntityCache<T: CachedRecord> {
    state: Mutex<CacheState<T>>,
    fetcher: Arc<dyn RecordFetcher<T>>,
    directory: Arc<dyn TitleDirectory>,
    reporter: Arc<dyn ErrorReporter>,
    settings: CacheSettings,
}

impl<T: CachedRecord> std::fmt::Debug for EntityCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("EntityCache")
            .field("entries", &state.values.len())
            .field("loading", &state.loading.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<T: CachedRecord> EntityCache<T> {
    pub fn new(
        fetcher: Arc<dyn RecordFetcher<T>>,
        directory: Arc<dyn TitleDirectory>,
        reporter: Arc<dyn ErrorReporter>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            state: Mutex::new(CacheState {
                values: HashMap::new(),
                loading: LoadingRegistry::default(),
            }),
            fetcher,
            directory,
            reporter,
            settings,
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Looks up a record by id or title, fetching it if needed
    ///
    /// Returns `None` for an empty key, an unknown title, or a failed fetch.
    /// Fetch failures are passed to the [`ErrorReporter`] first; unknown titles
    /// are only logged.
    pub async fn get(&self, key: &str, force: bool) -> Option<Arc<T>> {
        match self.try_get(key, force).await {
            Ok(record) => Some(record),
            Err(DomainError::EmptyKey | DomainError::UnresolvedName { .. }) => None,
            Err(err) => {
                self.reporter.report(&err.user_message());
                None
            }
        }
    }

    /// Same lookup as [`get`](Self::get), but surfaces why it produced nothing
    pub async fn try_get(&self, key: &str, force: bool) -> Result<Arc<T>, DomainError> {
        if key.is_empty() {
            return Err(DomainError::EmptyKey);
        }

        let _guard = match self.admit(key, force) {
            Admission::Hit(record) => return Ok(record),
            Admission::Load(guard) => guard,
            Admission::Wait(done) => {
                self.wait_for(key, done).await;
                match self.admit_after_wait(key) {
                    Ok(record) => return Ok(record),
                    Err(guard) => guard,
                }
            }
        };

        counter!(CACHE_MISSES).increment(1);
        let result = self.load(key).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(DomainError::UnresolvedName { .. }) => "unresolved",
            Err(_) => "error",
        };
        counter!(CACHE_FETCHES, "outcome" => outcome).increment(1);

        result
    }

    /// Stores `record` under both its id and its title
    pub fn put(&self, record: T) -> Result<Arc<T>, DomainError> {
        self.store(record)
    }

    /// Removes every entry; in-flight fetches are not affected
    pub fn clear(&self) {
        self.lock_state().values.clear();
    }

    /// Removes the record known as `id_or_title` under both of its aliases
    pub fn remove(&self, id_or_title: &str) -> Option<Arc<T>> {
        let mut state = self.lock_state();
        let record = state.values.get(id_or_title).cloned()?;

        if let Some(id) = record.id() {
            state.values.remove(id);
        }
        if let Some(title) = record.title() {
            state.values.remove(title);
        }

        Some(record)
    }

    /// Reads the store without fetching or waiting
    pub fn peek(&self, key: &str) -> Option<Arc<T>> {
        self.lock_state().values.get(key).cloned()
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.lock_state().loading.contains(key)
    }

    /// Number of alias entries (two per distinct record, unless id equals title)
    pub fn len(&self) -> usize {
        self.lock_state().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().values.is_empty()
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decides hit, wait or load for `key` in a single critical section
    fn admit(&self, key: &str, force: bool) -> Admission<'_, T> {
        let mut state = self.lock_state();

        if !force {
            if let Some(done) = state.loading.subscribe(key) {
                return Admission::Wait(done);
            }
        }

        match self.hit_or_mark(&mut state, key, force) {
            Ok(record) => Admission::Hit(record),
            Err(guard) => Admission::Load(guard),
        }
    }

    /// Re-reads the store once a wait ended; `Err` carries the loading mark
    /// for a fetch of our own, not a failure
    fn admit_after_wait(&self, key: &str) -> Result<Arc<T>, LoadingGuard<'_, T>> {
        let mut state = self.lock_state();
        self.hit_or_mark(&mut state, key, false)
    }

    fn hit_or_mark(
        &self,
        state: &mut CacheState<T>,
        key: &str,
        force: bool,
    ) -> Result<Arc<T>, LoadingGuard<'_, T>> {
        if !force {
            if let Some(record) = state.values.get(key) {
                debug!(key, "Cache hit");
                counter!(CACHE_HITS).increment(1);
                return Ok(Arc::clone(record));
            }
        }

        state.loading.acquire(key);
        Err(LoadingGuard {
            state: &self.state,
            key: key.to_string(),
        })
    }

    async fn wait_for(&self, key: &str, mut done: watch::Receiver<()>) {
        debug!(key, "Waiting for in-flight fetch");

        let timeout = self.settings.wait_timeout;
        if tokio::time::timeout(timeout, done.changed()).await.is_err() {
            counter!(CACHE_WAIT_TIMEOUTS).increment(1);
            debug!(
                key,
                timeout_ms = timeout.as_millis() as u64,
                "Timed out waiting for in-flight fetch"
            );
        }
    }

    async fn load(&self, key: &str) -> Result<Arc<T>, DomainError> {
        let id = self.resolve_id(key).await?;

        debug!(key, id = %id, "Cache miss, fetching record");
        let record = self.fetcher.fetch_by_id(&id).await?;

        self.store(record).map_err(|err| {
            DomainError::remote_fetch(format!(
                "Unusable record returned for '{}': {}",
                id,
                err.user_message()
            ))
        })
    }

    async fn resolve_id(&self, key: &str) -> Result<String, DomainError> {
        if self.settings.id_format.is_canonical(key) {
            return Ok(key.to_string());
        }

        match self.directory.find_id_by_title(key).await {
            Some(id) => Ok(id),
            None => {
                warn!(key, "Table '{}' is not found in the table list", key);
                Err(DomainError::unresolved_name(key))
            }
        }
    }

    fn store(&self, record: T) -> Result<Arc<T>, DomainError> {
        let (id, title) = record
            .aliases()
            .map(|(id, title)| (id.to_string(), title.to_string()))?;
        let record = Arc::new(record);

        let mut state = self.lock_state();
        state.values.insert(id, Arc::clone(&record));
        state.values.insert(title, Arc::clone(&record));

        Ok(record)
    }
}
