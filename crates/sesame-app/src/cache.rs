//! Query cache with typed keys.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace};

use sesame_core::Result;

/// Logical cache entries. One entry per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Whether a user is signed in (`bool`).
    Session,
    /// The signed-in user (`Option<User>`).
    CurrentUser,
    /// The directory listing (`Vec<UserRecord>`).
    Users,
    /// A single directory record (`UserRecord`).
    UserDetail(u64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Session => f.write_str("auth/session"),
            CacheKey::CurrentUser => f.write_str("auth/user"),
            CacheKey::Users => f.write_str("users"),
            CacheKey::UserDetail(id) => write!(f, "users/{}", id),
        }
    }
}

/// Snapshot of one cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    /// A fetch for this key is in flight.
    pub is_fetching: bool,
    /// Nothing has been loaded yet and no fetch has failed.
    pub is_pending: bool,
    /// The data is older than the stale time or was invalidated.
    pub is_stale: bool,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
}

type Value = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Entry {
    value: Option<Value>,
    updated_at: Option<Instant>,
    invalidated: bool,
    fetching: usize,
    /// Bumped by every write and invalidation; a fetch only stores its
    /// result if the generation is unchanged since it started.
    generation: u64,
    error: Option<String>,
}

impl Entry {
    fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated
            || self
                .updated_at
                .is_none_or(|at| at.elapsed() >= stale_time)
    }

    fn read<T: Clone + 'static>(&self) -> Option<T> {
        self.value
            .as_ref()
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }
}

struct Inner {
    entries: Mutex<HashMap<CacheKey, Entry>>,
    changes: watch::Sender<u64>,
    stale_time: Duration,
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }
}

/// Decrements the in-flight count when a fetch ends, even if its future is
/// dropped before completing.
struct InFlight<'a> {
    inner: &'a Inner,
    key: CacheKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.inner.entries().get_mut(&self.key) {
            entry.fetching = entry.fetching.saturating_sub(1);
        }
        self.inner.notify();
    }
}

/// Shared cache for query results.
///
/// Reads go through [`QueryCache::fetch`], which serves fresh data from the
/// cache and otherwise runs the supplied fetcher. Writers either
/// [`invalidate`](QueryCache::invalidate) a key, forcing the next read to
/// refetch, or [`set_data`](QueryCache::set_data) directly. Every change is
/// announced on the channel returned by [`subscribe`](QueryCache::subscribe).
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                changes,
                stale_time,
            }),
        }
    }

    /// Read `key`, running `fetcher` when the cached value is missing, stale
    /// or invalidated.
    ///
    /// The fetched value is returned to the caller either way, but it is
    /// only stored if nobody wrote or invalidated `key` while the fetch was
    /// in flight.
    pub async fn fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let generation = {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key).or_default();
            if !entry.is_stale(self.inner.stale_time)
                && let Some(value) = entry.read::<T>()
            {
                trace!(%key, "cache hit");
                return Ok(value);
            }
            entry.fetching += 1;
            entry.generation
        };
        self.inner.notify();

        let in_flight = InFlight {
            inner: &self.inner,
            key,
        };
        debug!(%key, "fetching");
        let result = fetcher().await;

        {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key).or_default();
            if entry.generation != generation {
                debug!(%key, "discarding result of superseded fetch");
            } else {
                match &result {
                    Ok(value) => {
                        entry.value = Some(Arc::new(value.clone()));
                        entry.updated_at = Some(Instant::now());
                        entry.invalidated = false;
                        entry.error = None;
                    }
                    // The entry stays invalidated until a fetch succeeds.
                    Err(e) => entry.error = Some(e.to_string()),
                }
            }
        }
        drop(in_flight);

        result
    }

    /// Returns the cached value for `key`, fresh or not.
    pub fn get<T: Clone + 'static>(&self, key: CacheKey) -> Option<T> {
        self.inner.entries().get(&key).and_then(Entry::read)
    }

    /// Snapshot the state of `key`.
    pub fn state<T: Clone + 'static>(&self, key: CacheKey) -> QueryState<T> {
        let entries = self.inner.entries();
        match entries.get(&key) {
            Some(entry) => QueryState {
                data: entry.read(),
                is_fetching: entry.fetching > 0,
                is_pending: entry.value.is_none() && entry.error.is_none(),
                is_stale: entry.is_stale(self.inner.stale_time),
                error: entry.error.clone(),
            },
            None => QueryState {
                data: None,
                is_fetching: false,
                is_pending: true,
                is_stale: true,
                error: None,
            },
        }
    }

    pub fn is_fetching(&self, key: CacheKey) -> bool {
        self.inner
            .entries()
            .get(&key)
            .is_some_and(|entry| entry.fetching > 0)
    }

    /// True when `key` was invalidated and no fetch is running for it yet.
    pub fn needs_refetch(&self, key: CacheKey) -> bool {
        self.inner
            .entries()
            .get(&key)
            .is_some_and(|entry| entry.invalidated && entry.fetching == 0)
    }

    /// Force the next read of `key` to refetch. In-flight results for the
    /// key are discarded.
    pub fn invalidate(&self, key: CacheKey) {
        {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key).or_default();
            entry.invalidated = true;
            entry.generation += 1;
        }
        debug!(%key, "invalidated");
        self.inner.notify();
    }

    /// Store `value` under `key` as fresh data.
    pub fn set_data<T: Send + Sync + 'static>(&self, key: CacheKey, value: T) {
        {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key).or_default();
            entry.value = Some(Arc::new(value));
            entry.updated_at = Some(Instant::now());
            entry.invalidated = false;
            entry.error = None;
            entry.generation += 1;
        }
        debug!(%key, "data set");
        self.inner.notify();
    }

    /// Receive a tick for every change to any entry.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<CacheKey> = self.inner.entries().keys().copied().collect();
        f.debug_struct("QueryCache")
            .field("stale_time", &self.inner.stale_time)
            .field("keys", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sesame_core::error::{Error, TransportError};

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    async fn counted(calls: &AtomicUsize, value: u32) -> Result<u32> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_reads_are_served_from_cache() {
        let cache = QueryCache::new(FIVE_MINUTES);
        let calls = AtomicUsize::new(0);

        assert_eq!(cache.fetch(CacheKey::Users, || counted(&calls, 1)).await.unwrap(), 1);
        assert_eq!(cache.fetch(CacheKey::Users, || counted(&calls, 2)).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_reads_refetch() {
        let cache = QueryCache::new(FIVE_MINUTES);
        let calls = AtomicUsize::new(0);

        cache.fetch(CacheKey::Users, || counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.fetch(CacheKey::Users, || counted(&calls, 2)).await.unwrap(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.fetch(CacheKey::Users, || counted(&calls, 3)).await.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidated_reads_refetch_even_when_fresh() {
        let cache = QueryCache::new(FIVE_MINUTES);
        let calls = AtomicUsize::new(0);

        cache.fetch(CacheKey::Session, || counted(&calls, 1)).await.unwrap();
        cache.invalidate(CacheKey::Session);

        assert!(cache.needs_refetch(CacheKey::Session));
        assert_eq!(cache.fetch(CacheKey::Session, || counted(&calls, 2)).await.unwrap(), 2);
        assert!(!cache.needs_refetch(CacheKey::Session));
    }

    #[tokio::test]
    async fn set_data_is_visible_immediately() {
        let cache = QueryCache::new(FIVE_MINUTES);
        cache.set_data(CacheKey::Session, false);

        assert_eq!(cache.get::<bool>(CacheKey::Session), Some(false));
        let state = cache.state::<bool>(CacheKey::Session);
        assert!(!state.is_stale);
        assert!(!state.is_pending);
    }

    #[tokio::test]
    async fn wrong_type_reads_as_missing() {
        let cache = QueryCache::new(FIVE_MINUTES);
        cache.set_data(CacheKey::Session, true);
        assert_eq!(cache.get::<String>(CacheKey::Session), None);
    }

    #[tokio::test]
    async fn keys_do_not_collide() {
        let cache = QueryCache::new(FIVE_MINUTES);
        cache.set_data(CacheKey::UserDetail(1), 1u32);
        cache.set_data(CacheKey::UserDetail(2), 2u32);
        cache.invalidate(CacheKey::UserDetail(1));

        assert!(cache.state::<u32>(CacheKey::UserDetail(1)).is_stale);
        assert!(!cache.state::<u32>(CacheKey::UserDetail(2)).is_stale);
    }

    #[tokio::test]
    async fn failed_fetch_records_error_and_keeps_data() {
        let cache = QueryCache::new(FIVE_MINUTES);
        cache.set_data(CacheKey::Users, 7u32);
        cache.invalidate(CacheKey::Users);

        let result = cache
            .fetch(CacheKey::Users, || async {
                Err::<u32, _>(Error::Transport(TransportError::Connection {
                    message: "refused".into(),
                }))
            })
            .await;

        assert!(result.is_err());
        let state = cache.state::<u32>(CacheKey::Users);
        assert_eq!(state.data, Some(7));
        assert!(state.error.unwrap().contains("refused"));
        assert!(state.is_stale);
        assert!(cache.needs_refetch(CacheKey::Users));

        let calls = AtomicUsize::new(0);
        assert_eq!(cache.fetch(CacheKey::Users, || counted(&calls, 8)).await.unwrap(), 8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!cache.needs_refetch(CacheKey::Users));
    }

    #[tokio::test]
    async fn fetch_superseded_by_write_is_discarded() {
        let cache = QueryCache::new(FIVE_MINUTES);
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let reader = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .fetch(CacheKey::Session, || async move {
                        let _ = gate.await;
                        Ok(true)
                    })
                    .await
            })
        };

        while !cache.is_fetching(CacheKey::Session) {
            tokio::task::yield_now().await;
        }
        cache.set_data(CacheKey::Session, false);
        release.send(()).unwrap();

        assert!(reader.await.unwrap().unwrap());
        assert_eq!(cache.get::<bool>(CacheKey::Session), Some(false));
        assert!(!cache.is_fetching(CacheKey::Session));
    }

    #[tokio::test]
    async fn changes_are_announced() {
        let cache = QueryCache::new(FIVE_MINUTES);
        let mut rx = cache.subscribe();

        cache.set_data(CacheKey::Session, true);
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        cache.invalidate(CacheKey::Session);
        assert!(rx.has_changed().unwrap());
    }
}
