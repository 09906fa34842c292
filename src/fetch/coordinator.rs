//! Fetch Coordinator
//!
//! Resolves a resource request to a payload: from the cache when possible,
//! otherwise from the backing store, populating the cache on success.
//!
//! Concurrent misses for the same key share one backing fetch. The first
//! request to miss becomes the leader and fetches; later ones subscribe to
//! the leader's outcome. The cache lookup and the in-flight registration
//! happen under the cache lock, and the leader inserts into the cache before
//! deregistering, so a request arriving at any point either hits, joins the
//! flight, or (after the flight ended in failure) starts a fresh one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheKey, SharedCache};
use crate::fetch::{BackingStore, FetchError};
use crate::models::ResourceRequest;

type FetchOutcome = Result<CacheEntry, FetchError>;
type InFlight = Mutex<HashMap<CacheKey, broadcast::Sender<FetchOutcome>>>;

// == Cache Status ==
/// Where a resolved payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache
    Hit,
    /// Fetched from the backing store by this request
    Miss,
    /// Fetched by a concurrent request this one waited on
    Coalesced,
}

impl CacheStatus {
    /// Value of the `X-Cache` response header.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Coalesced => "COALESCED",
        }
    }
}

/// A payload together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub entry: CacheEntry,
    pub status: CacheStatus,
}

/// Backing-store activity counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    pub backing_fetches: u64,
    pub fetch_failures: u64,
    pub coalesced: u64,
}

#[derive(Debug, Default)]
struct FetchCounters {
    backing_fetches: AtomicU64,
    fetch_failures: AtomicU64,
    coalesced: AtomicU64,
}

enum Flight<'a> {
    Leader(FlightGuard<'a>),
    Follower(broadcast::Receiver<FetchOutcome>),
}

/// Deregisters a leader's flight if it is dropped before completing,
/// which closes the channel and sends followers back to retry.
struct FlightGuard<'a> {
    in_flight: &'a InFlight,
    key: CacheKey,
    armed: bool,
}

impl FlightGuard<'_> {
    fn complete(mut self) -> Option<broadcast::Sender<FetchOutcome>> {
        self.armed = false;
        lock(self.in_flight).remove(&self.key)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.in_flight).remove(&self.key);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Fetch Coordinator ==
/// Cache-first resolution of resource requests.
pub struct FetchCoordinator {
    cache: SharedCache,
    backend: Arc<dyn BackingStore>,
    fetch_timeout: Duration,
    in_flight: InFlight,
    counters: FetchCounters,
}

impl FetchCoordinator {
    /// Creates a coordinator over a shared cache and a backing store.
    ///
    /// # Arguments
    /// * `cache` - The cache shared with the HTTP handlers
    /// * `backend` - Store consulted on a miss
    /// * `fetch_timeout` - Upper bound on one backing-store call
    pub fn new(cache: SharedCache, backend: Arc<dyn BackingStore>, fetch_timeout: Duration) -> Self {
        Self {
            cache,
            backend,
            fetch_timeout,
            in_flight: Mutex::new(HashMap::new()),
            counters: FetchCounters::default(),
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn stats(&self) -> FetchStats {
        FetchStats {
            backing_fetches: self.counters.backing_fetches.load(Ordering::Relaxed),
            fetch_failures: self.counters.fetch_failures.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
        }
    }

    // == Resolve ==
    /// Returns the payload for `request`.
    ///
    /// A hit performs no backing-store access. A successful miss writes the
    /// cache exactly once; a failed miss leaves the cache untouched.
    pub async fn resolve(&self, request: &ResourceRequest) -> Result<Resolved, FetchError> {
        let key = request.cache_key();

        loop {
            let flight = {
                let mut cache = self.cache.lock().await;
                if let Some(entry) = cache.get(&key) {
                    debug!(key = %key, "Cache hit");
                    return Ok(Resolved {
                        entry,
                        status: CacheStatus::Hit,
                    });
                }
                self.join_or_lead(&key)
            };

            match flight {
                Flight::Leader(guard) => return self.fetch_as_leader(request, guard).await,
                Flight::Follower(mut receiver) => {
                    self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "Waiting on in-flight fetch");
                    match receiver.recv().await {
                        Ok(outcome) => {
                            return outcome.map(|entry| Resolved {
                                entry,
                                status: CacheStatus::Coalesced,
                            })
                        }
                        // Leader went away without an outcome
                        Err(_) => {
                            debug!(key = %key, "In-flight fetch abandoned, retrying");
                            continue;
                        }
                    }
                }
            }
        }
    }

    fn join_or_lead(&self, key: &CacheKey) -> Flight<'_> {
        let mut in_flight = lock(&self.in_flight);
        if let Some(sender) = in_flight.get(key) {
            return Flight::Follower(sender.subscribe());
        }

        let (sender, _) = broadcast::channel(1);
        in_flight.insert(key.clone(), sender);
        Flight::Leader(FlightGuard {
            in_flight: &self.in_flight,
            key: key.clone(),
            armed: true,
        })
    }

    async fn fetch_as_leader(
        &self,
        request: &ResourceRequest,
        guard: FlightGuard<'_>,
    ) -> Result<Resolved, FetchError> {
        self.counters.backing_fetches.fetch_add(1, Ordering::Relaxed);
        debug!(key = %guard.key, "Cache miss, fetching from backing store");

        let fetched = tokio::time::timeout(
            self.fetch_timeout,
            self.backend.fetch(&request.path, request.variant),
        )
        .await;

        let outcome: FetchOutcome = match fetched {
            Ok(Ok(blob)) => Ok(blob.into_entry(request.variant)),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        };

        let sender = match &outcome {
            Ok(entry) => {
                let mut cache = self.cache.lock().await;
                cache.put(guard.key.clone(), entry.clone());
                debug!(key = %guard.key, entries = cache.len(), "Cached fetched payload");
                guard.complete()
            }
            Err(err) => {
                self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    path = %request.path,
                    variant = %request.variant,
                    error = %err,
                    "Backing store fetch failed"
                );
                guard.complete()
            }
        };

        if let Some(sender) = sender {
            // No receivers simply means nobody was waiting
            let _ = sender.send(outcome.clone());
        }

        outcome.map(|entry| Resolved {
            entry,
            status: CacheStatus::Miss,
        })
    }
}
