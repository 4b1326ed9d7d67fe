//! Slot-aware thumbnail cache.
//!
//! One table of decoded images plus one table of in-flight downloads, both
//! behind a single mutex. A key has at most one outstanding download; every
//! caller asking for it while it is outstanding joins its waiter list.
//! Deliveries are checked against the current generation of the caller's
//! display slot and dropped when the slot has been rebound since.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use tunes_model::ByteSize;

use super::decoder::{DecodedImage, ImageRequest};
use super::slot::{SlotId, SlotToken};
use crate::api::pipeline::{DEFAULT_REQUEST_TIMEOUT, RequestPipeline};
use crate::error::NetworkError;

pub const DEFAULT_MAX_ENTRIES: usize = 256;
pub const DEFAULT_MAX_BYTES: ByteSize = ByteSize::from_mib(64);

/// Bounds and timeouts of an [`ImageCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCacheConfig {
    /// Decoded images kept at most.
    pub max_entries: usize,
    /// Resident budget of decoded pixels. Going over drains to 90%.
    pub max_bytes: ByteSize,
    /// Bound on each download, decode included.
    pub fetch_timeout: Duration,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
            fetch_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// What a waiter eventually receives. Failures are shared, never cached.
pub type ImageResult = Result<Arc<DecodedImage>, NetworkError>;

/// Answer to [`ImageCache::fetch`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// Cached; no transport call was made.
    Ready(Arc<DecodedImage>),
    /// Joined or started a download.
    Pending(PendingImage),
}

/// Answer to [`ImageCache::fetch_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The callback already ran with the cached image.
    Hit,
    /// A new download was started for the key.
    Started,
    /// The caller joined a download already in flight.
    Joined,
}

/// Completion of a pending [`ImageCache::fetch`].
///
/// Resolves to `None` when the delivery was suppressed because the slot was
/// rebound or released before the download finished.
#[derive(Debug)]
pub struct PendingImage {
    receiver: oneshot::Receiver<ImageResult>,
}

impl Future for PendingImage {
    type Output = Option<ImageResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(Result::ok)
    }
}

/// Point-in-time counters of an [`ImageCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub resident: ByteSize,
    pub in_flight: usize,
    pub hits: u64,
    pub misses: u64,
    pub joins: u64,
    pub evictions: u64,
    pub suppressed: u64,
}

type Callback = Box<dyn FnOnce(ImageResult) + Send>;

enum Sink {
    Channel(oneshot::Sender<ImageResult>),
    Callback(Callback),
}

struct Waiter {
    // `None` for unbound callers (prefetch, load); those always receive.
    token: Option<SlotToken>,
    sink: Sink,
}

#[derive(Debug)]
struct CachedEntry {
    image: Arc<DecodedImage>,
    footprint: ByteSize,
    last_used: u64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    hits: u64,
    misses: u64,
    joins: u64,
    evictions: u64,
    suppressed: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CachedEntry>,
    in_flight: HashMap<String, Vec<Waiter>>,
    // Current generation of every bound slot.
    slots: HashMap<SlotId, u64>,
    resident: ByteSize,
    tick: u64,
    counters: Counters,
}

impl CacheState {
    fn observe(&mut self, token: SlotToken) {
        let current = self
            .slots
            .entry(token.slot())
            .or_insert(token.generation());
        if token.generation() > *current {
            *current = token.generation();
        }
    }

    fn is_current(&self, token: Option<SlotToken>) -> bool {
        match token {
            None => true,
            Some(token) => self
                .slots
                .get(&token.slot())
                .is_some_and(|current| *current == token.generation()),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    fn touch(&mut self, key: &str) -> Option<Arc<DecodedImage>> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(Arc::clone(&entry.image))
    }

    fn insert(&mut self, key: &str, image: Arc<DecodedImage>) {
        let footprint = image.footprint();
        let last_used = self.next_tick();
        let previous = self.entries.insert(
            key.to_string(),
            CachedEntry {
                image,
                footprint,
                last_used,
            },
        );
        if let Some(previous) = previous {
            self.resident = self.resident.saturating_sub(previous.footprint);
        }
        self.resident = self.resident.saturating_add(footprint);
    }

    fn remove_entry(&mut self, key: &str) -> Option<CachedEntry> {
        let entry = self.entries.remove(key)?;
        self.resident = self.resident.saturating_sub(entry.footprint);
        Some(entry)
    }

    /// Evicts least-recently-used entries until both bounds hold. A byte
    /// overrun drains to the low-water mark rather than the cap.
    fn enforce_budget(
        &mut self,
        max_entries: usize,
        max_bytes: ByteSize,
    ) -> Option<(usize, ByteSize)> {
        let over_bytes = self.resident > max_bytes;
        if self.entries.len() <= max_entries && !over_bytes {
            return None;
        }
        let byte_target = if over_bytes {
            max_bytes.low_water_mark()
        } else {
            max_bytes
        };

        let mut candidates: Vec<(u64, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_used, key.clone()))
            .collect();
        candidates.sort_unstable_by_key(|(last_used, _)| *last_used);

        let mut removed = 0usize;
        let mut freed = ByteSize::ZERO;
        for (_, key) in candidates {
            if self.entries.len() <= max_entries && self.resident <= byte_target {
                break;
            }
            if let Some(entry) = self.remove_entry(&key) {
                freed = freed.saturating_add(entry.footprint);
                removed += 1;
            }
        }
        self.counters.evictions += removed as u64;
        Some((removed, freed))
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            resident: self.resident,
            in_flight: self.in_flight.len(),
            hits: self.counters.hits,
            misses: self.counters.misses,
            joins: self.counters.joins,
            evictions: self.counters.evictions,
            suppressed: self.counters.suppressed,
        }
    }
}

enum Lookup {
    Hit(Arc<DecodedImage>),
    Started,
    Joined,
}

struct CacheInner {
    state: Mutex<CacheState>,
    pipeline: RequestPipeline,
    config: ImageCacheConfig,
    runtime: Handle,
}

impl CacheInner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serves `key` from the table or registers a waiter for it, starting a
    /// download only when none is outstanding. `make_sink` is only called
    /// on a miss.
    fn lookup<F>(
        self: &Arc<Self>,
        key: &str,
        token: Option<SlotToken>,
        make_sink: F,
    ) -> Lookup
    where
        F: FnOnce() -> Option<Sink>,
    {
        let mut state = self.lock();
        if let Some(token) = token {
            state.observe(token);
        }
        if let Some(image) = state.touch(key) {
            state.counters.hits += 1;
            return Lookup::Hit(image);
        }

        let waiter = make_sink().map(|sink| Waiter { token, sink });
        if let Some(waiters) = state.in_flight.get_mut(key) {
            waiters.extend(waiter);
            state.counters.joins += 1;
            debug!(key, "joined in-flight image fetch");
            return Lookup::Joined;
        }

        state.in_flight.insert(key.to_string(), waiter.into_iter().collect());
        state.counters.misses += 1;
        drop(state);

        self.start_download(key.to_string());
        Lookup::Started
    }

    fn start_download(self: &Arc<Self>, key: String) {
        let inner = Arc::clone(self);
        debug!(key = %key, "starting image fetch");
        self.runtime.spawn(async move {
            let request = ImageRequest::new(key.as_str());
            let outcome = inner
                .pipeline
                .execute(&request, inner.config.fetch_timeout)
                .await
                .map(Arc::new);
            inner.complete(&key, outcome);
        });
    }

    fn complete(&self, key: &str, outcome: ImageResult) {
        let callbacks = {
            let mut state = self.lock();
            let waiters = state.in_flight.remove(key).unwrap_or_default();

            match &outcome {
                Ok(image) => {
                    state.insert(key, Arc::clone(image));
                    self.enforce_budget(&mut state);
                }
                Err(err) => {
                    warn!(key, error = %err, waiters = waiters.len(), "image fetch failed");
                }
            }

            let mut callbacks = Vec::new();
            for waiter in waiters {
                if !state.is_current(waiter.token) {
                    state.counters.suppressed += 1;
                    continue;
                }
                match waiter.sink {
                    Sink::Channel(sender) => {
                        let _ = sender.send(outcome.clone());
                    }
                    Sink::Callback(callback) => {
                        callbacks.push((waiter.token, callback));
                    }
                }
            }
            callbacks
        };

        // Callbacks may call back into the cache, so they run unlocked after
        // one more currency check.
        for (token, callback) in callbacks {
            if self.still_current(token) {
                callback(outcome.clone());
            }
        }
    }

    fn still_current(&self, token: Option<SlotToken>) -> bool {
        let mut state = self.lock();
        let current = state.is_current(token);
        if !current {
            state.counters.suppressed += 1;
        }
        current
    }

    fn enforce_budget(&self, state: &mut CacheState) {
        let max_bytes = self.config.max_bytes;
        if let Some((removed, freed)) =
            state.enforce_budget(self.config.max_entries, max_bytes)
            && removed > 0
        {
            info!(
                "Image cache cap: evicted {} images (~{:.1}MiB) => {} entries, {:.1}MiB / {:.1}MiB",
                removed,
                freed.as_mib(),
                state.entries.len(),
                state.resident.as_mib(),
                max_bytes.as_mib(),
            );
        }
    }
}

/// Shared handle to the thumbnail cache. Clones share one table.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<CacheInner>,
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ImageCache {
    /// Creates a cache whose downloads run on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(pipeline: RequestPipeline, config: ImageCacheConfig) -> Self {
        Self::with_runtime(pipeline, config, Handle::current())
    }

    pub fn with_runtime(
        pipeline: RequestPipeline,
        config: ImageCacheConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                state: Mutex::new(CacheState::default()),
                pipeline,
                config,
                runtime,
            }),
        }
    }

    pub fn config(&self) -> &ImageCacheConfig {
        &self.inner.config
    }

    /// Returns the cached image for `key`, or a future for the download that
    /// `token` is now waiting on.
    pub fn fetch(&self, key: &str, token: SlotToken) -> FetchOutcome {
        let (sender, receiver) = oneshot::channel();
        match self
            .inner
            .lookup(key, Some(token), move || Some(Sink::Channel(sender)))
        {
            Lookup::Hit(image) => FetchOutcome::Ready(image),
            Lookup::Started | Lookup::Joined => {
                FetchOutcome::Pending(PendingImage { receiver })
            }
        }
    }

    /// Callback form of [`fetch`](Self::fetch).
    ///
    /// On a hit `on_complete` runs before this returns. Otherwise it runs
    /// on the runtime once the download finishes, unless the slot was
    /// rebound or released in the meantime.
    ///
    /// The binding is checked just before `on_complete` is invoked, not
    /// while it runs. A binder that paints from the callback must confirm
    /// [`is_current`](Self::is_current) for `token` under its own slot lock
    /// when it paints.
    pub fn fetch_with<F>(
        &self,
        key: &str,
        token: SlotToken,
        on_complete: F,
    ) -> FetchStatus
    where
        F: FnOnce(ImageResult) + Send + 'static,
    {
        let mut on_complete = Some(on_complete);
        let lookup = self.inner.lookup(key, Some(token), || {
            on_complete
                .take()
                .map(|callback| Sink::Callback(Box::new(callback) as Callback))
        });
        match lookup {
            Lookup::Hit(image) => {
                if let Some(callback) = on_complete.take() {
                    callback(Ok(image));
                }
                FetchStatus::Hit
            }
            Lookup::Started => FetchStatus::Started,
            Lookup::Joined => FetchStatus::Joined,
        }
    }

    /// True while `token` is the latest binding seen for its slot.
    pub fn is_current(&self, token: SlotToken) -> bool {
        self.inner.lock().is_current(Some(token))
    }

    /// Marks `token` as the slot's current binding and drops every pending
    /// delivery for its earlier bindings.
    ///
    /// The shared download keeps running for the remaining waiters.
    pub fn invalidate_slot(&self, token: SlotToken) {
        let dropped = {
            let mut state = self.inner.lock();
            state.observe(token);
            let stale = Self::drain_waiters(&mut state, |waiter| {
                waiter.is_some_and(|bound| token.supersedes(&bound))
            });
            state.counters.suppressed += stale.len() as u64;
            stale
        };
        if !dropped.is_empty() {
            debug!(slot = %token.slot(), dropped = dropped.len(), "suppressed stale deliveries");
        }
    }

    /// Forgets `slot` entirely, dropping its pending deliveries.
    pub fn release_slot(&self, slot: SlotId) {
        let dropped = {
            let mut state = self.inner.lock();
            state.slots.remove(&slot);
            let released = Self::drain_waiters(&mut state, |waiter| {
                waiter.is_some_and(|bound| bound.slot() == slot)
            });
            state.counters.suppressed += released.len() as u64;
            released
        };
        drop(dropped);
    }

    fn drain_waiters<P>(state: &mut CacheState, mut matches: P) -> Vec<Waiter>
    where
        P: FnMut(Option<SlotToken>) -> bool,
    {
        let mut drained = Vec::new();
        for waiters in state.in_flight.values_mut() {
            let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(waiters)
                .into_iter()
                .partition(|waiter| matches(waiter.token));
            *waiters = kept;
            drained.extend(gone);
        }
        drained
    }

    /// Starts a download for `key` with nobody waiting on it.
    ///
    /// Returns `false` when the key is already cached or in flight.
    pub fn prefetch(&self, key: &str) -> bool {
        matches!(self.inner.lookup(key, None, || None), Lookup::Started)
    }

    /// Resolves `key` without binding it to a slot.
    pub async fn load(&self, key: &str) -> ImageResult {
        let (sender, receiver) = oneshot::channel();
        match self
            .inner
            .lookup(key, None, move || Some(Sink::Channel(sender)))
        {
            Lookup::Hit(image) => Ok(image),
            Lookup::Started | Lookup::Joined => receiver.await.unwrap_or_else(|_| {
                Err(NetworkError::Unknown("image fetch was abandoned".into()))
            }),
        }
    }

    /// Peeks at the table without registering interest.
    pub fn get(&self, key: &str) -> Option<Arc<DecodedImage>> {
        self.inner.lock().touch(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.inner.lock().remove_entry(key).is_some()
    }

    /// Drops every cached image. Downloads in flight are unaffected.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.entries.clear();
        state.resident = ByteSize::ZERO;
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}
