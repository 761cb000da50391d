// Copyright 2025 hintcache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    fmt::Debug,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, OnceLock,
    },
};

use futures_util::{future::BoxFuture, FutureExt};
use hintcache_common::ByteView;
use hintcache_memory::{EvictionConfig, EvictionListener, Storage, StorageBuilder};
use parking_lot::Mutex;

use crate::{
    error::{Error, Result},
    flight::Flight,
    peers::{PeerGetter, PeerPicker},
    registry::Registry,
};

/// Source of truth of a group, called on a cache miss that no peer could serve.
///
/// The loader is called at most once at a time per key within a process. Its error is returned to the caller of
/// [`Group::get`] as [`Error::Loader`] and the key is not cached.
pub trait Loader: Send + Sync + 'static {
    /// Load the value of `key`.
    fn load(&self, key: &str) -> BoxFuture<'static, anyhow::Result<Vec<u8>>>;
}

impl<F, FU> Loader for F
where
    F: Fn(String) -> FU + Send + Sync + 'static,
    FU: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
{
    fn load(&self, key: &str) -> BoxFuture<'static, anyhow::Result<Vec<u8>>> {
        self(key.to_string()).boxed()
    }
}

/// Counters of a group.
#[derive(Debug, Default)]
pub struct GroupStats {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    loads: AtomicU64,
    loads_deduped: AtomicU64,
    local_loads: AtomicU64,
    local_load_errs: AtomicU64,
    server_requests: AtomicU64,
}

/// Point-in-time copy of [`GroupStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Calls of [`Group::get`], including rejected ones.
    pub gets: u64,
    /// Gets served by the local storage, either on the first lookup or on the re-check inside the coalescer.
    ///
    /// A get counts at most once here, `cache_hits + loads` may exceed `gets` by the re-check hits.
    pub cache_hits: u64,
    /// Misses served by a remote peer.
    pub peer_loads: u64,
    /// Failed remote fetches.
    pub peer_errors: u64,
    /// Misses that entered the coalescer.
    pub loads: u64,
    /// Computations actually run after coalescing.
    pub loads_deduped: u64,
    /// Successful loader calls.
    pub local_loads: u64,
    /// Failed loader calls.
    pub local_load_errs: u64,
    /// Requests received from peers.
    pub server_requests: u64,
}

impl GroupStats {
    /// Take a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            loads_deduped: self.loads_deduped.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errs: self.local_load_errs.load(Ordering::Relaxed),
            server_requests: self.server_requests.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_server_request(&self) {
        self.server_requests.fetch_add(1, Ordering::Relaxed);
    }
}

fn inc(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

/// A named cache namespace.
///
/// A group binds a [`Loader`], a byte-budgeted [`Storage`] and an optional [`PeerPicker`]. On a miss, concurrent
/// gets of the same key are coalesced into one computation that asks the owning peer first and falls back to the
/// loader. Only values produced by the local loader are cached, a value fetched from a peer is cached by that peer.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,

    builder: StorageBuilder,
    /// Built on the first insertion.
    main_cache: Mutex<Option<Storage>>,

    peers: OnceLock<Arc<dyn PeerPicker>>,
    flight: Flight<Result<ByteView>>,

    stats: GroupStats,
}

impl Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("storage", &self.builder)
            .field("peers", &self.peers.get().is_some())
            .finish()
    }
}

impl Group {
    /// Name of the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counters of the group.
    pub fn stats(&self) -> &GroupStats {
        &self.stats
    }

    /// Register the peer picker used to locate the owner of a missed key.
    ///
    /// The picker can be registered only once.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(picker).map_err(|_| Error::PeersAlreadyRegistered {
            group: self.name.clone(),
        })?;
        tracing::info!(group = %self.name, "[group]: peers registered");
        Ok(())
    }

    /// Get the value of `key`.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        inc(&self.stats.gets);
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }

        if let Some(value) = self.lookup(key) {
            inc(&self.stats.cache_hits);
            tracing::debug!(group = %self.name, key, "[group]: cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        inc(&self.stats.loads);
        self.flight
            .run(key, || async {
                // Another computation may have populated the key between the lookup and the flight. The first lookup
                // already recorded the access.
                if let Some(value) = self.peek(key) {
                    inc(&self.stats.cache_hits);
                    return Ok(value);
                }
                inc(&self.stats.loads_deduped);

                if let Some(peer) = self.peers.get().and_then(|picker| picker.pick(key)) {
                    match self.fetch_from_peer(peer.as_ref(), key).await {
                        Ok(value) => return Ok(value),
                        Err(e) => {
                            inc(&self.stats.peer_errors);
                            tracing::warn!(group = %self.name, key, peer = peer.name(), "[group]: fetch from peer error: {e}");
                        }
                    }
                }

                self.load_locally(key).await
            })
            .await
    }

    async fn fetch_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let value = peer.fetch(&self.name, key).await?;
        inc(&self.stats.peer_loads);
        tracing::debug!(group = %self.name, key, peer = peer.name(), "[group]: fetched from peer");
        Ok(value)
    }

    async fn load_locally(&self, key: &str) -> Result<ByteView> {
        match self.loader.load(key).await {
            Ok(data) => {
                inc(&self.stats.local_loads);
                let value = ByteView::from(data);
                self.populate(key, value.clone());
                Ok(value)
            }
            Err(e) => {
                inc(&self.stats.local_load_errs);
                Err(Error::loader(e))
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<ByteView> {
        self.main_cache.lock().as_mut()?.get(key)
    }

    fn peek(&self, key: &str) -> Option<ByteView> {
        self.main_cache.lock().as_ref()?.peek(key)
    }

    fn populate(&self, key: &str, value: ByteView) {
        let mut main_cache = self.main_cache.lock();
        let storage = main_cache.get_or_insert_with(|| self.builder.clone().build());
        storage.add(key, value);
    }

    /// Count of locally cached entries.
    pub fn len(&self) -> usize {
        self.main_cache.lock().as_ref().map(Storage::len).unwrap_or_default()
    }

    /// Returns `true` if nothing is cached locally.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total weight of the locally cached entries.
    pub fn usage(&self) -> usize {
        self.main_cache.lock().as_ref().map(Storage::usage).unwrap_or_default()
    }

    /// Byte budget of the local storage, `0` for unbounded.
    pub fn capacity(&self) -> usize {
        self.builder.capacity()
    }

    /// Eviction algorithm of the local storage.
    pub fn eviction_config(&self) -> EvictionConfig {
        self.builder.eviction_config()
    }
}

/// Builder of [`Group`].
pub struct GroupBuilder {
    name: String,
    storage: StorageBuilder,
    loader: Option<Arc<dyn Loader>>,
}

impl Debug for GroupBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("name", &self.name)
            .field("storage", &self.storage)
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

impl GroupBuilder {
    /// Create a builder of the group named `name`, with an unbounded LRU storage.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: StorageBuilder::new(0),
            loader: None,
        }
    }

    /// Set the byte budget of the local storage, `0` for unbounded.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.storage = self.storage.with_capacity(capacity);
        self
    }

    /// Set the eviction algorithm of the local storage.
    pub fn with_eviction_config(mut self, eviction_config: EvictionConfig) -> Self {
        self.storage = self.storage.with_eviction_config(eviction_config);
        self
    }

    /// Set the listener notified of every entry evicted from the local storage.
    pub fn with_eviction_listener(mut self, listener: impl EvictionListener) -> Self {
        self.storage = self.storage.with_listener(listener);
        self
    }

    /// Set the loader. A group cannot be built without one.
    pub fn with_loader(mut self, loader: impl Loader) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Build the group and register it into `registry`.
    pub fn build(self, registry: &Registry) -> Result<Arc<Group>> {
        let Some(loader) = self.loader else {
            return Err(Error::MissingLoader { group: self.name });
        };
        let group = Arc::new(Group {
            name: self.name,
            loader,
            builder: self.storage,
            main_cache: Mutex::new(None),
            peers: OnceLock::new(),
            flight: Flight::new(),
            stats: GroupStats::default(),
        });
        tracing::info!(
            group = %group.name,
            capacity = group.capacity(),
            eviction = %group.eviction_config(),
            "[group]: created"
        );
        registry.register(group.clone());
        Ok(group)
    }
}
