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

use std::{fmt::Debug, sync::Arc};

use hintcache_common::ByteView;

use crate::{
    eviction::{fifo::Fifo, lfu::Lfu, lru::Lru, EvictionConfig},
    listener::EvictionListener,
    raw::RawStorage,
};

/// Byte-budgeted storage with the eviction algorithm selected at runtime.
///
/// [`Storage`] is not synchronized. Callers that share it across tasks wrap it in a lock.
pub enum Storage {
    /// Storage with FIFO eviction.
    Fifo(RawStorage<Fifo>),
    /// Storage with LRU eviction.
    Lru(RawStorage<Lru>),
    /// Storage with LFU eviction.
    Lfu(RawStorage<Lfu>),
}

impl Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Storage::Fifo(_) => "Storage::Fifo",
            Storage::Lru(_) => "Storage::Lru",
            Storage::Lfu(_) => "Storage::Lfu",
        };
        f.debug_struct(name)
            .field("len", &self.len())
            .field("usage", &self.usage())
            .field("capacity", &self.capacity())
            .finish()
    }
}

macro_rules! dispatch {
    ($self:ident, $storage:ident => $expr:expr) => {
        match $self {
            Storage::Fifo($storage) => $expr,
            Storage::Lru($storage) => $expr,
            Storage::Lfu($storage) => $expr,
        }
    };
}

impl Storage {
    /// Look up `key`. A hit counts as an access for the eviction algorithm.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        dispatch!(self, storage => storage.get(key))
    }

    /// Insert or overwrite `key`, evicting entries until the byte budget is satisfied.
    pub fn add(&mut self, key: &str, value: ByteView) {
        dispatch!(self, storage => storage.add(key, value))
    }

    /// Look up `key` without counting an access.
    pub fn peek(&self, key: &str) -> Option<ByteView> {
        dispatch!(self, storage => storage.peek(key))
    }

    /// Count of stored entries.
    pub fn len(&self) -> usize {
        dispatch!(self, storage => storage.len())
    }

    /// Returns `true` if the storage holds no entry.
    pub fn is_empty(&self) -> bool {
        dispatch!(self, storage => storage.is_empty())
    }

    /// Total weight of the stored entries.
    pub fn usage(&self) -> usize {
        dispatch!(self, storage => storage.usage())
    }

    /// Byte budget, `0` for unbounded.
    pub fn capacity(&self) -> usize {
        dispatch!(self, storage => storage.capacity())
    }

    /// Eviction algorithm of the storage.
    pub fn eviction_config(&self) -> EvictionConfig {
        match self {
            Storage::Fifo(_) => EvictionConfig::Fifo,
            Storage::Lru(_) => EvictionConfig::Lru,
            Storage::Lfu(_) => EvictionConfig::Lfu,
        }
    }
}

/// Builder of [`Storage`].
#[derive(Clone)]
pub struct StorageBuilder {
    capacity: usize,
    eviction_config: EvictionConfig,
    listener: Option<Arc<dyn EvictionListener>>,
}

impl Debug for StorageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBuilder")
            .field("capacity", &self.capacity)
            .field("eviction_config", &self.eviction_config)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl StorageBuilder {
    /// Create a storage builder with the given byte budget.
    ///
    /// A `capacity` of `0` disables eviction.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            eviction_config: EvictionConfig::default(),
            listener: None,
        }
    }

    /// Set the byte budget, `0` for unbounded.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the eviction algorithm.
    ///
    /// Default: [`EvictionConfig::Lru`].
    pub fn with_eviction_config(mut self, eviction_config: EvictionConfig) -> Self {
        self.eviction_config = eviction_config;
        self
    }

    /// Set the listener notified of every evicted entry.
    pub fn with_listener(mut self, listener: impl EvictionListener) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Byte budget of the storage to build.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Eviction algorithm of the storage to build.
    pub fn eviction_config(&self) -> EvictionConfig {
        self.eviction_config
    }

    /// Build the storage.
    pub fn build(self) -> Storage {
        match self.eviction_config {
            EvictionConfig::Fifo => Storage::Fifo(RawStorage::new(self.capacity, self.listener)),
            EvictionConfig::Lru => Storage::Lru(RawStorage::new(self.capacity, self.listener)),
            EvictionConfig::Lfu => Storage::Lfu(RawStorage::new(self.capacity, self.listener)),
        }
    }
}
