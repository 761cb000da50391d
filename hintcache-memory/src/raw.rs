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

use std::sync::Arc;

use hashbrown::HashMap;
use hintcache_common::ByteView;

use crate::{eviction::Eviction, listener::EvictionListener};

/// Logical size of an entry.
pub fn weight(key: &str, value: &ByteView) -> usize {
    key.len() + value.len()
}

struct Record<H> {
    value: ByteView,
    handle: H,
}

/// Byte-budgeted key-value storage driven by eviction algorithm `E`.
///
/// After every [`RawStorage::add`] returns, `usage() <= capacity()` holds whenever the capacity is non-zero. A zero
/// capacity means the storage is unbounded.
pub struct RawStorage<E>
where
    E: Eviction,
{
    indexer: HashMap<Arc<str>, Record<E::Handle>>,
    eviction: E,

    usage: usize,
    capacity: usize,

    listener: Option<Arc<dyn EvictionListener>>,
}

impl<E> RawStorage<E>
where
    E: Eviction,
{
    /// Create an empty storage with the given byte budget.
    pub fn new(capacity: usize, listener: Option<Arc<dyn EvictionListener>>) -> Self {
        Self {
            indexer: HashMap::new(),
            eviction: E::new(),
            usage: 0,
            capacity,
            listener,
        }
    }

    /// Look up `key`, recording the access with the eviction algorithm on a hit.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        let record = self.indexer.get(key)?;
        self.eviction.access(&record.handle);
        Some(record.value.clone())
    }

    /// Insert or overwrite `key`, then evict until the byte budget is satisfied.
    pub fn add(&mut self, key: &str, value: ByteView) {
        if let Some(record) = self.indexer.get_mut(key) {
            self.usage = self.usage - record.value.len() + value.len();
            record.value = value;
            self.eviction.update(&record.handle);
        } else {
            let key: Arc<str> = Arc::from(key);
            self.usage += weight(&key, &value);
            // Make room among the existing entries first so that a new entry is never chosen as the victim of its
            // own insertion unless it alone exceeds the budget.
            self.evict();
            let handle = self.eviction.push(key.clone());
            self.indexer.insert(key, Record { value, handle });
        }
        self.evict();
    }

    /// Look up `key` without recording an access.
    pub fn peek(&self, key: &str) -> Option<ByteView> {
        self.indexer.get(key).map(|record| record.value.clone())
    }

    /// Count of stored entries.
    pub fn len(&self) -> usize {
        self.indexer.len()
    }

    /// Returns `true` if the storage holds no entry.
    pub fn is_empty(&self) -> bool {
        self.indexer.is_empty()
    }

    /// Total weight of the stored entries.
    pub fn usage(&self) -> usize {
        self.usage
    }

    /// Byte budget, `0` for unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored keys in eviction order, the next victim first.
    pub fn order(&self) -> Vec<Arc<str>> {
        self.eviction.order()
    }

    fn evict(&mut self) {
        while self.capacity > 0 && self.usage > self.capacity {
            let Some(key) = self.eviction.pop() else {
                break;
            };
            let Some(record) = self.indexer.remove(&key) else {
                unreachable!("evicted key {key:?} must be indexed");
            };
            self.usage -= weight(&key, &record.value);
            tracing::trace!(key = %key, usage = self.usage, capacity = self.capacity, "[storage]: evict");
            if let Some(listener) = self.listener.as_ref() {
                listener.on_evict(&key, record.value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use itertools::Itertools;
    use parking_lot::Mutex;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;
    use crate::eviction::{fifo::Fifo, lfu::Lfu, lru::Lru};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl EvictionListener) {
        let evicted = Arc::new(Mutex::new(vec![]));
        let listener = {
            let evicted = evicted.clone();
            move |key: &str, _: ByteView| evicted.lock().push(key.to_string())
        };
        (evicted, listener)
    }

    fn keys<E: Eviction>(storage: &RawStorage<E>) -> Vec<String> {
        storage.order().iter().map(|key| key.to_string()).collect_vec()
    }

    #[test]
    fn test_get_and_miss() {
        let mut storage = RawStorage::<Lru>::new(0, None);
        storage.add("key1", "1234".into());
        assert_eq!(storage.get("key1").map(|v| v.as_string()).as_deref(), Some("1234"));
        assert!(storage.get("key2").is_none());
        assert_eq!(storage.usage(), 8);
    }

    #[test]
    fn test_lru_evicts_least_recently_used() {
        let (evicted, listener) = recorder();
        // "A" + "aaaa" = 5 bytes per entry
        let mut storage = RawStorage::<Lru>::new(10, Some(Arc::new(listener)));
        storage.add("A", "aaaa".into());
        storage.add("B", "bbbb".into());
        assert!(storage.get("A").is_some());
        storage.add("C", "cccc".into());

        assert!(storage.get("A").is_some());
        assert!(storage.get("B").is_none());
        assert!(storage.get("C").is_some());
        assert_eq!(*evicted.lock(), vec!["B"]);
    }

    #[test]
    fn test_fifo_ignores_access() {
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Fifo>::new(10, Some(Arc::new(listener)));
        storage.add("A", "aaaa".into());
        storage.add("B", "bbbb".into());
        assert!(storage.get("A").is_some());
        storage.add("C", "cccc".into());

        assert!(storage.get("A").is_none());
        assert!(storage.get("B").is_some());
        assert!(storage.get("C").is_some());
        assert_eq!(*evicted.lock(), vec!["A"]);
    }

    #[test]
    fn test_fifo_evicts_in_insertion_order() {
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Fifo>::new(10, Some(Arc::new(listener)));
        storage.add("key1", "123456".into());
        storage.add("k2", "k2".into());
        storage.add("k3", "k3".into());
        storage.add("k4", "k4".into());

        assert_eq!(*evicted.lock(), vec!["key1", "k2"]);
        assert_eq!(keys(&storage), vec!["k3", "k4"]);
        assert_eq!(storage.usage(), 8);
    }

    #[test]
    fn test_fifo_overwrite_keeps_position() {
        let mut storage = RawStorage::<Fifo>::new(0, None);
        storage.add("a", "1".into());
        storage.add("b", "2".into());
        storage.add("a", "333".into());
        assert_eq!(keys(&storage), vec!["a", "b"]);
        assert_eq!(storage.usage(), 6);
        assert_eq!(storage.get("a").map(|v| v.as_string()).as_deref(), Some("333"));
    }

    #[test]
    fn test_lfu_evicts_least_frequently_used() {
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Lfu>::new(18, Some(Arc::new(listener)));
        storage.add("test1", "1".into());
        storage.add("test2", "2".into());
        storage.add("test3", "3".into());
        for _ in 0..3 {
            assert!(storage.get("test1").is_some());
        }
        assert!(storage.get("test3").is_some());

        storage.add("test4", "4".into());
        assert_eq!(*evicted.lock(), vec!["test2"]);
        assert!(storage.get("test4").is_some());
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_lfu_does_not_evict_newcomer() {
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Lfu>::new(12, Some(Arc::new(listener)));
        storage.add("test1", "1".into());
        storage.add("test2", "2".into());
        for _ in 0..4 {
            storage.get("test1");
        }
        storage.get("test2");

        storage.add("test3", "3".into());
        assert_eq!(*evicted.lock(), vec!["test2"]);
        assert_eq!(keys(&storage), vec!["test3", "test1"]);
    }

    #[test]
    fn test_overwrite_adjusts_usage_by_delta() {
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Lru>::new(20, Some(Arc::new(listener)));
        storage.add("a", "12345".into());
        storage.add("b", "12345".into());
        assert_eq!(storage.usage(), 12);

        storage.add("a", "1".into());
        assert_eq!(storage.usage(), 8);

        // grows "b" past the budget, the least recently used "a" goes
        storage.add("b", "123456789012345678".into());
        assert_eq!(storage.usage(), 19);
        assert_eq!(*evicted.lock(), vec!["a"]);
    }

    #[test]
    fn test_oversized_entry_empties_storage() {
        for config in ["lru", "fifo", "lfu"] {
            let (evicted, listener) = recorder();
            let mut storage = crate::StorageBuilder::new(8)
                .with_eviction_config(config.parse().unwrap())
                .with_listener(listener)
                .build();
            storage.add("a", "1".into());
            storage.add("huge", "123456789".into());

            assert!(storage.is_empty(), "{config}");
            assert_eq!(storage.usage(), 0, "{config}");
            assert_eq!(*evicted.lock(), vec!["a", "huge"], "{config}");
        }
    }

    #[test]
    fn test_peek_leaves_eviction_order() {
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Lru>::new(10, Some(Arc::new(listener)));
        storage.add("A", "aaaa".into());
        storage.add("B", "bbbb".into());
        assert_eq!(storage.peek("A").map(|v| v.as_string()).as_deref(), Some("aaaa"));
        assert!(storage.peek("C").is_none());
        assert_eq!(keys(&storage), vec!["A", "B"]);
        storage.add("C", "cccc".into());
        assert_eq!(*evicted.lock(), vec!["A"]);

        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<Lfu>::new(4, Some(Arc::new(listener)));
        storage.add("a", "1".into());
        storage.add("b", "2".into());
        storage.get("b");
        for _ in 0..3 {
            assert!(storage.peek("a").is_some());
        }
        storage.add("c", "3".into());
        assert_eq!(*evicted.lock(), vec!["a"]);
        assert_eq!(keys(&storage), vec!["c", "b"]);
    }

    fn fuzz<E: Eviction>(seed: u64) {
        const CAPACITY: usize = 64;

        let mut rng = SmallRng::seed_from_u64(seed);
        let (evicted, listener) = recorder();
        let mut storage = RawStorage::<E>::new(CAPACITY, Some(Arc::new(listener)));

        for _ in 0..4096 {
            let key = format!("k{}", rng.random_range(0..32));
            if rng.random_bool(0.3) {
                storage.get(&key);
            } else {
                let value = vec![b'v'; rng.random_range(0..24)];
                storage.add(&key, value.into());
            }
            assert!(storage.usage() <= CAPACITY);
            assert_eq!(storage.len(), storage.order().len());
        }

        let usage = storage
            .order()
            .iter()
            .map(|key| key.len() + storage.indexer.get(key.as_ref()).unwrap().value.len())
            .sum::<usize>();
        assert_eq!(usage, storage.usage());
        assert!(!evicted.lock().is_empty());
    }

    #[test]
    fn test_usage_never_exceeds_capacity() {
        for seed in 0..4 {
            fuzz::<Lru>(seed);
            fuzz::<Fifo>(seed);
            fuzz::<Lfu>(seed);
        }
    }
}
