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

use hashbrown::{hash_map::Entry, HashMap};
use hintcache_common::{RingHasher, XxHash32Hasher};

/// Consistent hash ring with virtual nodes.
///
/// Every peer is placed on the ring `replicas` times, at the hash of `"{index}{peer}"`. A key belongs to the peer
/// owning the first position at or after the hash of the key, wrapping around to the smallest position.
///
/// Nodes of one cluster agree on key ownership only if they share the hasher and the replica factor.
#[derive(Debug)]
pub struct ConsistentHash<H = XxHash32Hasher> {
    hasher: H,
    replicas: usize,
    /// Sorted virtual node positions.
    positions: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl ConsistentHash {
    /// Create an empty ring with the default hasher.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, XxHash32Hasher)
    }
}

impl<H> ConsistentHash<H>
where
    H: RingHasher,
{
    /// Create an empty ring with a custom hasher.
    pub fn with_hasher(replicas: usize, hasher: H) -> Self {
        Self {
            hasher,
            replicas,
            positions: vec![],
            owners: HashMap::new(),
        }
    }

    fn position(&self, index: usize, peer: &str) -> u32 {
        self.hasher.hash32(format!("{index}{peer}").as_bytes())
    }

    /// Place peers on the ring.
    ///
    /// A position already owned by another peer keeps its owner.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for index in 0..self.replicas {
                let position = self.position(index, peer);
                match self.owners.entry(position) {
                    Entry::Occupied(o) => {
                        if o.get() != peer {
                            tracing::debug!(peer, owner = %o.get(), position, "[ring]: position collision");
                        }
                    }
                    Entry::Vacant(v) => {
                        v.insert(peer.to_string());
                        self.positions.push(position);
                    }
                }
            }
        }
        self.positions.sort_unstable();
    }

    /// Find the peer that owns `key`, `None` if the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = self.hasher.hash32(key.as_bytes());
        let index = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[index % self.positions.len()];
        self.owners.get(&position).map(String::as_str)
    }

    /// Take a peer off the ring.
    pub fn remove(&mut self, peer: &str) {
        for index in 0..self.replicas {
            let position = self.position(index, peer);
            if self.owners.get(&position).is_some_and(|owner| owner == peer) {
                self.owners.remove(&position);
                if let Ok(i) = self.positions.binary_search(&position) {
                    self.positions.remove(i);
                }
            }
        }
    }

    /// Count of virtual node positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no peer is on the ring.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Replica factor of the ring.
    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn decimal(data: &[u8]) -> u32 {
        std::str::from_utf8(data).unwrap().parse().unwrap()
    }

    #[test]
    fn test_ring_lookup() {
        let mut ring = ConsistentHash::with_hasher(3, decimal);
        // positions: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        for (key, peer) in [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")] {
            assert_eq!(ring.get(key), Some(peer), "key {key}");
        }

        // positions 8, 18, 28 join
        ring.add(["8"]);
        for (key, peer) in [("2", "2"), ("11", "2"), ("23", "4"), ("27", "8")] {
            assert_eq!(ring.get(key), Some(peer), "key {key}");
        }

        ring.remove("8");
        assert_eq!(ring.get("27"), Some("2"));
        assert_eq!(ring.len(), 9);
    }

    #[test]
    fn test_empty_ring() {
        let mut ring = ConsistentHash::new(50);
        assert!(ring.get("key").is_none());
        ring.add(["http://localhost:8001"]);
        ring.remove("http://localhost:8001");
        assert!(ring.is_empty());
        assert!(ring.get("key").is_none());
    }

    #[test]
    fn test_remove_then_add_restores_ownership() {
        let peers = ["http://localhost:8001", "http://localhost:8002", "http://localhost:8003"];
        let keys = (0..1000).map(|i| format!("key-{i}")).collect_vec();

        let mut ring = ConsistentHash::new(50);
        ring.add(peers);
        let before = keys.iter().map(|key| ring.get(key).map(str::to_string)).collect_vec();

        ring.remove(peers[1]);
        assert!(keys.iter().all(|key| ring.get(key) != Some(peers[1])));
        ring.add([peers[1]]);

        let after = keys.iter().map(|key| ring.get(key).map(str::to_string)).collect_vec();
        assert_eq!(before, after);
        assert!(ring.positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ring.positions.len(), ring.owners.len());

        // every peer owns a share of the keys
        for peer in peers {
            assert!(before.iter().any(|owner| owner.as_deref() == Some(peer)));
        }
    }

    #[test]
    fn test_collision_keeps_first_owner() {
        let mut ring = ConsistentHash::with_hasher(2, |_: &[u8]| 7u32);
        ring.add(["a", "b"]);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("key"), Some("a"));

        ring.remove("b");
        assert_eq!(ring.get("key"), Some("a"));
        ring.remove("a");
        assert!(ring.is_empty());
    }
}
