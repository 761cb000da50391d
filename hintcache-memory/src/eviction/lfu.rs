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

use super::{
    heap::{FrequencyHeap, Token},
    Eviction,
};

/// Least frequently used eviction.
///
/// Every key carries an access counter, starting at `1` on insertion and incremented on every read hit and every
/// overwrite. The key with the globally minimum count is evicted first. Among equal counts, the key touched least
/// recently goes first.
#[derive(Debug, Default)]
pub struct Lfu {
    heap: FrequencyHeap,
}

impl Eviction for Lfu {
    type Handle = Token;

    fn new() -> Self {
        Self {
            heap: FrequencyHeap::new(),
        }
    }

    fn push(&mut self, key: Arc<str>) -> Self::Handle {
        self.heap.push(key)
    }

    fn pop(&mut self) -> Option<Arc<str>> {
        self.heap.pop()
    }

    fn access(&mut self, handle: &Self::Handle) {
        self.heap.bump(*handle);
    }

    fn update(&mut self, handle: &Self::Handle) {
        self.heap.bump(*handle);
    }

    fn order(&self) -> Vec<Arc<str>> {
        self.heap.sorted()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn order(lfu: &Lfu) -> Vec<String> {
        lfu.order().iter().map(|key| key.to_string()).collect_vec()
    }

    #[test]
    fn test_lfu() {
        let mut lfu = Lfu::new();
        let handles = ["a", "b", "c", "d"].into_iter().map(|key| lfu.push(key.into())).collect_vec();

        // a: 3, b: 1, c: 2, d: 2
        lfu.access(&handles[0]);
        lfu.access(&handles[0]);
        lfu.access(&handles[2]);
        lfu.update(&handles[3]);
        assert_eq!(order(&lfu), vec!["b", "c", "d", "a"]);

        assert_eq!(lfu.pop().as_deref(), Some("b"));
        assert_eq!(lfu.pop().as_deref(), Some("c"));
        assert_eq!(lfu.pop().as_deref(), Some("d"));
        assert_eq!(lfu.pop().as_deref(), Some("a"));
        assert!(lfu.is_empty());
    }
}
