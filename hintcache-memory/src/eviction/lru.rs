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
    list::{Dlist, Token},
    Eviction,
};

/// Least recently used eviction.
///
/// Keys are kept in a recency list, the least recently used one at the front. Both reads and overwrites move a key
/// to the back.
#[derive(Debug, Default)]
pub struct Lru {
    list: Dlist<Arc<str>>,
}

impl Eviction for Lru {
    type Handle = Token;

    fn new() -> Self {
        Self { list: Dlist::new() }
    }

    fn push(&mut self, key: Arc<str>) -> Self::Handle {
        self.list.push_back(key)
    }

    fn pop(&mut self) -> Option<Arc<str>> {
        self.list.pop_front()
    }

    fn access(&mut self, handle: &Self::Handle) {
        self.list.move_to_back(*handle);
    }

    fn update(&mut self, handle: &Self::Handle) {
        self.list.move_to_back(*handle);
    }

    fn order(&self) -> Vec<Arc<str>> {
        self.list.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.list.len()
    }
}
