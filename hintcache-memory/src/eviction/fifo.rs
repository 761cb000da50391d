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

/// First in, first out eviction.
///
/// The order is fixed at insertion time. Neither reads nor overwrites move a key, so the oldest surviving insertion
/// is always evicted first.
#[derive(Debug, Default)]
pub struct Fifo {
    queue: Dlist<Arc<str>>,
}

impl Eviction for Fifo {
    type Handle = Token;

    fn new() -> Self {
        Self { queue: Dlist::new() }
    }

    fn push(&mut self, key: Arc<str>) -> Self::Handle {
        self.queue.push_back(key)
    }

    fn pop(&mut self) -> Option<Arc<str>> {
        self.queue.pop_front()
    }

    fn access(&mut self, _: &Self::Handle) {}

    fn update(&mut self, _: &Self::Handle) {}

    fn order(&self) -> Vec<Arc<str>> {
        self.queue.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
