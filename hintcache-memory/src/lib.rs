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

//! Byte-budgeted in-memory storage engine for hintcache.
//!
//! A [`Storage`] maps string keys to [`ByteView`](hintcache_common::ByteView) values and keeps the total weight
//! (`key.len() + value.len()` per entry) within a byte budget. When an insertion overflows the budget, entries are
//! evicted in the order decided by the [`Eviction`] algorithm chosen at construction:
//!
//! - [`Lru`]: evicts the least recently used entry.
//! - [`Fifo`]: evicts the oldest insertion, reads never reorder.
//! - [`Lfu`]: evicts the least frequently used entry.
//!
//! Every evicted entry is reported to the optional [`EvictionListener`].

mod error;
mod eviction;
mod listener;
mod raw;
mod storage;

/// Re-exported storage engine components.
pub mod prelude;
pub use prelude::*;
