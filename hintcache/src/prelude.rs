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

pub use hintcache_common::{ByteView, RingHasher, XxHash32Hasher};
pub use hintcache_memory::{EvictionConfig, EvictionListener, Storage, StorageBuilder};

pub use crate::{
    error::{Error, Result},
    flight::Flight,
    group::{Group, GroupBuilder, GroupStats, Loader, StatsSnapshot},
    http::{HttpGetter, HttpPool, HttpPoolOptions, DEFAULT_BASE_PATH, DEFAULT_REPLICAS},
    peers::{PeerGetter, PeerPicker},
    registry::Registry,
    ring::ConsistentHash,
};
