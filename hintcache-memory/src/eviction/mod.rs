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

use std::{fmt::Display, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordering structure of an eviction algorithm.
///
/// The storage indexer owns the entries and keeps the [`Eviction::Handle`] returned by [`Eviction::push`] next to
/// each value. The eviction algorithm only tracks keys and decides which one leaves first.
///
/// A handle is valid from the [`Eviction::push`] that returned it until its key is returned by [`Eviction::pop`].
pub trait Eviction: Send + Sync + 'static {
    /// Per-entry state kept by the storage indexer.
    type Handle: std::fmt::Debug + Send + Sync + 'static;

    /// Create an empty eviction container.
    fn new() -> Self
    where
        Self: Sized;

    /// Track a newly inserted key.
    fn push(&mut self, key: Arc<str>) -> Self::Handle;

    /// Untrack and return the key that should be evicted next.
    fn pop(&mut self) -> Option<Arc<str>>;

    /// Record a read hit on a tracked key.
    fn access(&mut self, handle: &Self::Handle);

    /// Record an overwrite of a tracked key.
    fn update(&mut self, handle: &Self::Handle);

    /// Tracked keys in eviction order, the next victim first.
    fn order(&self) -> Vec<Arc<str>>;

    /// Count of tracked keys.
    fn len(&self) -> usize;

    /// Returns `true` if no key is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Eviction algorithm selection.
///
/// The algorithm is chosen once when the storage is built and never changes afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionConfig {
    /// Least recently used.
    #[default]
    Lru,
    /// First in, first out.
    Fifo,
    /// Least frequently used.
    Lfu,
}

impl EvictionConfig {
    /// Lowercase name of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionConfig::Lru => "lru",
            EvictionConfig::Fifo => "fifo",
            EvictionConfig::Lfu => "lfu",
        }
    }
}

impl Display for EvictionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionConfig::Lru),
            "fifo" => Ok(EvictionConfig::Fifo),
            "lfu" => Ok(EvictionConfig::Lfu),
            _ => Err(Error::UnknownEviction(s.to_string())),
        }
    }
}

pub mod fifo;
pub mod lfu;
pub mod lru;

mod heap;
mod list;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_config_from_str() {
        assert_eq!("lru".parse::<EvictionConfig>(), Ok(EvictionConfig::Lru));
        assert_eq!("FIFO".parse::<EvictionConfig>(), Ok(EvictionConfig::Fifo));
        assert_eq!("Lfu".parse::<EvictionConfig>(), Ok(EvictionConfig::Lfu));
        assert_eq!(
            "arc".parse::<EvictionConfig>(),
            Err(Error::UnknownEviction("arc".to_string()))
        );
        assert_eq!(EvictionConfig::default(), EvictionConfig::Lru);
        for config in [EvictionConfig::Lru, EvictionConfig::Fifo, EvictionConfig::Lfu] {
            assert_eq!(config.to_string().parse::<EvictionConfig>(), Ok(config));
        }
    }
}
