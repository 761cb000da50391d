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

//! hintcache - distributed peer-aware cache for Rust.
//!
//! A [`Group`] is a named cache namespace. Every node of a cluster creates the same groups, each bound to a
//! [`Loader`] that produces the value of a key from the source of truth. On a miss, a node asks the peer that owns
//! the key on the [`ConsistentHash`] ring, and loads the value itself if it is the owner or the owner is
//! unreachable. Concurrent misses of the same key are coalesced into one computation.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hintcache::prelude::*;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let registry = Registry::new();
//! let group = GroupBuilder::new("scores")
//!     .with_capacity(2 << 10)
//!     .with_eviction_config(EvictionConfig::Lru)
//!     .with_loader(|key: String| async move { anyhow::Ok(key.into_bytes()) })
//!     .build(&registry)?;
//!
//! let pool = Arc::new(HttpPool::new("http://localhost:8001", registry));
//! pool.set(["http://localhost:8001", "http://localhost:8002", "http://localhost:8003"]);
//! group.register_peers(pool.clone())?;
//!
//! let listener = tokio::net::TcpListener::bind("localhost:8001").await?;
//! tokio::spawn(pool.serve(listener));
//!
//! let value = group.get("Tom").await?;
//! println!("{value}");
//! # Ok(())
//! # }
//! ```

mod error;
mod flight;
mod group;
mod http;
mod peers;
mod registry;
mod ring;

/// Re-exported hintcache components.
pub mod prelude;
pub use prelude::*;
