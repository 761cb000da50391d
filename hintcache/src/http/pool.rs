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
use parking_lot::Mutex;
use reqwest::Client;

use super::getter::HttpGetter;
use crate::{
    peers::{PeerGetter, PeerPicker},
    registry::Registry,
    ring::ConsistentHash,
};

/// Default prefix of the peer routes.
pub const DEFAULT_BASE_PATH: &str = "/_hint/";
/// Default count of virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

/// Options of [`HttpPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpPoolOptions {
    /// Prefix of the peer routes, must start and end with `/`.
    pub base_path: String,
    /// Count of virtual nodes per peer on the hash ring.
    pub replicas: usize,
}

impl Default for HttpPoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
        }
    }
}

struct Peers {
    ring: ConsistentHash,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// The HTTP peer pool of a node.
///
/// The pool picks the owner of a key among the known peers and serves the groups of its [`Registry`] to the other
/// peers, see [`HttpPool::serve`].
pub struct HttpPool {
    /// Base url of this node, e.g. `http://localhost:8001`.
    this: String,
    options: HttpPoolOptions,
    registry: Registry,
    client: Client,
    peers: Mutex<Peers>,
}

impl std::fmt::Debug for HttpPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPool")
            .field("this", &self.this)
            .field("options", &self.options)
            .field("peers", &self.peers())
            .finish()
    }
}

impl HttpPool {
    /// Create a pool of the node reachable at `this`, with default options.
    pub fn new(this: impl Into<String>, registry: Registry) -> Self {
        Self::with_options(this, registry, HttpPoolOptions::default())
    }

    /// Create a pool of the node reachable at `this`.
    pub fn with_options(this: impl Into<String>, registry: Registry, options: HttpPoolOptions) -> Self {
        let peers = Peers {
            ring: ConsistentHash::new(options.replicas),
            getters: HashMap::new(),
        };
        Self {
            this: this.into(),
            options,
            registry,
            client: Client::new(),
            peers: Mutex::new(peers),
        }
    }

    /// Base url of this node.
    pub fn this(&self) -> &str {
        &self.this
    }

    /// Prefix of the peer routes.
    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    /// Groups served by this node.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Replace the known peers.
    ///
    /// `peers` are base urls like `http://localhost:8001` and should include this node, so that every node builds
    /// the same ring.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers = peers.into_iter().map(Into::into).collect::<Vec<String>>();

        let mut ring = ConsistentHash::new(self.options.replicas);
        ring.add(&peers);
        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(format!("{peer}{}", self.options.base_path), self.client.clone());
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.peers.lock() = Peers { ring, getters };
        tracing::info!(this = %self.this, ?peers, "[pool]: peers set");
    }

    /// Sorted base urls of the known peers.
    pub fn peers(&self) -> Vec<String> {
        let mut peers = self.peers.lock().getters.keys().cloned().collect::<Vec<_>>();
        peers.sort();
        peers
    }
}

impl PeerPicker for HttpPool {
    fn pick(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let peers = self.peers.lock();
        let peer = peers.ring.get(key)?;
        if peer == self.this {
            return None;
        }
        tracing::debug!(this = %self.this, peer, key, "[pool]: pick peer");
        let getter = peers.getters.get(peer)?.clone();
        Some(getter as Arc<dyn PeerGetter>)
    }
}
