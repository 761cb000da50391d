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

/// hintcache error.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The requested key is empty.
    #[error("key is required")]
    InvalidKey,
    /// The loader of a group failed, the error is passed through untouched.
    #[error("{0}")]
    Loader(Arc<anyhow::Error>),
    /// A remote peer could not serve the request.
    #[error("peer {peer} unavailable: {reason}")]
    PeerUnavailable {
        /// Base url of the peer.
        peer: String,
        /// Transport error or unexpected status.
        reason: String,
    },
    /// No group is registered under the name.
    #[error("no such group: {0}")]
    UnknownGroup(String),
    /// A group was built without a loader.
    #[error("group {group} requires a loader")]
    MissingLoader {
        /// Name of the group.
        group: String,
    },
    /// A peer picker was registered twice on the same group.
    #[error("peer picker of group {group} is already registered")]
    PeersAlreadyRegistered {
        /// Name of the group.
        group: String,
    },
}

impl Error {
    /// Wrap a loader error.
    pub fn loader(e: impl Into<anyhow::Error>) -> Self {
        Self::Loader(Arc::new(e.into()))
    }

    /// Build a [`Error::PeerUnavailable`] error.
    pub fn peer_unavailable(peer: impl Into<String>, reason: impl ToString) -> Self {
        Self::PeerUnavailable {
            peer: peer.into(),
            reason: reason.to_string(),
        }
    }
}

/// hintcache result.
pub type Result<T> = std::result::Result<T, Error>;
