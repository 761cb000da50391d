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

use futures_util::future::BoxFuture;
use hintcache_common::ByteView;

use crate::error::Result;

/// A remote peer that can serve values of any group.
pub trait PeerGetter: Send + Sync + 'static {
    /// Identity of the peer, used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the value of `key` in `group` from the peer with exactly one request.
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> BoxFuture<'a, Result<ByteView>>;
}

/// Selects the remote peer that owns a key.
pub trait PeerPicker: Send + Sync + 'static {
    /// Returns the owner of `key`, or `None` if the local node owns it or no peer is known.
    fn pick(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
