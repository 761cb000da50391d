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

use hintcache_common::ByteView;

/// Observer of entries leaving the storage under budget pressure.
///
/// The listener is called synchronously, once per evicted entry, while the storage is still borrowed mutably. It
/// must not call back into the same storage.
pub trait EvictionListener: Send + Sync + 'static {
    /// Called with the key and the value of the evicted entry.
    fn on_evict(&self, key: &str, value: ByteView);
}

impl<F> EvictionListener for F
where
    F: Fn(&str, ByteView) + Send + Sync + 'static,
{
    fn on_evict(&self, key: &str, value: ByteView) {
        self(key, value)
    }
}
