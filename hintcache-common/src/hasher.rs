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

use twox_hash::XxHash32;

/// A deterministic 32-bit hash used to place peers and keys on the consistent hash ring.
///
/// Every node of a cluster must use the same hasher, or nodes disagree on key ownership. Closures of type
/// `Fn(&[u8]) -> u32` are hashers too, which is how a cluster shared with nodes hashing by another checksum is joined.
pub trait RingHasher: Send + Sync + 'static {
    /// Hash the given bytes.
    fn hash32(&self, data: &[u8]) -> u32;
}

/// The default ring hasher, xxHash32 with seed `0`.
///
/// Rings built by groupcache-style nodes commonly hash with CRC32-IEEE. Those place peers and keys at different
/// positions than this hasher, so a mixed cluster needs a CRC32-IEEE hasher supplied on every node instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct XxHash32Hasher;

impl RingHasher for XxHash32Hasher {
    fn hash32(&self, data: &[u8]) -> u32 {
        XxHash32::oneshot(0, data)
    }
}

impl<F> RingHasher for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    fn hash32(&self, data: &[u8]) -> u32 {
        self(data)
    }
}
