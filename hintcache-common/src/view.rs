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

use std::fmt::{Debug, Display};

use bytes::Bytes;

/// An immutable, size-reporting byte payload.
///
/// [`ByteView`] is the unit of value stored by the storage engine and sent to peers. The payload is never mutated
/// after construction, so one instance can be shared by the storage engine and any number of concurrent callers.
/// Accessors that hand bytes out always hand out a fresh copy.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Create a [`ByteView`] that copies the given slice.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    /// Length of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a fresh copy of the payload.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the payload as a string, replacing invalid UTF-8 sequences.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        // The vector is moved in, nobody else can reach it anymore.
        Self { bytes: Bytes::from(data) }
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self::copy_from_slice(data)
    }
}

impl From<&str> for ByteView {
    fn from(data: &str) -> Self {
        Self::copy_from_slice(data.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(data: String) -> Self {
        Self::from(data.into_bytes())
    }
}

impl Debug for ByteView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}

impl Display for ByteView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_view_copy_out() {
        let view = ByteView::from("creator");
        assert_eq!(view.len(), 7);
        assert_eq!(view.as_string(), "creator");

        let mut copy = view.to_vec();
        copy[0] = b'C';
        assert_eq!(view.to_vec(), b"creator".to_vec());
        assert_eq!(view.to_string(), "creator");
    }

    #[test]
    fn test_byte_view_detached_from_source() {
        let mut source = b"meow".to_vec();
        let view = ByteView::copy_from_slice(&source);
        source[0] = b'M';
        assert_eq!(view.as_string(), "meow");
    }

    #[test]
    fn test_byte_view_lossy_string() {
        let view = ByteView::from(vec![0x66, 0x6f, 0xff]);
        assert_eq!(view.len(), 3);
        assert_eq!(view.as_string(), "fo\u{fffd}");
        assert!(!view.is_empty());
        assert!(ByteView::default().is_empty());
    }
}
