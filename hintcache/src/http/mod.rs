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

//! HTTP peer transport.
//!
//! A peer serves `GET {base_path}{group}/{key}`, with the group name and the key percent-escaped:
//!
//! - `200` with `Content-Type: application/octet-stream` and the raw value as body.
//! - `400` for a malformed path or an empty key.
//! - `404` for an unknown group or a path outside the base path.
//! - `405` for any method other than `GET`.
//! - `500` with the error text as body for any other error.
//!
//! URL parsers drop `.` and `..` path segments, escaped or not. A segment that is `.`, `..` or starts with `~` is
//! therefore sent with one extra leading `~`, which the server strips after percent-decoding.

mod getter;
mod pool;
mod server;

pub use getter::HttpGetter;
pub use pool::{HttpPool, HttpPoolOptions, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

const SEGMENT_ESCAPE: char = '~';

/// Percent-escape one path segment, guarding dot segments.
fn encode_segment(segment: &str) -> String {
    let encoded = urlencoding::encode(segment);
    if segment == "." || segment == ".." || segment.starts_with(SEGMENT_ESCAPE) {
        format!("{SEGMENT_ESCAPE}{encoded}")
    } else {
        encoded.into_owned()
    }
}

/// Reverse [`encode_segment`], `None` if the segment is not valid UTF-8 once decoded.
fn decode_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?;
    Some(decoded.strip_prefix(SEGMENT_ESCAPE).unwrap_or(&decoded).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_segments_survive() {
        assert_eq!(encode_segment("."), "~.");
        assert_eq!(encode_segment(".."), "~..");
        assert_eq!(encode_segment("..."), "...");
        assert_eq!(encode_segment("~home"), "~~home");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");

        for segment in [".", "..", "...", "~", "~home", "a b/c", "Tom"] {
            assert_eq!(decode_segment(&encode_segment(segment)).as_deref(), Some(segment));
        }
        assert_eq!(decode_segment("%FF"), None);
    }
}
