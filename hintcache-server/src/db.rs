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

use hintcache::Loader;

/// The slow source of truth of the demo.
const SCORES: [(&str, &str); 3] = [("Tom", "630"), ("Jack", "589"), ("Sam", "567")];

/// Loader of the `scores` group.
pub fn loader() -> impl Loader {
    |key: String| async move {
        tracing::info!(key = %key, "[slow db]: search key");
        SCORES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, score)| score.as_bytes().to_vec())
            .ok_or_else(|| anyhow::anyhow!("{key} not exist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_loader() {
        let loader = loader();
        assert_eq!(loader.load("Tom").await.unwrap(), b"630");
        assert_eq!(loader.load("kkk").await.unwrap_err().to_string(), "kkk not exist");
    }
}
