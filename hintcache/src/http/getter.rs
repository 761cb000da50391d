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

use futures_util::{future::BoxFuture, FutureExt};
use hintcache_common::ByteView;
use reqwest::{Client, StatusCode};

use super::encode_segment;
use crate::{
    error::{Error, Result},
    peers::PeerGetter,
};

/// Fetches values from one remote peer over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer base url joined with the base path, e.g. `http://localhost:8001/_hint/`.
    base_url: String,
    client: Client,
}

impl HttpGetter {
    /// Create a getter of the peer whose routes live under `base_url`.
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Base url of the peer routes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, group: &str, key: &str) -> String {
        format!("{}{}/{}", self.base_url, encode_segment(group), encode_segment(key))
    }

    async fn get(&self, group: &str, key: &str) -> Result<ByteView> {
        let url = self.url(group, key);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::peer_unavailable(&self.base_url, e))?;
        if resp.status() != StatusCode::OK {
            return Err(Error::peer_unavailable(
                &self.base_url,
                format!("server returned: {}", resp.status()),
            ));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::peer_unavailable(&self.base_url, format!("reading response body: {e}")))?;
        Ok(ByteView::from(body))
    }
}

impl PeerGetter for HttpGetter {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> BoxFuture<'a, Result<ByteView>> {
        self.get(group, key).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_escapes_segments() {
        let getter = HttpGetter::new("http://localhost:8001/_hint/", Client::new());
        assert_eq!(getter.url("scores", "Tom"), "http://localhost:8001/_hint/scores/Tom");
        assert_eq!(
            getter.url("my group", "a/b?c"),
            "http://localhost:8001/_hint/my%20group/a%2Fb%3Fc"
        );
        assert_eq!(getter.url("scores", ".."), "http://localhost:8001/_hint/scores/~..");
    }

    #[test_log::test(tokio::test)]
    async fn test_unreachable_peer() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let getter = HttpGetter::new(format!("http://{addr}/_hint/"), Client::new());
        let e = getter.fetch("scores", "Tom").await.unwrap_err();
        assert!(matches!(e, Error::PeerUnavailable { .. }));
    }
}
