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

use std::{future::Future, pin::Pin, sync::Arc};

use hintcache::Group;
use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    header::CONTENT_TYPE,
    server::conn::http1,
    service::Service,
    Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

/// Serve `GET /api?key=...` for `group` on `listener`.
pub async fn serve(listener: TcpListener, group: Arc<Group>) {
    loop {
        let (stream, _) = match listener.accept().await {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("[api]: accept connection error: {e}");
                continue;
            }
        };

        let io = TokioIo::new(stream);
        let handle = Handle { group: group.clone() };

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new().serve_connection(io, handle).await {
                tracing::error!("[api]: serve request error: {e}");
            }
        });
    }
}

struct Handle {
    group: Arc<Group>,
}

impl Service<Request<Incoming>> for Handle {
    type Response = Response<Full<Bytes>>;
    type Error = anyhow::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let group = self.group.clone();

        Box::pin(async move {
            if req.uri().path() != "/api" {
                return respond(StatusCode::NOT_FOUND, "text/plain; charset=utf-8", "not found");
            }
            let key = query_key(req.uri().query().unwrap_or_default());
            match group.get(&key).await {
                Ok(value) => respond(StatusCode::OK, "application/octet-stream", value.to_vec()),
                Err(e) => respond(StatusCode::INTERNAL_SERVER_ERROR, "text/plain; charset=utf-8", e.to_string()),
            }
        })
    }
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> anyhow::Result<Response<Full<Bytes>>> {
    let resp = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(body.into()))?;
    Ok(resp)
}

/// Value of the `key` query parameter, empty if absent.
fn query_key(query: &str) -> String {
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use hintcache::{GroupBuilder, Registry};

    use super::*;

    #[test]
    fn test_query_key() {
        assert_eq!(query_key("key=Tom"), "Tom");
        assert_eq!(query_key("a=1&key=Tom%20Jr&b=2"), "Tom Jr");
        assert_eq!(query_key("key=Tom+Jr"), "Tom Jr");
        assert_eq!(query_key("other=1"), "");
        assert_eq!(query_key(""), "");
        assert_eq!(query_key("key=%E4%BD%A0"), "你");
    }

    #[test_log::test(tokio::test)]
    async fn test_api() {
        let registry = Registry::new();
        let group = GroupBuilder::new("scores")
            .with_loader(crate::db::loader())
            .build(&registry)
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve(listener, group));

        let resp = reqwest::get(format!("{base}/api?key=Tom")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.bytes().await.unwrap().as_ref(), b"630");

        let resp = reqwest::get(format!("{base}/api?key=kkk")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.text().await.unwrap(), "kkk not exist");

        let resp = reqwest::get(format!("{base}/api")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.text().await.unwrap(), "key is required");

        let resp = reqwest::get(format!("{base}/other")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
