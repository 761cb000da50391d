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

use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    header::CONTENT_TYPE,
    server::conn::http1,
    service::Service,
    Method, Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use super::{decode_segment, pool::HttpPool};
use crate::error::Error;

impl HttpPool {
    /// Serve the peer routes on `listener` until the task is dropped.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) {
        tracing::info!(this = %self.this(), base_path = %self.base_path(), "[pool]: serving peers");
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(res) => res,
                Err(e) => {
                    tracing::error!("[pool]: accept connection error: {e}");
                    continue;
                }
            };

            let io = TokioIo::new(stream);
            let handle = Handle { pool: self.clone() };

            tokio::spawn(async move {
                if let Err(e) = http1::Builder::new().serve_connection(io, handle).await {
                    tracing::error!("[pool]: serve request error: {e}");
                }
            });
        }
    }
}

struct Handle {
    pool: Arc<HttpPool>,
}

impl Service<Request<Incoming>> for Handle {
    type Response = Response<Full<Bytes>>;
    type Error = anyhow::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let pool = self.pool.clone();
        Box::pin(async move { handle(&pool, req).await })
    }
}

fn text(status: StatusCode, body: impl Into<Bytes>) -> anyhow::Result<Response<Full<Bytes>>> {
    let resp = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(body.into()))?;
    Ok(resp)
}

async fn handle(pool: &HttpPool, req: Request<Incoming>) -> anyhow::Result<Response<Full<Bytes>>> {
    if req.method() != Method::GET {
        return text(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
    }

    let path = req.uri().path();
    tracing::debug!(this = %pool.this(), path, "[pool]: request");
    let Some(rest) = path.strip_prefix(pool.base_path()) else {
        return text(StatusCode::NOT_FOUND, format!("unexpected path: {path}"));
    };
    let (group, key) = match rest.split('/').collect::<Vec<_>>()[..] {
        [group, key] => (group, key),
        _ => return text(StatusCode::BAD_REQUEST, "bad request"),
    };
    let (Some(group), Some(key)) = (decode_segment(group), decode_segment(key)) else {
        return text(StatusCode::BAD_REQUEST, "bad request");
    };

    let Some(group) = pool.registry().get(&group) else {
        return text(StatusCode::NOT_FOUND, Error::UnknownGroup(group).to_string());
    };
    group.stats().record_server_request();

    match group.get(&key).await {
        Ok(value) => {
            let resp = Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(Full::new(Bytes::from(value.to_vec())))?;
            Ok(resp)
        }
        Err(e @ Error::InvalidKey) => text(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
