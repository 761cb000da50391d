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

//! `hintcache-server` runs one demo node of a hintcache cluster.
//!
//! Every node serves the `scores` group to its peers. Start three nodes and a front api on the first one:
//!
//! ```sh
//! hintcache-server --port 8001 --api &
//! hintcache-server --port 8002 &
//! hintcache-server --port 8003 &
//! curl "http://localhost:9999/api?key=Tom"
//! ```

mod api;
mod db;

use std::sync::Arc;

use clap::Parser;
use hintcache::prelude::*;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Port of the peer server.
    #[arg(long, default_value_t = 8001)]
    port: u16,

    /// Host the other peers reach this node by.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Base url of a peer, including this node. Repeat for every peer.
    #[arg(
        long = "peer",
        default_values = ["http://localhost:8001", "http://localhost:8002", "http://localhost:8003"]
    )]
    peers: Vec<String>,

    /// Start the front api server.
    #[arg(long, default_value_t = false)]
    api: bool,

    /// Listen address of the front api server.
    #[arg(long, default_value = "localhost:9999")]
    api_addr: String,

    /// Byte budget of the scores group, 0 for unbounded.
    #[arg(long, default_value_t = 2 << 10)]
    capacity: usize,

    /// Eviction algorithm of the scores group: lru, fifo or lfu.
    #[arg(long, default_value_t = EvictionConfig::Lru)]
    eviction: EvictionConfig,
}

fn init_logger() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_line_number(true))
        .with(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();
    tracing::debug!(?args, "[server]: start");

    let registry = Registry::new();
    let group = GroupBuilder::new("scores")
        .with_capacity(args.capacity)
        .with_eviction_config(args.eviction)
        .with_loader(db::loader())
        .build(&registry)?;

    let this = format!("http://{}:{}", args.host, args.port);
    let pool = Arc::new(HttpPool::new(this.clone(), registry));
    pool.set(args.peers);
    group.register_peers(pool.clone())?;

    if args.api {
        let listener = TcpListener::bind(&args.api_addr).await?;
        tracing::info!("[server]: api server is running at http://{}", args.api_addr);
        tokio::spawn(api::serve(listener, group));
    }

    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    tracing::info!("[server]: hintcache is running at {this}");
    pool.serve(listener).await;

    Ok(())
}
