//! Fetches a URL through the native host and prints the response.
//!
//! ```text
//! RUST_LOG=trace cargo run --example fetch_url -- https://example.com/ [timeout-ms]
//! ```
use std::time::Duration;

use anyhow::{bail, Context};
use fetch_bridge::config::HostConfig;
use fetch_bridge::net::{method, Fetcher, NativeHost, RequestOptions};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: fetch_url <url> [timeout-ms]");
    };
    let timeout = match args.next() {
        Some(ms) => Some(Duration::from_millis(ms.parse().context("timeout must be in milliseconds")?)),
        None => None,
    };

    let fetcher = Fetcher::new(NativeHost::new(Some(HostConfig::default()))?);

    // The bridge has no timeout of its own; a deadline is just a token cancelled later.
    let cancel = CancellationToken::new();
    if let Some(timeout) = timeout {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        });
    }

    let resp = fetcher
        .fetch(&url, RequestOptions::new().method(method::GET).signal(cancel))
        .await?;

    println!("{} {} ({})", resp.status, resp.status_text, resp.url);
    let mut names: Vec<_> = resp.headers.iter().collect();
    names.sort_by_key(|(k, _)| *k);
    for (key, values) in names {
        for value in values {
            println!("{key}: {value}");
        }
    }
    println!();
    println!("{}", resp.text());

    Ok(())
}
