use std::time::{Duration, Instant};

use futures::StreamExt;
use reqwest::Client;

use crate::analyze::ResponseHeaders;

/// A fetched page, ready to hand to the analyzer.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
    pub truncated: bool,
    pub response_ms: u64,
}

/// Fetch `url` with retries and exponential backoff.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    max_body_bytes: usize,
    retries: usize,
    backoff_initial_ms: u64,
    backoff_max_ms: u64,
) -> anyhow::Result<FetchedPage> {
    let max_retries = retries.clamp(1, 10);
    let mut backoff = backoff_initial_ms.max(1);
    for attempt in 1..=max_retries {
        match fetch_once(client, url, max_body_bytes).await {
            Ok(page) => return Ok(page),
            Err(e) => {
                if attempt >= max_retries {
                    return Err(e);
                }
                tracing::debug!(url, attempt, error = %e, "fetch failed, retrying");
                // exponential backoff with cap
                let wait_ms = std::cmp::min(backoff, backoff_max_ms);
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                backoff = backoff.saturating_mul(2);
            }
        }
    }
    Err(anyhow::anyhow!("fetch failed after {} attempts", max_retries))
}

async fn fetch_once(client: &Client, url: &str, max_body_bytes: usize) -> anyhow::Result<FetchedPage> {
    let start = Instant::now();
    let resp = client.get(url).send().await?;

    let status = resp.status().as_u16();
    // The analyzer grades the page that was actually served, after redirects
    let final_url = resp.url().to_string();
    let headers = ResponseHeaders::from(resp.headers());

    let mut body = Vec::new();
    let mut truncated = false;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let room = max_body_bytes.saturating_sub(body.len());
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        body.extend_from_slice(&chunk);
    }

    if truncated {
        tracing::warn!(url, limit = max_body_bytes, "response body truncated");
    }

    Ok(FetchedPage {
        final_url,
        status,
        headers,
        body,
        truncated,
        response_ms: start.elapsed().as_millis() as u64,
    })
}
