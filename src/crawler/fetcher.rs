//! HTTP fetcher stage
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the HTTP client with the crawler's user agent
//! - One GET per URL, with no retry
//! - Turning transport and body errors into failed pages
//! - Running one sequential worker or a bounded pool of workers

use crate::config::Config;
use crate::crawler::Page;
use crate::source::UrlReceiver;
use crate::url::normalize_scheme;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::Instrument;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The user agent has the form `Name/Version (+ContactURL)`. A
/// `request-timeout-secs` of zero leaves the client without a timeout.
///
/// # Example
///
/// ```no_run
/// use sumi_sift::config::Config;
/// use sumi_sift::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.header_value())
        .gzip(true)
        .brotli(true);

    if config.crawler.request_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.crawler.request_timeout_secs));
    }

    builder.build()
}

/// Fetches one URL and wraps the outcome in a `Page`
///
/// The URL is scheme-normalized here and nowhere else. Any response that
/// delivers a body counts as fetched, whatever its status code; transport
/// and body-read errors produce a failed page carrying the error text.
pub async fn fetch_page(client: &Client, raw_url: &str) -> Page {
    let url = normalize_scheme(raw_url);
    tracing::debug!("Reading url {}", url);

    let target = match Url::parse(&url) {
        Ok(target) => target,
        Err(e) => return failed_page(url, format!("Invalid URL: {}", e)),
    };

    let response = match client.get(target).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = describe_error(&e);
            return failed_page(url, error);
        }
    };

    tracing::debug!("{} responded with HTTP {}", url, response.status().as_u16());

    match response.text().await {
        Ok(body) => Page::fetched(url, body),
        Err(e) => failed_page(url, format!("Failed to read body: {}", e)),
    }
}

/// Classifies a request error into a readable message
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}

fn failed_page(url: String, error: String) -> Page {
    tracing::warn!("Failed to fetch {}: {}", url, error);
    Page::failed(url, error)
}

/// Runs the fetcher stage until the URL sequence is exhausted
///
/// With one worker, URLs are fetched strictly one after another and pages
/// leave in input order. With more workers, up to `workers` fetches run at
/// once and page order is not preserved. Either way exactly one page is
/// sent per URL received, and the page channel closes once this function
/// returns and every worker has dropped its sender.
///
/// Returns the number of pages sent.
pub async fn run_fetcher(
    client: Client,
    urls: UrlReceiver,
    pages: mpsc::Sender<Page>,
    workers: usize,
) -> usize {
    tracing::info!("Crawling urls with {} fetch worker(s)", workers.max(1));

    let sent = if workers <= 1 {
        fetch_sequential(&client, urls, pages).await
    } else {
        fetch_pooled(client, urls, pages, workers).await
    };

    tracing::debug!("Fetcher finished, {} pages sent", sent);
    sent
}

async fn fetch_sequential(client: &Client, mut urls: UrlReceiver, pages: mpsc::Sender<Page>) -> usize {
    let mut sent = 0;
    while let Some(url) = urls.recv().await {
        let page = fetch_page(client, &url).await;
        if pages.send(page).await.is_err() {
            tracing::warn!("Page receiver closed, stopping fetcher");
            break;
        }
        sent += 1;
    }
    sent
}

async fn fetch_pooled(
    client: Client,
    urls: UrlReceiver,
    pages: mpsc::Sender<Page>,
    workers: usize,
) -> usize {
    let urls = Arc::new(Mutex::new(urls));
    let mut pool = JoinSet::new();

    for worker in 0..workers {
        let urls = Arc::clone(&urls);
        let pages = pages.clone();
        let client = client.clone();
        pool.spawn(
            async move {
                let mut sent = 0;
                loop {
                    let next = urls.lock().await.recv().await;
                    let Some(url) = next else {
                        break;
                    };
                    let page = fetch_page(&client, &url).await;
                    if pages.send(page).await.is_err() {
                        tracing::warn!("Page receiver closed, stopping worker");
                        break;
                    }
                    sent += 1;
                }
                sent
            }
            .instrument(tracing::debug_span!("fetch_worker", worker)),
        );
    }

    // Only the workers' clones may keep the page channel open
    drop(pages);

    let mut sent = 0;
    while let Some(result) = pool.join_next().await {
        match result {
            Ok(count) => sent += count,
            Err(e) => tracing::error!("Fetch worker failed: {}", e),
        }
    }
    sent
}
