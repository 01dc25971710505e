//! Integration tests for the fetch-and-match pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run the
//! source, fetcher and matcher end-to-end.

use std::io::Cursor;
use std::time::Duration;
use sumi_sift::config::Config;
use sumi_sift::crawler::{build_http_client, run_fetcher, Page, Pipeline, PipelineOptions, TermMatcher};
use sumi_sift::output::{FileSink, WriterSink};
use sumi_sift::source::{url_channel, UrlLimit, UrlSource};
use sumi_sift::{run_pipeline, RunState, SiftError};
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An address nothing listens on, so requests fail to connect
const UNREACHABLE: &str = "http://127.0.0.1:1/";

/// Mounts a GET handler at `route` returning `body`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Builds CSV text with one `rank,url` record per URL, plus a header row
fn csv_for(urls: &[String]) -> String {
    let mut csv = String::from("Rank,URL\n");
    for (i, url) in urls.iter().enumerate() {
        csv.push_str(&format!("{},{}\n", i + 1, url));
    }
    csv
}

fn test_pipeline(options: PipelineOptions) -> Pipeline {
    let client = build_http_client(&Config::default()).expect("Failed to build client");
    Pipeline::new(client, options)
}

/// Runs the pipeline over `csv`, returning the summary and sink contents
async fn sift(csv: String, term: &str, options: PipelineOptions) -> (sumi_sift::RunSummary, String) {
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("results.txt");

    let sink = FileSink::create(&results_path).expect("Failed to create sink");
    let source = UrlSource::from_reader(Cursor::new(csv));
    let matcher = TermMatcher::literal(term).unwrap();

    let mut pipeline = test_pipeline(options);
    let summary = pipeline.run(source, matcher, sink).await.expect("Run failed");
    assert_eq!(pipeline.state(), RunState::Done);

    let written = std::fs::read_to_string(&results_path).unwrap();
    (summary, written)
}

#[tokio::test]
async fn test_scheme_less_url_matches_and_failed_fetch_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body>Hello world</body></html>").await;

    // The mock server's address has no scheme, like "example.com"
    let bare = server.address().to_string();
    let csv = csv_for(&[bare.clone(), UNREACHABLE.to_string()]);

    let (summary, written) = sift(csv, "hello", PipelineOptions::default()).await;

    assert_eq!(written, format!("http://{} has term\n", bare));
    assert_eq!(summary.matches, 1);
    assert_eq!(summary.urls_read, 2);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.pages_failed, 1);
}

#[tokio::test]
async fn test_matching_is_case_insensitive() {
    let server = MockServer::start().await;
    mount_page(&server, "/lower", "a cat").await;
    mount_page(&server, "/upper", "A CAT").await;
    mount_page(&server, "/title", "A Cat").await;
    mount_page(&server, "/none", "a dog").await;

    let base = server.uri();
    let urls: Vec<String> = ["/lower", "/upper", "/title", "/none"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();

    let (summary, written) = sift(csv_for(&urls), "Cat", PipelineOptions::default()).await;

    assert_eq!(summary.matches, 3);
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("{}/lower has term", base),
            format!("{}/upper has term", base),
            format!("{}/title has term", base),
        ]
    );
}

#[tokio::test]
async fn test_every_match_written_exactly_once() {
    let server = MockServer::start().await;
    for i in 0..6 {
        let body = if i % 2 == 0 { "needle" } else { "hay" };
        mount_page(&server, &format!("/p{}", i), body).await;
    }

    let urls: Vec<String> = (0..6).map(|i| format!("{}/p{}", server.uri(), i)).collect();
    let (summary, written) = sift(csv_for(&urls), "needle", PipelineOptions::default()).await;

    assert_eq!(summary.matches, written.lines().count());
    for i in [0, 2, 4] {
        let line = format!("{}/p{} has term", server.uri(), i);
        assert_eq!(written.lines().filter(|l| *l == line).count(), 1);
    }
}

#[tokio::test]
async fn test_non_success_status_is_still_searched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("needle not found"))
        .mount(&server)
        .await;

    let urls = vec![format!("{}/missing", server.uri())];
    let (summary, _) = sift(csv_for(&urls), "needle", PipelineOptions::default()).await;

    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.matches, 1);
}

#[tokio::test]
async fn test_empty_provider_completes_with_zero() {
    let (summary, written) = sift(String::new(), "hello", PipelineOptions::default()).await;

    assert_eq!(summary.urls_read, 0);
    assert_eq!(summary.matches, 0);
    assert!(written.is_empty());
}

#[tokio::test]
async fn test_missing_provider_file_completes_with_zero() {
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("results.txt");
    let sink = FileSink::create(&results_path).unwrap();

    let mut pipeline = test_pipeline(PipelineOptions::default());
    let summary = pipeline
        .run(
            UrlSource::from_path(dir.path().join("missing.csv")),
            TermMatcher::literal("hello").unwrap(),
            sink,
        )
        .await
        .expect("Run failed");

    assert_eq!(pipeline.state(), RunState::Done);
    assert_eq!(summary.urls_read, 0);
    assert_eq!(summary.matches, 0);
    assert_eq!(std::fs::read_to_string(&results_path).unwrap(), "");
}

#[tokio::test]
async fn test_limit_caps_fetch_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(2)
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..5).map(|i| format!("{}/u{}", server.uri(), i)).collect();
    let source = UrlSource::from_reader(Cursor::new(csv_for(&urls))).limit(UrlLimit::at_most(2));

    let mut pipeline = test_pipeline(PipelineOptions::default());
    let summary = pipeline
        .run(source, TermMatcher::literal("hello").unwrap(), WriterSink::new(Vec::new()))
        .await
        .expect("Run failed");

    assert_eq!(summary.urls_read, 2);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.matches, 2);
    // The mock verifies exactly two requests when the server drops
}

#[tokio::test]
async fn test_unlimited_fetches_every_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(5)
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..5).map(|i| format!("{}/u{}", server.uri(), i)).collect();
    let source =
        UrlSource::from_reader(Cursor::new(csv_for(&urls))).limit(UrlLimit::from_raw(-1));

    let mut pipeline = test_pipeline(PipelineOptions::default());
    let summary = pipeline
        .run(source, TermMatcher::literal("hello").unwrap(), WriterSink::new(Vec::new()))
        .await
        .expect("Run failed");

    assert_eq!(summary.pages_fetched, 5);
}

#[tokio::test]
async fn test_bounded_url_channel_run() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "hello").await;
    mount_page(&server, "/b", "hello").await;
    mount_page(&server, "/c", "bye").await;

    let urls: Vec<String> = ["/a", "/b", "/c"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    let options = PipelineOptions {
        buffer_capacity: 1,
        fetch_workers: 1,
        url_channel_capacity: Some(1),
    };

    let (summary, written) = sift(csv_for(&urls), "hello", options).await;

    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.matches, 2);
    assert_eq!(written.lines().count(), 2);
}

/// Feeds `urls` through the fetcher alone and collects the pages it emits
async fn fetch_all(urls: &[String], workers: usize, buffer: usize) -> (usize, Vec<Page>) {
    let (url_tx, url_rx) = url_channel(None);
    for url in urls {
        assert!(url_tx.send_blocking(url.clone()));
    }
    drop(url_tx);

    let (page_tx, mut page_rx) = mpsc::channel(buffer);
    let client = build_http_client(&Config::default()).unwrap();
    let fetcher = tokio::spawn(run_fetcher(client, url_rx, page_tx, workers));

    let mut pages = Vec::new();
    while let Some(page) = page_rx.recv().await {
        pages.push(page);
    }

    (fetcher.await.unwrap(), pages)
}

#[tokio::test]
async fn test_single_worker_preserves_order_and_count() {
    let server = MockServer::start().await;
    for i in 0..8 {
        mount_page(&server, &format!("/p{}", i), &format!("body {}", i)).await;
    }

    let mut urls: Vec<String> = (0..8).map(|i| format!("{}/p{}", server.uri(), i)).collect();
    urls.insert(3, UNREACHABLE.to_string());

    let (sent, pages) = fetch_all(&urls, 1, 2).await;

    assert_eq!(sent, urls.len());
    assert_eq!(pages.len(), urls.len());
    let page_urls: Vec<&str> = pages.iter().map(|p| p.url()).collect();
    assert_eq!(page_urls, urls.iter().map(String::as_str).collect::<Vec<_>>());

    assert!(pages[3].is_failed());
    assert_eq!(pages[4].body(), "body 3");
}

#[tokio::test]
async fn test_worker_pool_emits_one_page_per_url() {
    let server = MockServer::start().await;
    for i in 0..12 {
        mount_page(&server, &format!("/p{}", i), "ok").await;
    }

    let urls: Vec<String> = (0..12).map(|i| format!("{}/p{}", server.uri(), i)).collect();
    let (sent, pages) = fetch_all(&urls, 4, 3).await;

    assert_eq!(sent, 12);
    let mut page_urls: Vec<String> = pages.iter().map(|p| p.url().to_string()).collect();
    let mut expected = urls.clone();
    page_urls.sort();
    expected.sort();
    assert_eq!(page_urls, expected);
    assert!(pages.iter().all(|p| !p.is_failed()));
}

#[tokio::test]
async fn test_fetcher_normalizes_bare_addresses() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "home").await;

    let bare = server.address().to_string();
    let (_, pages) = fetch_all(&[bare.clone()], 1, 1).await;

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].url(), format!("http://{}", bare));
    assert_eq!(pages[0].body(), "home");
    assert!(!pages[0].is_failed());
}

#[tokio::test]
async fn test_full_page_buffer_pauses_fetcher() {
    let server = MockServer::start().await;
    for i in 0..5 {
        mount_page(&server, &format!("/p{}", i), "ok").await;
    }

    let (url_tx, url_rx) = url_channel(None);
    for i in 0..5 {
        assert!(url_tx.send_blocking(format!("{}/p{}", server.uri(), i)));
    }
    drop(url_tx);

    let (page_tx, mut page_rx) = mpsc::channel(1);
    let client = build_http_client(&Config::default()).unwrap();
    let fetcher = tokio::spawn(run_fetcher(client, url_rx, page_tx, 1));

    // One page fills the buffer and the next one waits in `send`
    tokio::time::sleep(Duration::from_millis(300)).await;
    let requested = server.received_requests().await.unwrap().len();
    assert!((1..=2).contains(&requested), "fetched {} pages ahead", requested);
    assert!(!fetcher.is_finished());

    let mut pages = Vec::new();
    while let Some(page) = page_rx.recv().await {
        pages.push(page);
    }

    assert_eq!(fetcher.await.unwrap(), 5);
    assert_eq!(pages.len(), 5);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

/// Builds a config reading `csv` from a temp dir and writing results there
fn config_in(dir: &TempDir, csv: &str) -> Config {
    let input = dir.path().join("urls.csv");
    std::fs::write(&input, csv).unwrap();

    let mut config = Config::default();
    config.input.path = input.to_str().unwrap().to_string();
    config.output.results_path = dir.path().join("results.txt").to_str().unwrap().to_string();
    config
}

#[tokio::test]
async fn test_run_pipeline_from_config() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "Needle here").await;
    mount_page(&server, "/b", "nothing").await;
    mount_page(&server, "/c", "NEEDLE again").await;

    let urls: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|p| format!("{}/{}", server.uri(), p))
        .collect();
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir, &csv_for(&urls));
    config.crawler.url_limit = 2;

    let summary = run_pipeline(&config, "needle").await.unwrap();

    assert_eq!(summary.urls_read, 2);
    assert_eq!(summary.matches, 1);
    let written = std::fs::read_to_string(&config.output.results_path).unwrap();
    assert_eq!(written, format!("{} has term\n", urls[0]));
}

#[tokio::test]
async fn test_run_pipeline_rejects_malformed_pattern_before_output() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir, "Rank,URL\n");
    config.search.regex = true;

    let result = run_pipeline(&config, "(unclosed").await;

    assert!(matches!(result, Err(SiftError::Pattern(_))));
    assert!(!std::path::Path::new(&config.output.results_path).exists());
}

#[tokio::test]
async fn test_run_pipeline_unopenable_output_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir, "Rank,URL\n");
    config.output.results_path = dir
        .path()
        .join("missing")
        .join("results.txt")
        .to_str()
        .unwrap()
        .to_string();

    let result = run_pipeline(&config, "hello").await;

    assert!(matches!(result, Err(SiftError::Output(_))));
}
