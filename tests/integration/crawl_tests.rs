//! Integration tests for the tracer
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full trace cycle end-to-end, including snapshot and resume.

use sitetrace::config::{Config, HttpConfig, Overrides, TraceSettings};
use sitetrace::crawler::{
    build_http_client, fetch_url, resume_trace, run_trace, FetchOutcome,
};
use sitetrace::state::{Snapshot, StopSignal};
use sitetrace::{SnapshotError, TraceError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `body` as HTML at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Fails the test if `route` is ever requested
async fn mount_never_requested(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(0)
        .mount(server)
        .await;
}

/// Paths the mock server has been asked for, in order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

/// Overrides pointing the snapshot into `dir`
fn snapshot_overrides(dir: &Path) -> Overrides {
    Overrides {
        snapshot: Some(dir.join("trace.dump")),
        ..Overrides::default()
    }
}

/// Creates settings writing into `dir`
fn create_test_settings(root: &str, dir: &Path, max_depth: u32) -> TraceSettings {
    let overrides = Overrides {
        max_depth: Some(max_depth),
        output: Some(dir.join("links.txt")),
        snapshot: Some(dir.join("trace.dump")),
        ..Overrides::default()
    };
    TraceSettings::fresh(root, &Config::default(), &overrides).expect("valid settings")
}

fn read_lines(path: PathBuf) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("output file")
        .lines()
        .map(String::from)
        .collect()
}

/// Mock site:
///
/// /        -> /page1, /page2, external, query
/// /page1   -> /page3, /page2
/// /page2   -> /missing
/// /page3   -> (nothing)
/// /missing -> 404
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="page2">Page 2</a>
            <a href="https://elsewhere.example.org/">External</a>
            <a href="/search?q=rust">Search</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/page1",
        r#"<html><body><a href="/page3">Page 3</a><a href="/page2">Page 2</a></body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/page2",
        r#"<html><body><a href="/missing">Missing</a></body></html>"#,
    )
    .await;
    mount_page(server, "/page3", "<html><body>Leaf</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_trace_writes_hierarchy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;
    mount_never_requested(&mock_server, "/search").await;

    let dir = TempDir::new().unwrap();
    let settings = create_test_settings(&base_url, dir.path(), 0);

    let outcome = run_trace(settings, &HttpConfig::default(), None, &StopSignal::new())
        .await
        .expect("Trace failed");

    assert!(!outcome.is_interrupted());
    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![
            format!("{}/", base_url),
            format!("  {}/page1", base_url),
            format!("  {}/page2", base_url),
            format!("    {}/page3", base_url),
            format!("    {}/missing", base_url),
        ]
    );

    let stats = outcome.statistics();
    assert_eq!(stats.pages_fetched, 4);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.links_discovered, 4);

    // Only interrupted traces write a snapshot
    assert!(!dir.path().join("trace.dump").exists());
}

#[tokio::test]
async fn test_every_line_is_inside_root_and_unique() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let settings = create_test_settings(&base_url, dir.path(), 0);
    run_trace(settings, &HttpConfig::default(), None, &StopSignal::new())
        .await
        .expect("Trace failed");

    let lines = read_lines(dir.path().join("links.txt"));
    let urls: HashSet<&str> = lines.iter().map(|line| line.trim_start()).collect();

    assert_eq!(urls.len(), lines.len());
    assert!(urls.iter().all(|url| url.starts_with(&base_url)));
}

#[tokio::test]
async fn test_max_depth_one_never_fetches_grandchildren() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/child1">1</a><a href="/child2">2</a>"#,
    )
    .await;
    mount_never_requested(&mock_server, "/child1").await;
    mount_never_requested(&mock_server, "/child2").await;

    let dir = TempDir::new().unwrap();
    let settings = create_test_settings(&base_url, dir.path(), 1);
    let outcome = run_trace(settings, &HttpConfig::default(), None, &StopSignal::new())
        .await
        .expect("Trace failed");

    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![
            format!("{}/", base_url),
            format!("  {}/child1", base_url),
            format!("  {}/child2", base_url),
        ]
    );
    assert_eq!(outcome.statistics().depth_limited, 2);
}

#[tokio::test]
async fn test_dynamic_urls_followed_when_enabled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/", r#"<a href="/search?q=rust">Search</a>"#).await;
    mount_page(&mock_server, "/search", "<html></html>").await;

    let dir = TempDir::new().unwrap();
    let mut settings = create_test_settings(&base_url, dir.path(), 0);
    settings.dynamic_urls = true;

    run_trace(settings, &HttpConfig::default(), None, &StopSignal::new())
        .await
        .expect("Trace failed");

    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![
            format!("{}/", base_url),
            format!("  {}/search?q=rust", base_url),
        ]
    );
}

#[tokio::test]
async fn test_fetch_reports_declared_charset() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<a href=\"/caf\xe9\">cafe</a>".to_vec(),
            "text/html; charset=iso-8859-1",
        ))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&HttpConfig::default()).unwrap();
    let outcome = fetch_url(&client, &format!("{}/latin", mock_server.uri())).await;

    match outcome {
        FetchOutcome::Fetched { encoding, body, .. } => {
            assert_eq!(encoding, "iso-8859-1");
            assert!(body.contains("/café"));
        }
        other => panic!("expected a fetched page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_defaults_to_utf8() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<html></html>").await;

    let client = build_http_client(&HttpConfig::default()).unwrap();
    let outcome = fetch_url(&client, &format!("{}/", mock_server.uri())).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Fetched { ref encoding, status_code: 200, .. } if encoding == "utf-8"
    ));
}

#[tokio::test]
async fn test_http_error_is_fetch_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&HttpConfig::default()).unwrap();
    let outcome = fetch_url(&client, &format!("{}/boom", mock_server.uri())).await;

    assert_eq!(
        outcome,
        FetchOutcome::FetchFailed {
            reason: "HTTP 500".to_string()
        }
    );
}

#[tokio::test]
async fn test_interrupt_writes_snapshot_and_resume_completes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("trace.dump");

    // Interrupted before the first expansion
    let stop = StopSignal::new();
    stop.request_stop();
    let settings = create_test_settings(&base_url, dir.path(), 0);
    let outcome = run_trace(settings, &HttpConfig::default(), None, &stop)
        .await
        .expect("Trace failed");

    assert!(outcome.is_interrupted());
    assert_eq!(outcome.statistics().pending, 1);
    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![format!("{}/", base_url)]
    );

    // Resume from the snapshot
    let snapshot = Snapshot::load(&snapshot_path).expect("snapshot written");
    assert_eq!(snapshot.state.root_url, format!("{}/", base_url));

    let outcome = resume_trace(
        &Config::default(),
        &snapshot_overrides(dir.path()),
        Some(base_url.as_str()),
        &StopSignal::new(),
    )
    .await
    .expect("Resume failed");

    assert!(!outcome.is_interrupted());
    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![
            format!("{}/", base_url),
            format!("  {}/page1", base_url),
            format!("  {}/page2", base_url),
            format!("    {}/page3", base_url),
            format!("    {}/missing", base_url),
        ]
    );
}

#[tokio::test]
async fn test_resume_without_snapshot_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let result = resume_trace(
        &Config::default(),
        &snapshot_overrides(dir.path()),
        Some(base_url.as_str()),
        &StopSignal::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(TraceError::Snapshot(SnapshotError::Missing(_)))
    ));
    assert!(requested_paths(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_resume_from_corrupted_snapshot_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("trace.dump"), "{ not json").unwrap();

    let result = resume_trace(
        &Config::default(),
        &snapshot_overrides(dir.path()),
        Some(base_url.as_str()),
        &StopSignal::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(TraceError::Snapshot(SnapshotError::Malformed(_)))
    ));
    assert!(requested_paths(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_resume_with_different_root_is_rejected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let stop = StopSignal::new();
    stop.request_stop();
    let settings = create_test_settings(&base_url, dir.path(), 0);
    run_trace(settings, &HttpConfig::default(), None, &stop)
        .await
        .expect("Trace failed");

    let result = resume_trace(
        &Config::default(),
        &snapshot_overrides(dir.path()),
        Some("http://some-other-site.example/"),
        &StopSignal::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(TraceError::Snapshot(SnapshotError::RootMismatch { .. }))
    ));
    assert!(requested_paths(&mock_server).await.is_empty());
    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![format!("{}/", base_url)]
    );
}

#[tokio::test]
async fn test_page_root_is_fetched_as_given() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/index.html",
        r#"<a href="/about">About</a><a href="news.html">News</a><a href="index.html">Home</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about", "<html></html>").await;
    mount_page(&mock_server, "/news.html", "<html></html>").await;
    mount_never_requested(&mock_server, "/index.html/").await;

    let dir = TempDir::new().unwrap();
    let root = format!("{}/index.html", base_url);
    let settings = create_test_settings(&root, dir.path(), 0);

    let outcome = run_trace(settings, &HttpConfig::default(), None, &StopSignal::new())
        .await
        .expect("Trace failed");

    assert_eq!(
        read_lines(dir.path().join("links.txt")),
        vec![
            format!("{}/index.html", base_url),
            format!("  {}/about", base_url),
            format!("  {}/news.html", base_url),
        ]
    );
    assert_eq!(
        requested_paths(&mock_server).await,
        vec!["/index.html", "/about", "/news.html"]
    );
    assert_eq!(outcome.statistics().fetch_failures, 0);
}
