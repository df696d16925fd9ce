//! Integration tests for the cache warmer
//!
//! These tests use wiremock to create mock HTTP servers and run the
//! resolve → dispatch → aggregate cycle end-to-end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use warmupcache::config::{Config, UserAgentConfig};
use warmupcache::output::{ProgressSink, RunSummary};
use warmupcache::sitemap::resolve;
use warmupcache::warmer::{
    build_http_client, fetch_url, run_warmup, Coordinator, Dispatcher, ErrorKind, SitemapStatus,
};
use warmupcache::SitemapError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Builds a urlset document listing the given locations
fn urlset(locations: &[String]) -> String {
    let entries: String = locations
        .iter()
        .map(|loc| format!("  <url>\n    <loc>{}</loc>\n  </url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{}\">\n{}</urlset>",
        SITEMAP_NS, entries
    )
}

/// Creates a test configuration for the given sitemaps
fn create_test_config(sitemaps: Vec<String>, parallelism: usize) -> Config {
    let mut config = Config::default();
    config.warmup.sitemaps = sitemaps;
    config.warmup.parallelism = parallelism;
    config.warmup.timeout_secs = 5;
    config.warmup.progress = false;
    config
}

async fn mount_sitemap(server: &MockServer, sitemap_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(sitemap_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_returns_locations_in_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let locations: Vec<String> = (0..5).map(|i| format!("{}/page-{}", base_url, i)).collect();
    mount_sitemap(&mock_server, "/sitemap.xml", urlset(&locations)).await;

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let sitemap_url = format!("{}/sitemap.xml", base_url);

    let urls = resolve(&client, &sitemap_url, None).await.unwrap();
    assert_eq!(urls, locations);

    let limited = resolve(&client, &sitemap_url, Some(2)).await.unwrap();
    assert_eq!(limited, locations[..2].to_vec());
}

#[tokio::test]
async fn test_resolve_reports_http_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let result = resolve(&client, &format!("{}/sitemap.xml", mock_server.uri()), None).await;

    match result {
        Err(SitemapError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_rejects_malformed_xml() {
    let mock_server = MockServer::start().await;
    mount_sitemap(
        &mock_server,
        "/sitemap.xml",
        "<urlset><url><loc>oops</url>".to_string(),
    )
    .await;

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let result = resolve(&client, &format!("{}/sitemap.xml", mock_server.uri()), None).await;
    assert!(matches!(result, Err(SitemapError::Parse { .. })));
}

/// Returns a local URL on a port that was just released, so connections are refused
fn refused_sitemap_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/sitemap.xml", port)
}

#[tokio::test]
async fn test_unreachable_sitemap_is_skipped() {
    let sitemap_url = refused_sitemap_url();

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    match resolve(&client, &sitemap_url, None).await {
        Err(SitemapError::Unreachable { url, .. }) => assert_eq!(url, sitemap_url),
        other => panic!("expected unreachable error, got {:?}", other),
    }

    let config = create_test_config(vec![sitemap_url], 2);
    let report = Coordinator::new(config).unwrap().run().await;

    assert_eq!(report.skipped_count(), 1);
    assert!(matches!(
        report.sitemaps[0].status,
        SitemapStatus::Skipped { .. }
    ));
    assert_eq!(report.total_summary(), RunSummary::default());
}

#[tokio::test]
async fn test_fetch_sends_user_agent_and_counts_bytes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "TestWarmer/9.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(1234)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user_agent = UserAgentConfig {
        name: "TestWarmer".to_string(),
        version: "9.9".to_string(),
    };
    let client = build_http_client(&user_agent, Duration::from_secs(5)).unwrap();

    let outcome = fetch_url(&client, format!("{}/page", mock_server.uri())).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.byte_size, 1234);
}

#[tokio::test]
async fn test_fetch_classifies_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(1)).unwrap();

    let outcome = fetch_url(&client, format!("{}/slow", mock_server.uri())).await;
    assert_eq!(outcome.error, Some(ErrorKind::Timeout));
    assert_eq!(outcome.byte_size, 0);
}

#[tokio::test]
async fn test_dispatch_fetches_every_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let pool_sizes = [1, 3, 10];

    let mut urls = Vec::new();
    for i in 0..10 {
        let page_path = format!("/page-{}", i);
        // One hit per page for every pool size below; verified when the server drops
        Mock::given(method("GET"))
            .and(path(page_path.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("warm")
                    .set_delay(Duration::from_millis(20)),
            )
            .expect(pool_sizes.len() as u64)
            .mount(&mock_server)
            .await;
        urls.push(format!("{}{}", base_url, page_path));
    }

    struct CountingSink(AtomicUsize);
    impl ProgressSink for CountingSink {
        fn advance(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let sink = Arc::new(CountingSink(AtomicUsize::new(0)));

    for pool_size in pool_sizes {
        let client = client.clone();
        let mut summary = RunSummary::default();
        let delivered = Dispatcher::new(pool_size)
            .dispatch(
                urls.clone(),
                move |url| {
                    let client = client.clone();
                    async move { fetch_url(&client, url).await }
                },
                |outcome| {
                    sink.advance();
                    summary.record(&outcome);
                },
            )
            .await;

        assert_eq!(delivered, 10);
        assert_eq!(summary.count, 10);
        assert_eq!(summary.failure_count, 0);
        assert_eq!(summary.total_bytes, 40);
    }

    assert_eq!(sink.0.load(Ordering::SeqCst), 30);
}

#[tokio::test]
async fn test_full_warmup_with_one_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let locations = vec![
        format!("{}/a", base_url),
        format!("{}/b", base_url),
        format!("{}/c", base_url),
    ];
    mount_sitemap(&mock_server, "/sitemap.xml", urlset(&locations)).await;
    mount_page(&mock_server, "/a", 200, &"a".repeat(100)).await;
    mount_page(&mock_server, "/b", 500, "server error").await;
    mount_page(&mock_server, "/c", 200, &"c".repeat(300)).await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 2);
    let report = Coordinator::new(config).unwrap().run().await;

    assert_eq!(report.sitemaps.len(), 1);
    match &report.sitemaps[0].status {
        SitemapStatus::Warmed {
            urls,
            summary,
            failures,
            ..
        } => {
            assert_eq!(*urls, 3);
            assert_eq!(summary.count, 3);
            assert_eq!(summary.failure_count, 1);
            assert_eq!(summary.total_bytes, 400);
            assert!(summary.min_elapsed.is_some());
            assert!(summary.min_elapsed <= summary.max_elapsed);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].url, format!("{}/b", base_url));
            assert_eq!(failures[0].error, ErrorKind::HttpStatus(500));
        }
        other => panic!("expected warmed sitemap, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_namespace_fetches_no_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        "/sitemap.xml",
        format!("<urlset><url><loc>{}/a</loc></url></urlset>", base_url),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 1);
    let report = Coordinator::new(config).unwrap().run().await;

    assert_eq!(report.skipped_count(), 1);
    match &report.sitemaps[0].status {
        SitemapStatus::Skipped { reason } => assert!(reason.contains("namespace")),
        other => panic!("expected skipped sitemap, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_sitemap_does_not_stop_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_sitemap(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/home", base_url)]),
    )
    .await;
    mount_page(&mock_server, "/home", 200, "home").await;

    let config = create_test_config(
        vec![
            format!("{}/missing.xml", base_url),
            format!("{}/sitemap.xml", base_url),
        ],
        4,
    );
    let report = Coordinator::new(config).unwrap().run().await;

    assert_eq!(report.sitemaps.len(), 2);
    assert!(report.sitemaps[0].is_skipped());
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.total_summary().count, 1);
    assert_eq!(report.total_summary().total_bytes, 4);
}

#[tokio::test]
async fn test_dry_run_fetches_no_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let locations: Vec<String> = (0..4).map(|i| format!("{}/p{}", base_url, i)).collect();
    mount_sitemap(&mock_server, "/sitemap.xml", urlset(&locations)).await;
    Mock::given(method("GET"))
        .and(path("/p0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 2);
    config.warmup.dry_run = true;
    config.warmup.limit = Some(3);
    let report = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(
        report.sitemaps[0].status,
        SitemapStatus::DryRun { urls: 3 }
    ));
    assert_eq!(report.total_summary(), RunSummary::default());
}

#[tokio::test]
async fn test_run_warmup_writes_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/index", base_url)]),
    )
    .await;
    mount_page(&mock_server, "/index", 200, "index").await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("warmup.md");

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 1);
    config.output.report_path = Some(report_path.display().to_string());

    let report = run_warmup(config).await.unwrap();
    assert_eq!(report.skipped_count(), 0);

    let markdown = std::fs::read_to_string(&report_path).unwrap();
    assert!(markdown.contains("# Cache Warm-up Report"));
    assert!(markdown.contains("| Requests | 1 |"));
}
