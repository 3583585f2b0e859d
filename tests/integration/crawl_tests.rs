//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.
//!
//! Links to `localhost` count as external while the crawl starts at
//! `127.0.0.1`, so a single mock server can play both roles.

use std::sync::{Arc, Mutex};
use sumi_linkcheck::config::{Config, CrawlerConfig, HttpConfig};
use sumi_linkcheck::crawler::{run_crawl, Coordinator};
use sumi_linkcheck::Reporter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Reporter that keeps everything it is given
#[derive(Default)]
struct RecordingReporter {
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<(String, String, String)>>,
    errors: Mutex<Vec<(String, String, String)>>,
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, href: &str, page: &str, reason: &str) {
        self.warnings
            .lock()
            .unwrap()
            .push((href.to_string(), page.to_string(), reason.to_string()));
    }

    fn error(&self, page: &str, href: &str, reason: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((page.to_string(), href.to_string(), reason.to_string()));
    }

    fn debug(&self, _message: &str) {}
}

/// Creates a test configuration with short timeouts
fn create_test_config(max_depth: u32, max_pages: u64, internal: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_internal: internal,
            max_concurrent_external: 4,
            max_crawling_depth: max_depth,
            max_pages,
            skip_self_links: false,
        },
        http: HttpConfig {
            fetch_timeout_ms: 2000,
            validation_timeout_ms: 2000,
            user_agent: "TestBot/1.0".to_string(),
        },
    }
}

/// Mounts an HTML page at `route`, expected to be fetched `times` times
async fn mount_page(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body>{}</body></html>", body))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Port of the mock server, for building `localhost` links
fn port(server: &MockServer) -> u16 {
    server.address().port()
}

async fn crawl(server: &MockServer, config: Config) -> (sumi_linkcheck::CrawlSummary, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let summary = run_crawl(config, &format!("{}/", server.uri()), reporter.clone())
        .await
        .expect("Crawl failed");
    (summary, reporter)
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="{}/page1">Page 1</a> <a href="/page2">Page 2</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&server, "/page1", "Content 1", 1).await;
    mount_page(&server, "/page2", "Content 2", 1).await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 3);
    assert_eq!(summary.stats.external_checked, 0);
    assert!(!summary.page_cap_reached);
    assert!(reporter.errors.lock().unwrap().is_empty());
    assert!(reporter.warnings.lock().unwrap().is_empty());

    let infos = reporter.infos.lock().unwrap();
    assert_eq!(infos[0], format!("Starting crawling at '{}/'.", base_url));
    assert!(infos.contains(&"Pages crawled: 3".to_string()));
}

#[tokio::test]
async fn test_pages_are_fetched_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a><a href="/a#top">A again</a>"#, 1).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a><a href="/">Home</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/a">A</a><a href="./b">self</a>"#, 1).await;

    let (summary, _) = crawl(&server, create_test_config(5, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 3);
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/level1">1</a>"#, 1).await;
    mount_page(&server, "/level1", r#"<a href="/level2">2</a>"#, 1).await;
    mount_page(&server, "/level2", "too deep", 0).await;

    let (summary, _) = crawl(&server, create_test_config(1, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 2);
    assert_eq!(summary.stats.depth_dropped, 1);
    assert!(!summary.page_cap_reached);
}

#[tokio::test]
async fn test_depth_zero_crawls_origin_only() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/next">next</a>"#, 1).await;
    mount_page(&server, "/next", "", 0).await;

    let (summary, _) = crawl(&server, create_test_config(0, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 1);
}

#[tokio::test]
async fn test_page_cap() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", "", 1).await;
    mount_page(&server, "/b", "", 0).await;
    mount_page(&server, "/c", "", 0).await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 2, 10)).await;

    assert_eq!(summary.stats.pages_crawled, 2);
    assert!(summary.page_cap_reached);
    assert!(reporter
        .infos
        .lock()
        .unwrap()
        .iter()
        .any(|line| line.starts_with("Reached the maximum of 2 pages")));
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#, 1).await;
    mount_page(&server, "/a", r#"<a href="/a1">A1</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/b1">B1</a>"#, 1).await;
    mount_page(&server, "/a1", "", 1).await;
    mount_page(&server, "/b1", "", 1).await;

    let config = create_test_config(5, 100, 1);
    let reporter = Arc::new(RecordingReporter::default());
    let origin = url::Url::parse(&format!("{}/", server.uri())).unwrap();
    let mut coordinator = Coordinator::new(config, origin, reporter).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");
    assert_eq!(summary.stats.pages_crawled, 5);

    let requests = server.received_requests().await.expect("Request recording disabled");
    let order: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(order, vec!["/", "/a", "/b", "/a1", "/b1"]);
}

#[tokio::test]
async fn test_broken_external_link_is_warned() {
    let server = MockServer::start().await;
    let external = format!("http://localhost:{}", port(&server));

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="{0}/missing">broken</a><a href="{0}/fine">fine</a><a href="{0}/blocked">blocked</a>"#,
            external
        ),
        1,
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/fine"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(999))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 1);
    assert_eq!(summary.stats.external_checked, 3);
    assert_eq!(summary.stats.broken_links, 1);

    let warnings = reporter.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].0, format!("{}/missing", external));
    assert_eq!(warnings[0].1, format!("{}/", server.uri()));
    assert_eq!(warnings[0].2, "404: Not Found");
}

#[tokio::test]
async fn test_external_links_checked_once_across_pages() {
    let server = MockServer::start().await;
    let external = format!("http://localhost:{}/shared", port(&server));

    mount_page(
        &server,
        "/",
        &format!(r#"<a href="{0}">x</a><a href="/other">other</a><a href="{0}">x</a>"#, external),
        1,
    )
    .await;
    mount_page(&server, "/other", &format!(r#"<a href="{}">x</a>"#, external), 1).await;
    Mock::given(method("HEAD"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 100, 5)).await;

    assert_eq!(summary.stats.external_checked, 1);
    assert_eq!(summary.stats.broken_links, 1);
    assert_eq!(reporter.warnings.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_page_is_reported_with_parent() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/gone">gone</a><a href="/fine">fine</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/fine", "", 1).await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 2);
    assert_eq!(summary.stats.pages_failed, 1);

    let errors = reporter.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, format!("{}/", server.uri()));
    assert_eq!(errors[0].1, format!("{}/gone", server.uri()));
    assert_eq!(errors[0].2, "404: Not Found");
}

#[tokio::test]
async fn test_unreachable_origin_finishes_with_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let reporter = Arc::new(RecordingReporter::default());
    let summary = run_crawl(create_test_config(5, 100, 5), &format!("{}/", uri), reporter.clone())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.stats.pages_crawled, 0);
    assert_eq!(summary.stats.pages_failed, 1);
    assert_eq!(reporter.errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ignored_hrefs_are_not_followed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r##"<a href="mailto:me@example.com">m</a><a href="javascript:void(0)">j</a><a href="#top">t</a><a href="">e</a>"##,
        1,
    )
    .await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 100, 5)).await;

    assert_eq!(summary.stats.pages_crawled, 1);
    assert_eq!(summary.stats.external_checked, 0);
    assert!(reporter.errors.lock().unwrap().is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_external_links_beyond_ceiling_are_all_checked() {
    let server = MockServer::start().await;
    let external = format!("http://localhost:{}", port(&server));

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="{}/ext{}">{}</a>"#, external, i, i))
        .collect();
    mount_page(&server, "/", &links, 1).await;

    for i in 1..=5 {
        let status = if i == 4 { 404 } else { 200 };
        Mock::given(method("HEAD"))
            .and(path(format!("/ext{}", i)))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(5, 100, 5);
    config.crawler.max_concurrent_external = 2;
    let (summary, reporter) = crawl(&server, config).await;

    assert_eq!(summary.stats.external_checked, 5);
    assert_eq!(summary.stats.broken_links, 1);

    let warnings = reporter.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].0, format!("{}/ext4", external));
}

#[tokio::test]
async fn test_page_shared_by_parents_in_one_batch_is_fetched_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#, 1).await;
    mount_page(&server, "/a", r#"<a href="/c">C</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/c">C</a>"#, 1).await;
    mount_page(&server, "/c", "", 1).await;

    let (summary, reporter) = crawl(&server, create_test_config(5, 100, 2)).await;

    assert_eq!(summary.stats.pages_crawled, 4);
    assert!(reporter.errors.lock().unwrap().is_empty());
}
