//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, extract, emit, descend cycle end-to-end.

use link_ripple::config::Config;
use link_ripple::crawler::Crawler;
use link_ripple::output::{CrawlStats, LineWriter};
use link_ripple::Link;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given depth limit
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

/// Mounts an HTML page at `route`, expecting it to be requested `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

async fn run(config: Config, seed: &str) -> (Vec<Link>, CrawlStats) {
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let mut links: Vec<Link> = Vec::new();
    let stats = crawler
        .crawl(seed, 0, &mut links)
        .await
        .expect("Crawl should not fail");
    (links, stats)
}

fn summary(links: &[Link]) -> Vec<(String, u32)> {
    links
        .iter()
        .map(|l| (l.text().to_string(), l.depth()))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_depth_first_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{0}/page1">Page 1</a>
            <a href="{0}/page2">Page 2</a>
            </body></html>"#,
            base_url
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/page1",
        format!(r#"<p><a href="{}/page3">Page 3</a></p>"#, base_url),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/page2",
        "<html><body>Content 2</body></html>".to_string(),
        1,
    )
    .await;

    // Found at depth 1 with a limit of 2: emitted but never fetched
    mount_page(&mock_server, "/page3", String::new(), 0).await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", base_url)).await;

    assert_eq!(
        summary(&links),
        vec![
            ("Page 1".to_string(), 0),
            ("Page 3".to_string(), 1),
            ("Page 2".to_string(), 0),
        ]
    );
    assert_eq!(links[1].url(), format!("{}/page3", base_url));
    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(stats.links_emitted, 3);
}

#[tokio::test]
async fn test_failed_child_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{0}/missing">Missing</a><a href="{0}/ok">Ok</a>"#,
            base_url
        ),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/ok",
        format!(r#"<a href="{}/leaf">Leaf</a>"#, base_url),
        1,
    )
    .await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", base_url)).await;

    assert_eq!(
        summary(&links),
        vec![
            ("Missing".to_string(), 0),
            ("Ok".to_string(), 0),
            ("Leaf".to_string(), 1),
        ]
    );
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_seed_status_failure_emits_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", mock_server.uri())).await;

    assert!(links.is_empty());
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.pages_fetched, 0);
}

#[tokio::test]
async fn test_seed_transport_failure_emits_nothing() {
    // Nothing listens on port 1
    let (links, stats) = run(create_test_config(2), "http://127.0.0.1:1/").await;

    assert!(links.is_empty());
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_relative_link_emitted_then_fails_to_fetch() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/x">Home</a>"#.to_string(), 1).await;

    // Relative hrefs are not resolved, so "/x" is never requested from the server
    mount_page(&mock_server, "/x", String::new(), 0).await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", mock_server.uri())).await;

    assert_eq!(links, vec![Link::new("/x", "Home", 0)]);
    assert_eq!(links[0].to_string(), "Home (0) - /x");
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_unusable_links_are_filtered() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="javascript:void(0)">Click</a>
               <a href="{0}/empty"></a>
               <a href="">No url</a>
               <a>No attributes</a>
               <a href="{0}/good"> Good </a>"#,
            base_url
        ),
        1,
    )
    .await;

    mount_page(&mock_server, "/empty", String::new(), 0).await;
    mount_page(&mock_server, "/good", String::new(), 1).await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", base_url)).await;

    assert_eq!(links, vec![Link::new(&format!("{}/good", base_url), "Good", 0)]);
    // The attribute-less <a> never opened, so its </a> is unmatched
    assert_eq!(stats.malformed_anchors, 1);
}

#[tokio::test]
async fn test_unmatched_close_does_not_abort_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<p>stray</a></p><a href="{0}/after">After</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/after", String::new(), 1).await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", base_url)).await;

    assert_eq!(summary(&links), vec![("After".to_string(), 0)]);
    assert_eq!(stats.malformed_anchors, 1);
}

#[tokio::test]
async fn test_depth_one_never_descends() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{}/child">Child</a>"#, base_url),
        1,
    )
    .await;
    mount_page(&mock_server, "/child", String::new(), 0).await;

    let (links, stats) = run(create_test_config(1), &format!("{}/", base_url)).await;

    assert_eq!(summary(&links), vec![("Child".to_string(), 0)]);
    assert_eq!(stats.pages_fetched, 1);
}

#[tokio::test]
async fn test_depth_bound_over_chain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for (route, next, times) in [("/", "/l1", 1), ("/l1", "/l2", 1), ("/l2", "/l3", 1)] {
        mount_page(
            &mock_server,
            route,
            format!(r#"<a href="{}{}">{}</a>"#, base_url, next, next),
            times,
        )
        .await;
    }
    mount_page(&mock_server, "/l3", String::new(), 0).await;

    let (links, _) = run(create_test_config(3), &format!("{}/", base_url)).await;

    assert_eq!(
        summary(&links),
        vec![
            ("/l1".to_string(), 0),
            ("/l2".to_string(), 1),
            ("/l3".to_string(), 2),
        ]
    );
    assert!(links.iter().all(|l| l.depth() < 3));
}

#[tokio::test]
async fn test_repeated_urls_are_revisited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The page links to itself; there is no cross-crawl deduplication
    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{}/">Self</a>"#, base_url),
        2,
    )
    .await;

    let (links, stats) = run(create_test_config(2), &format!("{}/", base_url)).await;

    assert_eq!(
        summary(&links),
        vec![("Self".to_string(), 0), ("Self".to_string(), 1)]
    );
    assert_eq!(stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_line_output_format() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{}/a">A</a>"#, base_url),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        r#"<a href="https://example.com/b">B</a>"#.to_string(),
        1,
    )
    .await;

    let crawler = Crawler::new(create_test_config(2)).expect("Failed to create crawler");
    let mut sink = LineWriter::new(Vec::new());
    crawler
        .crawl(&format!("{}/", base_url), 0, &mut sink)
        .await
        .expect("Crawl should not fail");

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(
        output,
        format!("A (0) - {}/a\n\tB (1) - https://example.com/b\n", base_url)
    );
}
