//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small article graph and a batch sink,
//! and exercise the full crawl-then-upload cycle end-to-end.

use article_harvester::config::{Config, CrawlerConfig, ExtractConfig, SinkConfig, UserAgentConfig};
use article_harvester::crawler::Coordinator;
use article_harvester::output::{UploadAck, UploadError, UploadOutcome, API_KEY_HEADER};
use article_harvester::{harvest, HarvestError};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SINK_PATH: &str = "/api/batch-pages";
const API_KEY: &str = "test-key";

/// Creates a test configuration crawling from `/wiki/A` on the mock server
fn create_test_config(base_url: &str, max_pages: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: format!("{}/wiki/A", base_url),
            max_pages,
            delay_ms: 0,
            timeout_ms: 2000,
        },
        extract: ExtractConfig::default(),
        user_agent: UserAgentConfig::default(),
        sink: SinkConfig {
            endpoint: format!("{}{}", base_url, SINK_PATH),
            api_key: Some(API_KEY.to_string()),
            api_key_env: "CRAWLER_API_KEY".to_string(),
        },
    }
}

/// Builds an article page linking to the given paths
fn article(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a> "#, href, href))
        .collect();

    format!(
        r#"<html><head><title>{title} - Wiki</title></head><body>
        <h1>{title}</h1>
        <div class="mw-parser-output">
            <p>{title} is an article.</p>
            <p>{anchors}</p>
        </div>
        </body></html>"#,
        title = title,
        anchors = anchors
    )
}

/// Mounts an HTML page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, page_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts the batch sink answering with `response`
async fn mount_sink(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(SINK_PATH))
        .and(header(API_KEY_HEADER, API_KEY))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn visited_paths(visited: &[url::Url]) -> Vec<String> {
    visited.iter().map(|url| url.path().to_string()).collect()
}

#[tokio::test]
async fn test_page_cap_stops_breadth_first_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B", "/wiki/C"]), 1).await;
    mount_page(&mock_server, "/wiki/B", article("B", &["/wiki/D"]), 1).await;
    mount_page(&mock_server, "/wiki/C", article("C", &[]), 1).await;
    mount_page(&mock_server, "/wiki/D", article("D", &[]), 0).await;

    let config = create_test_config(&mock_server.uri(), 3);
    let mut coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let report = coordinator.run().await;

    assert_eq!(
        visited_paths(&report.visited),
        vec!["/wiki/A", "/wiki/B", "/wiki/C"]
    );
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.pages_visited, 3);
}

#[tokio::test]
async fn test_level_order_traversal_without_refetching() {
    let mock_server = MockServer::start().await;

    // A -> B, C; B -> D, E; C -> F, A; D -> B (cycles back)
    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B", "/wiki/C"]), 1).await;
    mount_page(&mock_server, "/wiki/B", article("B", &["/wiki/D", "/wiki/E"]), 1).await;
    mount_page(&mock_server, "/wiki/C", article("C", &["/wiki/F", "/wiki/A"]), 1).await;
    mount_page(&mock_server, "/wiki/D", article("D", &["/wiki/B"]), 1).await;
    mount_page(&mock_server, "/wiki/E", article("E", &[]), 1).await;
    mount_page(&mock_server, "/wiki/F", article("F", &[]), 1).await;

    let config = create_test_config(&mock_server.uri(), 50);
    let mut coordinator = Coordinator::new(&config).unwrap();
    let report = coordinator.run().await;

    assert_eq!(
        visited_paths(&report.visited),
        vec!["/wiki/A", "/wiki/B", "/wiki/C", "/wiki/D", "/wiki/E", "/wiki/F"]
    );
    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C", "D", "E", "F"]);
}

#[tokio::test]
async fn test_fragment_variants_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/wiki/A",
        article("A", &["/wiki/B#History", "/wiki/B", "/wiki/B#See_also", "/wiki/A#top"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/wiki/B", article("B", &[]), 1).await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(visited_paths(&report.visited), vec!["/wiki/A", "/wiki/B"]);
    assert_eq!(report.records[1].url, format!("{}/wiki/B", mock_server.uri()));
    assert_eq!(report.stats.links_discovered, 4);
    assert_eq!(report.stats.links_enqueued, 1);
}

#[tokio::test]
async fn test_timed_out_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B", "/wiki/C"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/wiki/B"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article("B", &["/wiki/D"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/wiki/C", article("C", &[]), 1).await;
    mount_page(&mock_server, "/wiki/D", article("D", &[]), 0).await;

    let mut config = create_test_config(&mock_server.uri(), 10);
    config.crawler.timeout_ms = 300;

    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(
        visited_paths(&report.visited),
        vec!["/wiki/A", "/wiki/B", "/wiki/C"]
    );
    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);
    assert_eq!(report.stats.fetch_timeouts, 1);
}

#[tokio::test]
async fn test_bad_status_is_not_fatal() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B", "/wiki/C"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/wiki/B"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/wiki/C", article("C", &[]), 1).await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.visited.len(), 3);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.fetch_bad_status, 1);
}

#[tokio::test]
async fn test_identifying_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/A"))
        .and(header("user-agent", "OggoleCrawler/1.0 (Educational purposes)"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article("A", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_politeness_delay_between_fetches() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B"]), 1).await;
    mount_page(&mock_server, "/wiki/B", article("B", &["/wiki/C"]), 1).await;
    mount_page(&mock_server, "/wiki/C", article("C", &[]), 1).await;

    let mut config = create_test_config(&mock_server.uri(), 10);
    config.crawler.delay_ms = 200;

    let start = Instant::now();
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.visited.len(), 3);
    // Two pauses: after A and after B; none after the last page
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_harvest_uploads_batch_once() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B"]), 1).await;
    mount_page(&mock_server, "/wiki/B", article("B", &[]), 1).await;
    mount_sink(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"inserted": 7, "total": 10})),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = harvest(config).await.expect("Harvest failed");

    assert!(report.is_success());
    assert_eq!(
        report.upload.unwrap(),
        UploadOutcome::Accepted(UploadAck {
            inserted: 7,
            total: 10
        })
    );

    // Check the delivered payload
    let requests = mock_server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|request| request.url.path() == SINK_PATH)
        .expect("No upload request received");
    let payload: serde_json::Value = serde_json::from_slice(&upload.body).unwrap();
    let pages = payload["pages"].as_array().unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["title"], "A");
    assert_eq!(pages[0]["url"], format!("{}/wiki/A", mock_server.uri()));
    assert_eq!(pages[0]["language"], "en");
    assert!(pages[0]["content"].as_str().unwrap().starts_with("A is an article."));
}

#[tokio::test]
async fn test_upload_skipped_when_nothing_gathered() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/wiki/A",
        r#"<html><body><h1>A</h1><div class="mw-parser-output"></div></body></html>"#
            .to_string(),
        1,
    )
    .await;
    mount_sink(&mock_server, ResponseTemplate::new(200), 0).await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = harvest(config).await.unwrap();

    assert!(report.crawl.records.is_empty());
    assert_eq!(report.upload.unwrap(), UploadOutcome::Skipped);
}

#[tokio::test]
async fn test_upload_bad_status_keeps_records() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &[]), 1).await;
    mount_sink(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("database unavailable"),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = harvest(config).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.crawl.records.len(), 1);
    match report.upload {
        Err(UploadError::BadStatus { status_code, body }) => {
            assert_eq!(status_code, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("Expected BadStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upload_malformed_acknowledgement() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &[]), 1).await;
    mount_sink(&mock_server, ResponseTemplate::new(200).set_body_string("ok"), 1).await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = harvest(config).await.unwrap();

    assert!(matches!(
        report.upload,
        Err(UploadError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_missing_credential_refuses_to_run() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &[]), 0).await;
    mount_sink(&mock_server, ResponseTemplate::new(200), 0).await;

    let mut config = create_test_config(&mock_server.uri(), 10);
    config.sink.api_key = None;
    config.sink.api_key_env = "ARTICLE_HARVESTER_TEST_UNSET_KEY".to_string();

    let result = harvest(config).await;

    assert!(matches!(
        result,
        Err(HarvestError::MissingCredential { .. })
    ));
}

#[tokio::test]
async fn test_upload_deadline_exceeded() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &[]), 1).await;
    mount_sink(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"inserted": 1, "total": 1}))
            .set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), 10);
    config.crawler.timeout_ms = 300;

    let report = harvest(config).await.unwrap();

    assert_eq!(report.crawl.records.len(), 1);
    match report.upload {
        Err(UploadError::Timeout(after)) => assert_eq!(after, Duration::from_millis(300)),
        other => panic!("Expected Timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_sink_is_network_error() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &[]), 1).await;

    let mut config = create_test_config(&mock_server.uri(), 10);
    config.sink.endpoint = format!("http://127.0.0.1:9{}", SINK_PATH);

    let report = harvest(config).await.unwrap();

    assert_eq!(report.crawl.records.len(), 1);
    assert!(matches!(report.upload, Err(UploadError::Network(_))));
}

#[tokio::test]
async fn test_upload_bad_status_with_empty_body() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/wiki/A", article("A", &[]), 1).await;
    mount_sink(&mock_server, ResponseTemplate::new(503), 1).await;

    let config = create_test_config(&mock_server.uri(), 10);
    let report = harvest(config).await.unwrap();

    match report.upload {
        Err(UploadError::BadStatus { status_code, body }) => {
            assert_eq!(status_code, 503);
            assert!(body.is_empty());
        }
        other => panic!("Expected BadStatus, got {:?}", other),
    }
}
