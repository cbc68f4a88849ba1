use rank_crawler::config::Config;
use rank_crawler::crawler::{Coordinator, PageRecord};
use rank_crawler::output::{
    format_records, write_records, ErrorEntry, ErrorKind, ErrorSink, OutputFormat,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Error sink collecting entries in memory
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<ErrorEntry>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<ErrorEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.entries().iter().filter(|e| e.kind == kind).count()
    }
}

impl ErrorSink for RecordingSink {
    fn record_error(&self, entry: &ErrorEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Creates a fast test configuration with the given max depth
pub fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.rate_limit_delay = 0; // No delay for testing
    config.crawler.request_timeout = 2000;
    config
}

/// An HTML page linking to every href given
pub fn page_with_links(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><head><title>Test</title></head><body>{}</body></html>", anchors)
}

/// Mounts an HTML page at `route`, expecting exactly `hits` requests
pub async fn mount_page(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .expect(hits)
        .mount(server)
        .await;
}

fn find<'a>(records: &'a [PageRecord], url: &str) -> &'a PageRecord {
    records
        .iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("no record for {}", url))
}

#[tokio::test]
async fn test_rank_scenario_same_domain_and_external() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // A different hostname for the same loopback interface
    let external_url = external_server.uri().replace("127.0.0.1", "localhost");

    mount_page(
        &mock_server,
        "/",
        page_with_links(&["/a", "/b", &format!("{}/ext", external_url)]),
        1,
    )
    .await;
    mount_page(&mock_server, "/a", page_with_links(&["/b", "/c"]), 1).await;
    mount_page(&mock_server, "/b", page_with_links(&[]), 1).await;
    mount_page(
        &external_server,
        "/ext",
        page_with_links(&[&format!("{}/x", base_url)]),
        1,
    )
    .await;
    // Depth 2, never fetched
    mount_page(&mock_server, "/c", page_with_links(&[]), 0).await;

    let sink = Arc::new(RecordingSink::default());
    let coordinator =
        Coordinator::new(&create_test_config(1), sink.clone()).expect("Failed to create coordinator");
    let records = coordinator.run(&format!("{}/", base_url)).await;

    assert_eq!(records.len(), 4, "records: {:?}", records);

    let root = find(&records, &format!("{}/", base_url));
    assert_eq!(root.depth, 0);
    assert!((root.rank - 2.0 / 3.0).abs() < 1e-12);

    // Each child is ranked from its own links
    let a = find(&records, &format!("{}/a", base_url));
    assert_eq!(a.depth, 1);
    assert_eq!(a.rank, 1.0);

    let b = find(&records, &format!("{}/b", base_url));
    assert_eq!(b.depth, 1);
    assert_eq!(b.rank, 0.0);

    let ext = find(&records, &format!("{}/ext", external_url));
    assert_eq!(ext.depth, 1);
    assert_eq!(ext.rank, 0.0);

    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn test_max_depth_zero_only_crawls_root() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        page_with_links(&["/one", "/two", "/three"]),
        1,
    )
    .await;
    for route in ["/one", "/two", "/three"] {
        mount_page(&mock_server, route, page_with_links(&[]), 0).await;
    }

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&create_test_config(0), sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/", base_url));
    assert_eq!(records[0].depth, 0);
    assert_eq!(records[0].rank, 1.0);
}

#[tokio::test]
async fn test_root_timeout_yields_header_only_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(page_with_links(&["/a"]), "text/html")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2);
    config.crawler.request_timeout = 200;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&config, sink.clone()).unwrap();
    let records = coordinator.run(&format!("{}/", mock_server.uri())).await;

    assert!(records.is_empty());
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ErrorKind::Timeout);
    assert!(entries[0].message.starts_with("Timeout fetching"));
    assert!(entries[0]
        .detail
        .starts_with(&format!("Request timeout for {}/", mock_server.uri())));
    assert!(entries[0].detail.contains("caused by:"));

    let dir = tempfile::TempDir::new().unwrap();
    let output = write_records(&records, &OutputFormat::csv(), dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(output).unwrap(), "url,depth,rank");
}

#[tokio::test]
async fn test_cycles_are_visited_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links(&["/a", "/b", "/"]), 1).await;
    mount_page(&mock_server, "/a", page_with_links(&["/", "/b", "/a"]), 1).await;
    mount_page(&mock_server, "/b", page_with_links(&["/a", "/"]), 1).await;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&create_test_config(5), sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    assert_eq!(records.len(), 3);
    let unique: HashSet<_> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(unique.len(), 3);
    assert_eq!(coordinator.context().visited_count(), 3);
}

#[tokio::test]
async fn test_siblings_keep_their_shallow_depth() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links(&["/a", "/b"]), 1).await;
    mount_page(&mock_server, "/a", page_with_links(&["/b"]), 1).await;
    mount_page(&mock_server, "/b", page_with_links(&[]), 1).await;

    let mut config = create_test_config(2);
    config.crawler.max_concurrency = 1;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&config, sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    assert_eq!(records.len(), 3);
    // `/b` is claimed alongside `/a`, before `/a` can reach it one level deeper
    assert_eq!(find(&records, &format!("{}/b", base_url)).depth, 1);
    assert_eq!(find(&records, &format!("{}/a", base_url)).depth, 1);
}

#[tokio::test]
async fn test_depth_bound_on_chain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links(&["/1"]), 1).await;
    mount_page(&mock_server, "/1", page_with_links(&["/2"]), 1).await;
    mount_page(&mock_server, "/2", page_with_links(&["/3"]), 1).await;
    mount_page(&mock_server, "/3", page_with_links(&["/4"]), 0).await;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&create_test_config(2), sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.depth <= 2));
    assert_eq!(find(&records, &format!("{}/2", base_url)).depth, 2);
    assert!(!coordinator
        .context()
        .is_visited(&format!("{}/3", base_url)));
}

#[tokio::test]
async fn test_failures_are_local_to_their_node() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        page_with_links(&["/missing", "/image.png", "/broken", "/ok"]),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", page_with_links(&["/missing"]), 1).await;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&create_test_config(3), sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    let urls: HashSet<_> = records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(records.len(), 2);
    assert!(urls.contains(&format!("{}/", base_url)));
    assert!(urls.contains(&format!("{}/ok", base_url)));

    // 404 and 500 are logged; the non-HTML response is a silent skip
    assert_eq!(sink.count(ErrorKind::FetchError), 2);
    assert_eq!(sink.entries().len(), 2);
    assert!(sink
        .entries()
        .iter()
        .any(|e| e.detail.contains("status: 404")));
}

#[tokio::test]
async fn test_all_children_joined_before_run_returns() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let routes: Vec<String> = (0..8).map(|i| format!("/child{}", i)).collect();
    let hrefs: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", page_with_links(&hrefs), 1).await;

    for route in &routes {
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(page_with_links(&[]), "text/html")
                    .set_delay(Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&create_test_config(1), sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    // More children than the concurrency cap, and every one finished
    assert_eq!(records.len(), 9);
    assert_eq!(records[0].url, format!("{}/", base_url));
    assert!(records[1..].iter().all(|r| r.depth == 1));
}

#[tokio::test]
async fn test_concurrency_cap_limits_running_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links(&["/s1", "/s2", "/s3"]), 1).await;
    for route in ["/s1", "/s2", "/s3"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(page_with_links(&[]), "text/html")
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(1);
    config.crawler.max_concurrency = 1;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&config, sink.clone()).unwrap();

    let start = Instant::now();
    let records = coordinator.run(&base_url).await;

    assert_eq!(records.len(), 4);
    // One fetch at a time: the three slow children run back to back
    assert!(start.elapsed() >= Duration::from_millis(450));
}

#[tokio::test]
async fn test_records_render_to_delimited_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", page_with_links(&["/a", "https://elsewhere.invalid/"]), 1)
        .await;
    mount_page(&mock_server, "/a", page_with_links(&[]), 0).await;

    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::new(&create_test_config(0), sink.clone()).unwrap();
    let records = coordinator.run(&base_url).await;

    let csv = format_records(&records, &OutputFormat::csv()).unwrap();
    assert_eq!(csv, format!("url,depth,rank\n{}/,0,0.5", base_url));

    let tsv = format_records(&records, &OutputFormat::parse("tsv").unwrap()).unwrap();
    assert_eq!(tsv, format!("url\tdepth\trank\n{}/\t0\t0.5", base_url));
}
