//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small route-listing site and run the
//! full crawl and export cycle against it.

use std::fs;
use tempfile::TempDir;
use transit_mapper::config::Config;
use transit_mapper::crawler::run_crawl;
use transit_mapper::output::{export_tables, ERRORS_FILE, ROUTES_FILE, STOPS_FILE};
use transit_mapper::{MapperError, RouteId, StopId};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server's route listing
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.crawler.root_url = format!("{}/m/routes/", base_url);
    config.crawler.max_concurrent_pages_open = 4;
    config.crawler.request_timeout = 5;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_root(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/m/routes/"))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn mount_route(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/m/"))
        .and(query_param("q", route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn route(s: &str) -> RouteId {
    RouteId::parse(s).unwrap()
}

fn stop(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

#[tokio::test]
async fn test_full_crawl_routes_and_stops() {
    let mock_server = MockServer::start().await;

    mount_root(
        &mock_server,
        r#"<ul>
            <li><a href="/m/?q=BX1">BX1 Grand Concourse</a></li>
            <li><a href="/m/?q=BX2">BX2 Sedgwick Av</a></li>
            <li><a href="/m/?q=ignored">Service Alerts</a></li>
            <li><a href="/m/about">About</a></li>
        </ul>"#,
    )
    .await;

    mount_route(
        &mock_server,
        "BX1",
        html_page(
            r#"<a href="/m/?q=308323">Main St &amp; 1st Ave</a>
               <a href="/m/?q=308324">Grand Concourse / E 161 St</a>
               <a href="/m/?q=BX2">Switch to BX2</a>"#,
        ),
    )
    .await;

    mount_route(
        &mock_server,
        "BX2",
        html_page(r#"<a href="/m/?q=308323">Main St &amp; 1st Ave</a>"#),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let outcome = run_crawl(&config).await.expect("Crawl failed");

    // Only letter+digit values on the root page are routes
    let routes: Vec<&str> = outcome.snapshot.routes.iter().map(RouteId::as_str).collect();
    assert_eq!(routes, vec!["BX1", "BX2"]);

    // One row per stop, however many routes reference it
    assert_eq!(outcome.snapshot.stops.len(), 2);
    let shared = outcome
        .snapshot
        .stops
        .iter()
        .find(|s| s.id == stop("308323"))
        .expect("stop 308323 missing");
    assert_eq!(shared.name, "Main St & 1st Ave");
    assert!(shared.routes.contains(&route("BX1")));
    assert!(shared.routes.contains(&route("BX2")));

    let single = outcome
        .snapshot
        .stops
        .iter()
        .find(|s| s.id == stop("308324"))
        .expect("stop 308324 missing");
    assert_eq!(single.routes.len(), 1);
    assert!(single.routes.contains(&route("BX1")));

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.stats.pages_fetched, 3);
    assert_eq!(outcome.stats.pages_failed, 0);

    // Stop pages are never fetched, and neither is the skipped link
    let requests = mock_server.received_requests().await.unwrap();
    for request in &requests {
        let query = request.url.query().unwrap_or("");
        assert!(!query.contains("308323"), "stop page was fetched");
        assert!(!query.contains("ignored"), "non-route link was fetched");
    }
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_failed_route_page_is_recorded() {
    let mock_server = MockServer::start().await;

    mount_root(
        &mock_server,
        r#"<a href="/m/?q=BX1">BX1</a><a href="/m/?q=BX2">BX2</a>"#,
    )
    .await;
    mount_route(&mock_server, "BX1", ResponseTemplate::new(500)).await;
    mount_route(
        &mock_server,
        "BX2",
        html_page(r#"<a href="/m/?q=100200">Sedgwick Av &amp; W 170 St</a>"#),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].status_code, 500);
    assert!(outcome.errors[0].message.contains("Internal Server Error"));
    assert!(outcome.errors[0].message.contains("q=BX1"));

    // The failure does not stop the other branch
    assert_eq!(outcome.snapshot.routes.len(), 2);
    assert_eq!(outcome.snapshot.stops.len(), 1);
    assert_eq!(outcome.snapshot.stops[0].name, "Sedgwick Av & W 170 St");
    assert_eq!(outcome.stats.pages_failed, 1);

    // A single error is below the error-table threshold but still fails the run
    let dir = TempDir::new().unwrap();
    let report = export_tables(&outcome.snapshot, &outcome.errors, dir.path()).unwrap();
    assert!(report.failed());
    assert!(report.errors_path.is_none());
    assert!(!dir.path().join(ERRORS_FILE).exists());
}

#[tokio::test]
async fn test_multiple_failures_produce_error_table() {
    let mock_server = MockServer::start().await;

    mount_root(
        &mock_server,
        r#"<a href="/m/?q=Q44">Q44</a><a href="/m/?q=Q58">Q58</a><a href="/m/?q=M15">M15</a>"#,
    )
    .await;
    mount_route(&mock_server, "Q44", ResponseTemplate::new(500)).await;
    mount_route(&mock_server, "Q58", ResponseTemplate::new(503)).await;
    mount_route(
        &mock_server,
        "M15",
        html_page(r#"<a href="/m/?q=401234">1 Av &amp; E 14 St</a>"#),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let outcome = run_crawl(&config).await.expect("Crawl failed");
    assert_eq!(outcome.errors.len(), 2);

    let dir = TempDir::new().unwrap();
    let report = export_tables(&outcome.snapshot, &outcome.errors, dir.path()).unwrap();
    assert!(report.failed());

    let routes = fs::read_to_string(dir.path().join(ROUTES_FILE)).unwrap();
    assert_eq!(routes, "routeId\nM15\nQ44\nQ58\n");

    let stops = fs::read_to_string(dir.path().join(STOPS_FILE)).unwrap();
    assert_eq!(stops, "stopId,stopName,routes\n401234,1 Av & E 14 St,M15\n");

    let errors = fs::read_to_string(dir.path().join(ERRORS_FILE)).unwrap();
    let mut lines: Vec<&str> = errors.lines().collect();
    assert_eq!(lines.remove(0), "status code,error message");
    lines.sort();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("500,Internal Server Error"));
    assert!(lines[1].starts_with("503,Service Unavailable"));
}

#[tokio::test]
async fn test_missing_root_page() {
    let mock_server = MockServer::start().await;

    let config = create_test_config(&mock_server.uri());
    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert!(outcome.snapshot.routes.is_empty());
    assert!(outcome.snapshot.stops.is_empty());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].status_code, 404);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_root(
        &mock_server,
        r#"<a href="/m/?q=B63">B63</a><a href="/m/?q=B41">B41</a>"#,
    )
    .await;
    mount_route(
        &mock_server,
        "B63",
        html_page(r#"<a href="/m/?q=300001">5 Av &amp; Atlantic Av</a>"#),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri());
    config.crawler.max_depth = 0;

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    // Routes are recorded from the root page, but no route page is fetched
    assert_eq!(outcome.snapshot.routes.len(), 2);
    assert!(outcome.snapshot.stops.is_empty());
    assert_eq!(outcome.stats.pages_fetched, 1);
    assert_eq!(outcome.stats.links_beyond_depth, 2);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_root_is_transport_error() {
    let mut config = Config::default();
    config.crawler.root_url = "http://127.0.0.1:9/m/routes/".to_string();
    config.crawler.request_timeout = 5;

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].status_code, 0);
    assert_eq!(outcome.stats.pages_failed, 1);
}

#[tokio::test]
async fn test_redirected_root_resolves_links_against_final_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/m/list"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/m/list/", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/m/list/"))
        .respond_with(html_page(r#"<a href="bx1?q=BX1">BX1</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/m/list/bx1"))
        .and(query_param("q", "BX1"))
        .respond_with(html_page(r#"<a href="?q=308323">Main St &amp; 1st Ave</a>"#))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.crawler.root_url = format!("{}/m/list", mock_server.uri());

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.snapshot.stops.len(), 1);
    assert_eq!(outcome.snapshot.stops[0].id, stop("308323"));
    assert_eq!(
        outcome.snapshot.stops[0].routes.iter().collect::<Vec<_>>(),
        vec![&route("BX1")]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_route_pages_share_stops() {
    let mock_server = MockServer::start().await;
    let routes: Vec<String> = (1..=12).map(|n| format!("B{}", n)).collect();

    let listing: String = routes
        .iter()
        .map(|r| format!(r#"<a href="/m/?q={0}">{0}</a>"#, r))
        .collect();
    mount_root(&mock_server, &listing).await;

    // Every route serves the two shared stops plus one of its own
    for (n, r) in routes.iter().enumerate() {
        let body = format!(
            r#"<a href="/m/?q=100">Hub A</a><a href="/m/?q=200">Hub B</a><a href="/m/?q={}">Own stop</a>"#,
            1000 + n
        );
        mount_route(&mock_server, r, html_page(&body)).await;
    }

    let config = create_test_config(&mock_server.uri());
    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.snapshot.routes.len(), routes.len());
    assert_eq!(outcome.snapshot.stops.len(), 2 + routes.len());

    let all_routes: Vec<RouteId> = routes.iter().map(|r| route(r)).collect();
    for hub in ["100", "200"] {
        let rows: Vec<_> = outcome
            .snapshot
            .stops
            .iter()
            .filter(|s| s.id == stop(hub))
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].routes.len(), routes.len());
        for r in &all_routes {
            assert!(rows[0].routes.contains(r), "stop {} missing route {}", hub, r);
        }
    }
    assert_eq!(outcome.snapshot.association_count(), 3 * routes.len());
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.crawler.max_concurrent_pages_open = 0;

    let result = run_crawl(&config).await;
    assert!(matches!(result, Err(MapperError::Config(_))));
}
