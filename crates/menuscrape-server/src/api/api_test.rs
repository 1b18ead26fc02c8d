use std::path::Path;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use menuscrape_core::{builtin_profiles, AddOnGroup, CanonicalMenuItem, Environment, ObjectId};
use menuscrape_scraper::write_menu;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::jobs::{InMemoryJobStore, JobRecord};

struct TestApp {
    state: AppState,
    output: TempDir,
    _static: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let output = tempfile::tempdir().expect("output dir");
        let static_dir = tempfile::tempdir().expect("static dir");
        std::fs::write(
            static_dir.path().join("index.html"),
            "<html><body>menu dashboard</body></html>",
        )
        .expect("write index");

        let config = AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "debug".to_string(),
            output_dir: output.path().to_path_buf(),
            static_dir: static_dir.path().to_path_buf(),
            profiles_path: None,
            debug_dir: None,
            page_load_timeout_secs: 5,
            selector_timeout_secs: 1,
            request_timeout_secs: 10,
            user_agent: menuscrape_core::config::DEFAULT_USER_AGENT.to_string(),
            fetch_max_retries: 0,
        };

        let state = AppState {
            config: Arc::new(config),
            profiles: Arc::new(builtin_profiles()),
            jobs: Arc::new(InMemoryJobStore::new()),
            loader: HttpPageLoader::new(0, 0).expect("loader"),
            started_at: Instant::now(),
        };

        Self {
            state,
            output,
            _static: static_dir,
        }
    }

    fn output_dir(&self) -> &Path {
        self.output.path()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        build_app(self.state.clone())
            .oneshot(request)
            .await
            .expect("response")
    }
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn disposition(response: &Response) -> String {
    response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn item(name: &str, category: &str) -> CanonicalMenuItem {
    CanonicalMenuItem {
        id: ObjectId::new(format!("{name}-id")),
        name: name.to_string(),
        price: "$12.00".to_string(),
        image: None,
        tags: vec![],
        category: category.to_string(),
        ingredients: vec![],
        spice_level: " ".to_string(),
        add_ons: vec![AddOnGroup::new("Extras", vec![])],
        preparation_time: " ".to_string(),
        recommended_with: vec![],
        restaurant: "Il Caminetto".to_string(),
        dietary: vec![],
        brand_id: ObjectId::new("brand"),
        description: String::new(),
    }
}

const STORE_HTML: &str = r#"<html><head>
<script type="application/ld+json">
{"@context":"https://schema.org","@type":"Restaurant","name":"Chipotle Mexican Grill",
 "hasMenu":{"@type":"Menu","hasMenuSection":[
   {"name":"Entrees","hasMenuItem":[{"name":"Burrito Bowl","offers":{"price":"11.25"}}]},
   {"name":"Drinks","hasMenuItem":[{"name":"Mexican Coke","offers":{"price":"3.45"}}]}
 ]}}
</script>
</head><body></body></html>"#;

async fn store_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/chipotle"))
        .respond_with(ResponseTemplate::new(status).set_body_string(STORE_HTML))
        .mount(&server)
        .await;
    server
}

// -----------------------------------------------------------------------------
// health, static files and fallbacks
// -----------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_with_uptime() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "OK");
    assert!(json["uptime"].as_f64().is_some());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn dashboard_is_served_from_static_dir() {
    let app = TestApp::new();
    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("menu dashboard"));
}

#[tokio::test]
async fn unknown_path_returns_json_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/v2/nothing-here").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Not Found");
    assert_eq!(json["message"], "Endpoint not found");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");

    let response = app.get("/health").await;
    let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(generated.len(), 36, "expected a UUID, got {generated}");
}

// -----------------------------------------------------------------------------
// stored menus
// -----------------------------------------------------------------------------

#[tokio::test]
async fn unknown_site_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/v1/scrapers/doordash/menu").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Unknown scraper");
}

#[tokio::test]
async fn menu_without_file_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/v1/scrapers/ilcaminetto/menu").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Menu data not found. Run the scraper first.");
}

#[tokio::test]
async fn menu_returns_stored_items_with_last_updated() {
    let app = TestApp::new();
    write_menu(
        &app.output_dir().join("ilcaminetto_menu.json"),
        &[item("Tagliatelle", "PASTA"), item("Peroni", "BEERS")],
    )
    .await
    .unwrap();

    let response = app.get("/api/v1/scrapers/ilcaminetto/menu").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["totalItems"], 2);
    assert_eq!(json["data"][0]["name"], "Tagliatelle");
    assert_eq!(json["data"][1]["category"], "BEERS");
    assert!(json["lastUpdated"].is_string());
}

#[tokio::test]
async fn corrupt_menu_file_is_internal_error() {
    let app = TestApp::new();
    std::fs::write(app.output_dir().join("uber_menu.json"), "{not json").unwrap();

    let response = app.get("/api/v1/scrapers/uber/menu").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Error reading menu data");
}

#[tokio::test]
async fn download_serves_stored_array_as_attachment() {
    let app = TestApp::new();
    write_menu(
        &app.output_dir().join("ilcaminetto_menu.json"),
        &[item("Tagliatelle", "PASTA")],
    )
    .await
    .unwrap();

    let response = app.get("/api/v1/scrapers/ilcaminetto/download").await;

    assert_eq!(response.status(), StatusCode::OK);
    let header = disposition(&response);
    assert!(
        header.starts_with("attachment; filename=\"ilcaminetto-menu-") && header.ends_with("Z.json\""),
        "unexpected disposition: {header}"
    );
    let json = json_body(response).await;
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["_id"]["$oid"], "Tagliatelle-id");
}

#[tokio::test]
async fn download_all_skips_sites_without_files() {
    let app = TestApp::new();
    write_menu(
        &app.output_dir().join("uber_menu.json"),
        &[item("Burrito Bowl", "ENTREES")],
    )
    .await
    .unwrap();

    let response = app.get("/api/v1/download/all").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(disposition(&response).contains("all-menus-"));
    let json = json_body(response).await;
    assert!(json["scraped_at"].is_string());
    assert_eq!(json["scrapers"]["uber"][0]["name"], "Burrito Bowl");
    assert!(json["scrapers"].get("ilcaminetto").is_none());
}

// -----------------------------------------------------------------------------
// scraping
// -----------------------------------------------------------------------------

#[tokio::test]
async fn scrape_download_requires_url() {
    let app = TestApp::new();
    let response = app.get("/api/v1/scrapers/uber/scrape-download").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "URL is required");
    assert_eq!(
        json["message"],
        "Please provide a URL as query parameter: ?url=YOUR_URL"
    );
}

#[tokio::test]
async fn scrape_download_runs_and_returns_fresh_menu() {
    let server = store_server(200).await;
    let app = TestApp::new();
    let url = format!("{}/store/chipotle", server.uri());

    let response = app
        .get(&format!("/api/v1/scrapers/uber/scrape-download?url={url}"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(disposition(&response).starts_with("attachment; filename=\"uber-"));
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["scraped_url"], url);
    assert_eq!(json["total_items"], 2);
    assert_eq!(json["data"][0]["name"], "Burrito Bowl");
    assert_eq!(json["data"][0]["price"], "$11.25");
    assert!(app.output_dir().join("uber_menu.json").exists());
}

const TAQUERIA_HTML: &str = r#"<html><head>
<script type="application/ld+json">
{"@context":"https://schema.org","@type":"Restaurant","name":"Taqueria",
 "hasMenu":{"@type":"Menu","hasMenuSection":[
   {"name":"Tacos","hasMenuItem":[{"name":"Al Pastor Taco","offers":{"price":"4.50"}}]}
 ]}}
</script>
</head><body></body></html>"#;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_scrape_downloads_each_return_their_own_menu() {
    let server = store_server(200).await;
    Mock::given(method("GET"))
        .and(path("/store/taqueria"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TAQUERIA_HTML))
        .mount(&server)
        .await;
    let app = TestApp::new();
    let chipotle = format!("/api/v1/scrapers/uber/scrape-download?url={}/store/chipotle", server.uri());
    let taqueria = format!("/api/v1/scrapers/uber/scrape-download?url={}/store/taqueria", server.uri());

    for _ in 0..5 {
        let (a, b) = tokio::join!(app.get(&chipotle), app.get(&taqueria));
        let (a, b) = (json_body(a).await, json_body(b).await);

        assert_eq!(a["total_items"], 2);
        assert_eq!(a["data"][0]["name"], "Burrito Bowl");
        assert_eq!(a["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(b["total_items"], 1);
        assert_eq!(b["data"][0]["name"], "Al Pastor Taco");
        assert_eq!(b["data"].as_array().map(Vec::len), Some(1));
    }
}

#[tokio::test]
async fn scrape_download_failure_is_internal_error() {
    let server = store_server(404).await;
    let app = TestApp::new();

    let response = app
        .get(&format!(
            "/api/v1/scrapers/uber/scrape-download?url={}/store/chipotle",
            server.uri()
        ))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Scraping failed");
}

async fn wait_for_terminal(app: &TestApp, job_id: &str) -> serde_json::Value {
    for _ in 0..100 {
        let json = json_body(app.get(&format!("/api/v1/scrapers/status/{job_id}")).await).await;
        if json["status"] != "running" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {job_id} never finished");
}

#[tokio::test]
async fn background_scrape_completes_with_download_url() {
    let server = store_server(200).await;
    let app = TestApp::new();
    let url = format!("{}/store/chipotle", server.uri());

    let response = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/scrapers/uber/scrape")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::json!({ "url": url }).to_string()))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let started = json_body(response).await;
    assert_eq!(started["message"], "Scraping started in background");
    let job_id = started["jobId"].as_str().unwrap().to_string();
    assert!(job_id.starts_with("uber_"));
    assert_eq!(
        started["statusEndpoint"],
        format!("/api/v1/scrapers/status/{job_id}")
    );

    let status = wait_for_terminal(&app, &job_id).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["url"], url);
    assert_eq!(status["downloadUrl"], "/api/v1/scrapers/uber/download");
    assert_eq!(status["result"]["totalItems"], 2);
    assert!(status["completedTime"].is_string());
}

#[tokio::test]
async fn background_scrape_without_body_fails_on_unreachable_default() {
    let app = TestApp::new();
    let mut state = app.state.clone();
    let mut profiles = builtin_profiles();
    let mut uber = profiles.get("uber").cloned().unwrap();
    uber.default_url = "http://127.0.0.1:9/store".to_string();
    profiles.upsert(uber);
    state.profiles = Arc::new(profiles);
    let app = TestApp { state, ..app };

    let response = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/scrapers/uber/scrape")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    let job_id = json_body(response).await["jobId"]
        .as_str()
        .unwrap()
        .to_string();

    let status = wait_for_terminal(&app, &job_id).await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["url"], "http://127.0.0.1:9/store");
    assert!(status["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(status.get("downloadUrl").is_none());
}

// -----------------------------------------------------------------------------
// jobs
// -----------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/v1/scrapers/status/uber_missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Job not found");
    assert_eq!(
        json["message"],
        "The specified job ID does not exist or has expired."
    );
}

#[tokio::test]
async fn running_job_reports_elapsed_time() {
    let app = TestApp::new();
    let record = JobRecord::running("ilcaminetto", "http://orders.example/");
    let job_id = record.job_id.clone();
    app.state.jobs.put(record);

    let json = json_body(app.get(&format!("/api/v1/scrapers/status/{job_id}")).await).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "running");
    assert_eq!(json["scraper"], "ilcaminetto");
    assert_eq!(json["message"], "Scraping in progress...");
    assert!(json["elapsedTime"].as_str().is_some_and(|t| t.ends_with('s')));
    assert!(json.get("completedTime").is_none());
}

#[tokio::test]
async fn job_list_counts_by_status() {
    let app = TestApp::new();
    app.state.jobs.put(JobRecord::running("uber", "u1"));
    app.state
        .jobs
        .put(JobRecord::running("uber", "u2").failed("boom".to_string()));
    app.state
        .jobs
        .put(JobRecord::running("ilcaminetto", "u3").failed("closed".to_string()));

    let json = json_body(app.get("/api/v1/scrapers/jobs").await).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["totalJobs"], 3);
    assert_eq!(json["runningJobs"], 1);
    assert_eq!(json["completedJobs"], 0);
    assert_eq!(json["failedJobs"], 2);
    assert_eq!(json["jobs"].as_array().map(Vec::len), Some(3));
}

#[test]
fn file_timestamp_has_no_colons() {
    let ts = chrono::DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123Z")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(file_timestamp(ts), "2024-05-01T10-20-30-123Z");
}
