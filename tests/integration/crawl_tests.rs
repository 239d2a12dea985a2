//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature directory and run the full
//! crawl cycle end-to-end over HTTP.

use indiacom_crawler::config::{
    Config, CrawlerConfig, OutputConfig, TraversalConfig, UserAgentConfig,
};
use indiacom_crawler::crawler::crawl;
use indiacom_crawler::output::OutputError;
use indiacom_crawler::state::Checkpoint;
use indiacom_crawler::storage::{CheckpointStore, TomlCheckpointStore};
use indiacom_crawler::CrawlerError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling only the letter A
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            category_url: format!("{}/yellow-pages/?catalphabet={{alphabet}}", base_url),
            max_retries: 3,
            backoff_unit_ms: 1, // Very short for testing
            page_load_timeout_secs: 5,
        },
        traversal: TraversalConfig {
            final_letter: 'B',
            include_final_letter: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            resources_dir: dir.join("resources"),
            file_prefix: "business".to_string(),
            checkpoint_path: dir.join("checkpoint.toml"),
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn listing(name: &str, address: &str, href: &str) -> String {
    format!(
        r#"<div class="b_listing"><div class="b_name"><a href="{}">{}</a></div><div class="b_address">{}</div></div>"#,
        href, name, address
    )
}

async fn mount_categories(server: &MockServer, items: &str) {
    Mock::given(method("GET"))
        .and(path("/yellow-pages/"))
        .and(query_param("catalphabet", "A"))
        .respond_with(html(&format!("<ul>{}</ul>", items)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, keyword_path: &str, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(keyword_path))
        .and(query_param("page", page))
        .respond_with(html(&body))
        .mount(server)
        .await;
}

/// Mounts a detail page whose phone is revealed by following its control
async fn mount_detail(server: &MockServer, detail_path: &str, phone: &str) {
    Mock::given(method("GET"))
        .and(path(detail_path))
        .respond_with(html(&format!(
            r#"<div id="div_phoneadd"><a href="{}phone/">View phone</a></div>"#,
            detail_path
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}phone/", detail_path)))
        .respond_with(html(&format!(
            r#"<div id="div_phoneadd"><div class="lighttext"><strong><a href="tel:{0}">{0}</a></strong></div></div>"#,
            phone
        )))
        .mount(server)
        .await;
}

/// Returns the only dump file written into `dir`
fn dump_file(dir: &Path) -> PathBuf {
    let files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read resources dir")
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "csv"))
        .collect();
    assert_eq!(files.len(), 1, "expected exactly one dump file");
    files.into_iter().next().unwrap()
}

fn saved_checkpoint(config: &Config) -> Checkpoint {
    TomlCheckpointStore::new(config.output.checkpoint_path.clone())
        .load()
        .expect("Failed to load checkpoint")
}

#[tokio::test]
async fn test_full_crawl_single_letter() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    mount_categories(
        &mock_server,
        r#"<li class="catlink"><a href="/kw/bakers/">Bakers</a> (45)</li>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/kw/bakers/",
        "1",
        listing("Sunrise Bakery", "Andheri, Mumbai", "/biz/1/"),
    )
    .await;
    mount_page(
        &mock_server,
        "/kw/bakers/",
        "2",
        listing("Moonlight Cakes", "Kothrud, Pune", "/biz/2/"),
    )
    .await;
    mount_detail(&mock_server, "/biz/1/", "+91-2212345678").await;
    mount_detail(&mock_server, "/biz/2/", "+91-2087654321").await;

    let stats = crawl(config.clone(), true).await.expect("Crawl failed");
    assert_eq!(stats.pages_crawled, 2);
    assert_eq!(stats.records_written, 2);

    let content = fs::read_to_string(dump_file(&config.output.resources_dir)).unwrap();
    let lines: Vec<&str> = content.split_terminator("\r\n").collect();
    assert_eq!(
        lines,
        vec![
            r#""business_name"|"location"|"phone""#,
            r#""Sunrise Bakery"|"Andheri, Mumbai"|"+91-2212345678""#,
            r#""Moonlight Cakes"|"Kothrud, Pune"|"+91-2087654321""#,
        ]
    );

    assert_eq!(saved_checkpoint(&config), Checkpoint::new('B', 1, 1));
}

#[tokio::test]
async fn test_resume_from_checkpoint() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());
    fs::create_dir_all(&config.output.resources_dir).unwrap();

    let mut store = TomlCheckpointStore::new(config.output.checkpoint_path.clone());
    store.save(&Checkpoint::new('A', 1, 2)).unwrap();

    mount_categories(
        &mock_server,
        r#"<li class="catlink"><a href="/kw/bakers/">Bakers</a> (45)</li>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/kw/bakers/"))
        .and(query_param("page", "1"))
        .respond_with(html(&listing("Sunrise Bakery", "Mumbai", "/biz/1/")))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/kw/bakers/",
        "2",
        listing("Moonlight Cakes", "Pune", "/biz/2/"),
    )
    .await;
    mount_detail(&mock_server, "/biz/2/", "+91-2087654321").await;

    let stats = crawl(config.clone(), false).await.expect("Crawl failed");
    assert_eq!(stats.records_written, 1);

    let content = fs::read_to_string(dump_file(&config.output.resources_dir)).unwrap();
    assert!(!content.contains("Sunrise Bakery"));
    assert!(content.contains("Moonlight Cakes"));
    assert_eq!(saved_checkpoint(&config), Checkpoint::new('B', 1, 1));
}

#[tokio::test]
async fn test_failing_keyword_is_skipped() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    mount_categories(
        &mock_server,
        concat!(
            r#"<li class="catlink"><a href="/kw/bakers/">Bakers</a> (12)</li>"#,
            r#"<li class="catlink"><a href="/kw/banks/">Banks</a> (3)</li>"#,
        ),
    )
    .await;

    // One initial attempt plus three retries
    Mock::given(method("GET"))
        .and(path("/kw/bakers/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/kw/banks/",
        "1",
        listing("State Bank", "Connaught Place, Delhi", "/biz/sb/"),
    )
    .await;
    mount_detail(&mock_server, "/biz/sb/", "+91-1123456789").await;

    let stats = crawl(config.clone(), true).await.expect("Crawl failed");
    assert_eq!(stats.keywords_skipped, 1);
    assert_eq!(stats.records_written, 1);

    let content = fs::read_to_string(dump_file(&config.output.resources_dir)).unwrap();
    assert!(content.contains("State Bank"));
    assert_eq!(saved_checkpoint(&config), Checkpoint::new('B', 1, 1));
}

#[tokio::test]
async fn test_missing_checkpoint_requires_reset() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", temp_dir.path());

    let result = crawl(config, false).await;
    assert!(matches!(
        result,
        Err(CrawlerError::ConfigurationMissing { .. })
    ));
}

#[tokio::test]
async fn test_missing_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", temp_dir.path());

    let mut store = TomlCheckpointStore::new(config.output.checkpoint_path.clone());
    store.save(&Checkpoint::default()).unwrap();

    let result = crawl(config, false).await;
    assert!(matches!(
        result,
        Err(CrawlerError::OutputUnavailable(OutputError::DirectoryMissing(_)))
    ));
}
