//! Router-level tests for the HTTP surface, using trait fakes in place of
//! the browser, the page loader, and the document store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crawler::{ContentFetcher, CrawlError, PageCrawler, PageLoader, ScrapePipeline};
use llm_client::LlmClient;
use server_core::domains::memory::MemoryDocumentStore;
use server_core::kernel::ServerDeps;
use server_core::server::build_app;

struct FixedCrawler {
    hrefs: Vec<String>,
}

#[async_trait]
impl PageCrawler for FixedCrawler {
    async fn collect_hrefs(&self, _url: &str) -> Result<Vec<String>, CrawlError> {
        Ok(self.hrefs.clone())
    }
}

struct FailingCrawler;

#[async_trait]
impl PageCrawler for FailingCrawler {
    async fn collect_hrefs(&self, url: &str) -> Result<Vec<String>, CrawlError> {
        Err(CrawlError::Browser(format!("navigation failed for {url}")))
    }
}

struct EchoLoader;

#[async_trait]
impl PageLoader for EchoLoader {
    async fn load(&self, url: &str) -> Result<String, CrawlError> {
        Ok(format!("text from {url}"))
    }
}

fn app_with_crawler(crawler: Arc<dyn PageCrawler>) -> axum::Router {
    let pipeline = Arc::new(ScrapePipeline::new(
        crawler,
        ContentFetcher::new(Arc::new(EchoLoader)),
    ));
    let deps = Arc::new(ServerDeps::new(
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(LlmClient::new("test-key")),
        "test-model".to_string(),
        pipeline,
    ));
    build_app(deps)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn scrape_returns_only_internal_pages() {
    let app = app_with_crawler(Arc::new(FixedCrawler {
        hrefs: vec![
            "https://example.com/about".to_string(),
            "https://example.com/pricing".to_string(),
            "https://external.org/elsewhere".to_string(),
        ],
    }));

    let response = app
        .oneshot(post_json("/scrape", r#"{"url": "https://example.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for page in results {
        let url = page["url"].as_str().unwrap();
        assert!(url.starts_with("https://example.com/"));
        assert!(page["content"].as_str().unwrap().contains("text from"));
    }
}

#[tokio::test]
async fn scrape_failure_becomes_500_with_detail() {
    let app = app_with_crawler(Arc::new(FailingCrawler));

    let response = app
        .oneshot(post_json("/scrape", r#"{"url": "https://example.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("navigation failed"));
}

#[tokio::test]
async fn scrape_rejects_invalid_base_url() {
    let app = app_with_crawler(Arc::new(FixedCrawler { hrefs: vec![] }));

    let response = app
        .oneshot(post_json("/scrape", r#"{"url": "not a url"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("invalid URL"));
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = app_with_crawler(Arc::new(FixedCrawler { hrefs: vec![] }));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["document_store"]["status"], "ok");
}

#[tokio::test]
async fn analyze_compliance_surfaces_llm_failure_as_500() {
    // LLM endpoint that refuses connections: the scrape succeeds, the model
    // call fails, and the handler boundary converts it to a 500 detail.
    let pipeline = Arc::new(ScrapePipeline::new(
        Arc::new(FixedCrawler {
            hrefs: vec!["https://example.com/about".to_string()],
        }),
        ContentFetcher::new(Arc::new(EchoLoader)),
    ));
    let deps = Arc::new(ServerDeps::new(
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(LlmClient::new("test-key").with_base_url("http://127.0.0.1:1/v1")),
        "test-model".to_string(),
        pipeline,
    ));
    let app = build_app(deps);

    let response = app
        .oneshot(post_json(
            "/analyze_compliance",
            r#"{"url": "https://example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["detail"].is_string());
}
