// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use auditrs::application::use_cases::scan_use_case::ScanOrchestrator;
use auditrs::domain::models::scan::ScanRecord;
use auditrs::domain::repositories::scan_repository::ScanRepository;
use auditrs::infrastructure::repositories::memory_scan_repo::MemoryScanRepository;
use auditrs::presentation::routes;
use auditrs::scanner::traits::{AuditRunner, RawAuditReport, ScannerError};

struct StubRunner;

#[async_trait]
impl AuditRunner for StubRunner {
    async fn run_audit(&self, _url: &str) -> Result<RawAuditReport, ScannerError> {
        Ok(RawAuditReport {
            performance_score: Some(85),
            accessibility_score: Some(72),
            best_practices_score: Some(92),
            seo_score: Some(88),
            issues: vec![],
        })
    }

    fn name(&self) -> &str {
        "stub_runner"
    }
}

fn test_app() -> (TestServer, Arc<MemoryScanRepository>) {
    let repo = Arc::new(MemoryScanRepository::new());
    let orchestrator = Arc::new(ScanOrchestrator::new(
        Arc::clone(&repo),
        Arc::new(StubRunner),
        Duration::from_secs(120),
    ));
    let server = TestServer::new(routes::app(orchestrator)).unwrap();
    (server, repo)
}

/// 轮询报告端点直到扫描进入终态
async fn poll_until_terminal(server: &TestServer, id: &str) -> Value {
    for _ in 0..200 {
        let response = server.get(&format!("/reports/{}", id)).await;
        if response.status_code().is_success() {
            let body: Value = response.json();
            let status = body["status"].as_str().unwrap_or_default().to_string();
            if status == "completed" || status == "failed" {
                return body;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("scan {} never reached a terminal state", id);
}

#[tokio::test]
async fn test_create_scan_returns_201_with_pending_record() {
    let (server, _repo) = test_app();

    let response = server
        .post("/scan")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["url"], "https://example.com");
    Uuid::parse_str(body["id"].as_str().unwrap()).expect("id must be a uuid");
}

#[tokio::test]
async fn test_create_scan_rejects_invalid_url() {
    let (server, _repo) = test_app();

    let response = server
        .post("/scan")
        .json(&json!({ "url": "not a url" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_get_report_unknown_id_returns_404() {
    let (server, _repo) = test_app();

    let response = server.get(&format!("/reports/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_scan_reaches_completed_with_results() {
    let (server, _repo) = test_app();

    let response = server
        .post("/scan")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    let body: Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();

    let report = poll_until_terminal(&server, &id).await;
    assert_eq!(report["status"], "completed");
    assert_eq!(report["results"]["score"], 72);
    assert_eq!(report["results"]["metrics"]["bestPractices"], 92);
    // 报告携带按严重程度的问题计数
    assert_eq!(report["results"]["issuesBySeverity"]["critical"], 0);
    assert!(report.get("error").is_none());
}

#[tokio::test]
async fn test_list_reports_honors_limit_and_order() {
    let (server, repo) = test_app();

    let mut ids = Vec::new();
    for i in 0..5 {
        let mut record = ScanRecord::new(format!("https://example{}.com", i));
        record.created_at = chrono::Utc::now() - chrono::Duration::seconds(100 - i);
        repo.create(&record).await.unwrap();
        ids.push(record.id.to_string());
    }

    let response = server.get("/reports?limit=3").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    // 最新的排在最前
    assert_eq!(items[0]["id"], ids[4].as_str());
    assert_eq!(items[1]["id"], ids[3].as_str());
    assert_eq!(items[2]["id"], ids[2].as_str());
}

#[tokio::test]
async fn test_delete_scans_reports_partial_failure() {
    let (server, repo) = test_app();

    let record = ScanRecord::new("https://example.com".to_string());
    repo.create(&record).await.unwrap();
    let missing = Uuid::new_v4();

    let response = server
        .delete("/scans")
        .json(&json!({ "ids": [record.id, missing] }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["deleted"], json!([record.id.to_string()]));
    assert_eq!(body["totalDeleted"], 1);
    assert_eq!(body["totalFailed"], 1);
    assert_eq!(body["failed"][0]["id"], missing.to_string());
}

#[tokio::test]
async fn test_delete_scans_rejects_empty_ids() {
    let (server, _repo) = test_app();

    let response = server.delete("/scans").json(&json!({ "ids": [] })).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_health_check() {
    let (server, _repo) = test_app();

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (server, _repo) = test_app();

    let response = server.get("/version").await;
    assert_eq!(response.status_code(), 200);
    assert!(!response.text().is_empty());
}
