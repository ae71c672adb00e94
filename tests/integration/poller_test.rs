// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auditrs::client::poller::{PollError, ScanPoller};
use auditrs::domain::models::scan::ScanStatus;
use auditrs::utils::retry_policy::{CancelHandle, PollPolicy};

const SCAN_ID: &str = "c6f1b9b2-9c1e-4f5a-8a7d-2f4f5b6a7c8d";

fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        max_attempts,
        interval: Duration::from_millis(10),
        ..PollPolicy::default()
    }
}

fn submit_response() -> serde_json::Value {
    json!({ "id": SCAN_ID, "url": "https://example.com", "status": "pending" })
}

fn record(status: &str) -> serde_json::Value {
    json!({
        "id": SCAN_ID,
        "url": "https://example.com",
        "status": status,
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

fn completed_record() -> serde_json::Value {
    json!({
        "id": SCAN_ID,
        "url": "https://example.com",
        "status": "completed",
        "createdAt": "2024-01-01T00:00:00Z",
        "completedAt": "2024-01-01T00:00:42Z",
        "results": {
            "score": 72,
            "metrics": {
                "performance": 85,
                "accessibility": 72,
                "bestPractices": 92,
                "seo": 88
            },
            "issues": []
        }
    })
}

#[tokio::test]
async fn test_scan_polls_until_completed() {
    let server = MockServer::start().await;

    // URL 规范化后才提交，裸域名要补上 https:// 前缀
    Mock::given(method("POST"))
        .and(path("/scan"))
        .and(body_json(json!({ "url": "https://example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(submit_response()))
        .expect(1)
        .mount(&server)
        .await;

    // 先到先匹配：前两次拉取仍在进行中，之后转入完成
    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("in_progress")))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed_record()))
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(20));
    let result = poller.scan("example.com").await.unwrap();

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.results.unwrap().score, 72);
}

#[tokio::test]
async fn test_repeated_scan_of_same_url_does_not_resubmit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(201).set_body_json(submit_response()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed_record()))
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(20));

    let first = poller.scan("https://example.com").await.unwrap();
    // 第二次调用命中缓存的终态记录，不再发起任何请求
    let second = poller.scan("https://example.com").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.status, ScanStatus::Completed);
    server.verify().await;
}

#[tokio::test]
async fn test_poll_budget_exhausted_returns_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(201).set_body_json(submit_response()))
        .mount(&server)
        .await;

    // 预算内每次尝试都要实际拉取一次，不多不少
    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("in_progress")))
        .expect(5)
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(5));
    let result = poller.scan("https://example.com").await;

    match result {
        Err(PollError::Timeout { attempts }) => assert_eq!(attempts, 5),
        other => panic!("expected timeout, got {:?}", other.map(|r| r.status)),
    }
    server.verify().await;
}

#[tokio::test]
async fn test_failed_scan_is_a_valid_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(201).set_body_json(submit_response()))
        .mount(&server)
        .await;

    let mut failed = record("failed");
    failed["error"] = json!("engine crashed");
    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed))
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(20));
    let result = poller.scan("https://example.com").await.unwrap();

    // 失败是终态，不是轮询错误
    assert_eq!(result.status, ScanStatus::Failed);
    assert_eq!(result.error.as_deref(), Some("engine crashed"));
}

#[tokio::test]
async fn test_submission_rejection_fails_fast() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid URL" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("pending")))
        .expect(0)
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(20));
    let result = poller.scan("https://example.com").await;

    match result {
        Err(PollError::Submit(message)) => assert!(message.contains("Invalid URL")),
        other => panic!("expected submit error, got {:?}", other.map(|r| r.status)),
    }
    server.verify().await;
}

#[tokio::test]
async fn test_fetch_report_normalizes_legacy_record_shape() {
    let server = MockServer::start().await;

    // 旧版记录：_id 别名、无显式状态，但携带结果
    let legacy = json!({
        "_id": SCAN_ID,
        "url": "https://example.com",
        "createdAt": "2024-01-01T00:00:00Z",
        "results": completed_record()["results"]
    });
    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy))
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(20));
    let record = poller
        .fetch_report(Uuid::parse_str(SCAN_ID).unwrap())
        .await
        .unwrap();

    assert_eq!(record.id.to_string(), SCAN_ID);
    assert_eq!(record.status, ScanStatus::Completed);
}

#[tokio::test]
async fn test_fetch_report_unknown_id_returns_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let poller = ScanPoller::new(server.uri(), fast_policy(20));
    let result = poller.fetch_report(Uuid::new_v4()).await;

    assert!(matches!(result, Err(PollError::NotFound)));
}

#[tokio::test]
async fn test_cancel_aborts_polling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(201).set_body_json(submit_response()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/reports/{}", SCAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("in_progress")))
        .mount(&server)
        .await;

    let policy = PollPolicy {
        max_attempts: 50,
        interval: Duration::from_secs(5),
        ..PollPolicy::default()
    };
    let poller = Arc::new(ScanPoller::new(server.uri(), policy));
    let cancel = CancelHandle::new();

    let task = {
        let poller = Arc::clone(&poller);
        let cancel = cancel.clone();
        tokio::spawn(async move { poller.scan_cancellable("https://example.com", &cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let result = task.await.unwrap();
    assert!(matches!(result, Err(PollError::Cancelled)));
}
