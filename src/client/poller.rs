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

use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::record::{self, RecordError};
use crate::domain::models::scan::ScanRecord;
use crate::utils::retry_policy::{CancelHandle, PollPolicy};
use crate::utils::url_utils;

/// 轮询错误类型
#[derive(thiserror::Error, Debug)]
pub enum PollError {
    /// 提交失败，未开始轮询
    #[error("Scan submission failed: {0}")]
    Submit(String),
    /// HTTP请求失败
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// 扫描不存在
    #[error("Scan not found")]
    NotFound,
    /// 记录格式错误
    #[error("Malformed scan record: {0}")]
    Malformed(#[from] RecordError),
    /// 轮询预算耗尽，扫描仍未到达终态。
    /// 这表示轮询方放弃等待，不代表扫描本身失败。
    #[error("Polling timed out after {attempts} attempts")]
    Timeout { attempts: u32 },
    /// 轮询被调用方取消
    #[error("Polling cancelled")]
    Cancelled,
}

/// 最近一次提交的扫描，用于重复提交抑制
struct LastScan {
    url: String,
    id: Uuid,
    terminal: Option<ScanRecord>,
}

/// 扫描客户端轮询器
///
/// 把一次扫描提交桥接为最终的终态记录，对调用方隐藏轮询细节：
/// 提交后按固定间隔拉取记录，直到离开非终态集合或预算耗尽。
/// 对同一URL的重复调用不会重复提交扫描。
pub struct ScanPoller {
    http: reqwest::Client,
    base_url: String,
    policy: PollPolicy,
    last: Mutex<Option<LastScan>>,
}

impl ScanPoller {
    pub fn new(base_url: impl Into<String>, policy: PollPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
            last: Mutex::new(None),
        }
    }

    /// 提交URL并轮询至终态
    ///
    /// `Failed` 状态的记录是合法的返回值，由调用方自行分支处理；
    /// 只有轮询预算耗尽才会返回 `Timeout`。
    pub async fn scan(&self, url: &str) -> Result<ScanRecord, PollError> {
        self.scan_cancellable(url, &CancelHandle::new()).await
    }

    /// 与 `scan` 相同，但可以通过取消句柄中途放弃。
    /// 被放弃的轮询不会污染后续扫描的状态。
    pub async fn scan_cancellable(
        &self,
        url: &str,
        cancel: &CancelHandle,
    ) -> Result<ScanRecord, PollError> {
        let target = url_utils::normalize_scan_url(url);

        // Duplicate-submission suppression: an identical URL that already
        // resolved returns the cached terminal record; an in-flight one
        // resumes polling instead of re-submitting.
        let resume = {
            let last = self.last.lock();
            match last.as_ref() {
                Some(prev) if prev.url == target => {
                    if let Some(record) = &prev.terminal {
                        debug!("Returning cached terminal scan {} for {}", prev.id, target);
                        return Ok(record.clone());
                    }
                    Some(prev.id)
                }
                _ => None,
            }
        };

        let id = match resume {
            Some(id) => {
                debug!("Resuming poll for in-flight scan {}", id);
                id
            }
            None => {
                let id = self.submit(&target).await?;
                info!("Submitted scan {} for {}", id, target);
                *self.last.lock() = Some(LastScan {
                    url: target.clone(),
                    id,
                    terminal: None,
                });
                id
            }
        };

        let record = self.poll_until_terminal(id, cancel).await?;

        let mut last = self.last.lock();
        if let Some(prev) = last.as_mut() {
            if prev.id == id {
                prev.terminal = Some(record.clone());
            }
        }

        Ok(record)
    }

    /// 单次拉取扫描报告，不轮询
    ///
    /// 用于调用方已经预期终态的场景，比如查看历史记录。
    pub async fn fetch_report(&self, id: Uuid) -> Result<ScanRecord, PollError> {
        let response = self
            .http
            .get(format!("{}/reports/{}", self.base_url, id))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PollError::NotFound);
        }

        let body: Value = response.error_for_status()?.json().await?;
        Ok(record::parse_record(&body)?)
    }

    async fn submit(&self, url: &str) -> Result<Uuid, PollError> {
        let response = self
            .http
            .post(format!("{}/scan", self.base_url))
            .json(&json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("scan submission rejected");
            return Err(PollError::Submit(format!("{}: {}", status, message)));
        }

        let body: Value = response.json().await?;
        Ok(record::identifier_of(&body)?)
    }

    async fn poll_until_terminal(
        &self,
        id: Uuid,
        cancel: &CancelHandle,
    ) -> Result<ScanRecord, PollError> {
        let mut attempt = 0u32;

        while self.policy.should_continue(attempt) {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }
            attempt += 1;

            let record = self.fetch_report(id).await?;
            if record.is_terminal() {
                debug!(
                    "Scan {} reached {} after {} attempts",
                    id, record.status, attempt
                );
                return Ok(record);
            }

            debug!("Scan {} still {}, attempt {}", id, record.status, attempt);

            // No pause after the final attempt, the budget is spent.
            if self.policy.should_continue(attempt) {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(PollError::Cancelled),
                    _ = tokio::time::sleep(self.policy.wait_interval()) => {}
                }
            }
        }

        warn!(
            "Gave up polling scan {} after {} attempts",
            id, self.policy.max_attempts
        );
        Err(PollError::Timeout {
            attempts: self.policy.max_attempts,
        })
    }
}
