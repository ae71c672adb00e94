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

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::scanner::traits::{AuditRunner, RawAuditReport, ScannerError};

/// HTTP audit runner
///
/// Delegates the actual audit to an out-of-process audit service
/// (Lighthouse + rule checker behind one endpoint). The service accepts
/// `{"url": ...}` and answers with the combined raw report.
pub struct HttpAuditRunner {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAuditRunner {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ScannerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl AuditRunner for HttpAuditRunner {
    async fn run_audit(&self, url: &str) -> Result<RawAuditReport, ScannerError> {
        debug!("Dispatching audit for {} to {}", url, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await?
            .error_for_status()?;

        let report = response.json::<RawAuditReport>().await?;
        Ok(report)
    }

    fn name(&self) -> &str {
        "http_audit_runner"
    }
}
