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

use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::scan::{DomainError, ScanRecord};
use crate::domain::repositories::scan_repository::{RepositoryError, ScanRepository};
use crate::scanner::normalize::normalize_report;
use crate::scanner::traits::{AuditRunner, RawAuditReport};
use crate::utils::url_utils;

#[derive(Error, Debug)]
pub enum ScanUseCaseError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Scan not found")]
    NotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Scan orchestrator
///
/// Owns the full lifecycle of a scan: creates the record, dispatches the
/// audit runner as a background job, and is the single writer flipping
/// the record into its terminal state. Readers (pollers, history views)
/// go through `get_by_id` / `list_recent`.
pub struct ScanOrchestrator<R, A> {
    repo: Arc<R>,
    runner: Arc<A>,
    audit_timeout: Duration,
}

impl<R, A> Clone for ScanOrchestrator<R, A> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            runner: Arc::clone(&self.runner),
            audit_timeout: self.audit_timeout,
        }
    }
}

impl<R, A> ScanOrchestrator<R, A>
where
    R: ScanRepository + 'static,
    A: AuditRunner + 'static,
{
    pub fn new(repo: Arc<R>, runner: Arc<A>, audit_timeout: Duration) -> Self {
        Self {
            repo,
            runner,
            audit_timeout,
        }
    }

    /// Submit a new scan.
    ///
    /// Persists a `Pending` record, dispatches the audit in the
    /// background and returns immediately so the caller can start
    /// polling. The record moves to `InProgress` at dispatch time, not
    /// when the audit finishes.
    pub async fn submit(&self, url: &str) -> Result<ScanRecord, ScanUseCaseError> {
        url_utils::validate_scan_url(url)
            .map_err(|e| ScanUseCaseError::Validation(e.to_string()))?;

        let record = ScanRecord::new(url.to_string());
        let created = self.repo.create(&record).await?;
        info!("Scan {} accepted for {}", created.id, created.url);

        let this = self.clone();
        let job = created.clone();
        tokio::spawn(async move {
            if let Err(e) = this.run_audit_job(job).await {
                error!("Audit job aborted: {}", e);
            }
        });

        Ok(created)
    }

    #[instrument(skip(self, record), fields(scan_id = %record.id, url = %record.url))]
    async fn run_audit_job(&self, record: ScanRecord) -> Result<(), ScanUseCaseError> {
        let started = record.start()?;
        let started = self.repo.update(&started).await?;
        info!("Audit started");

        match tokio::time::timeout(self.audit_timeout, self.runner.run_audit(&started.url)).await {
            Ok(Ok(raw)) => {
                self.on_audit_complete(started.id, raw).await?;
            }
            Ok(Err(e)) => {
                self.on_audit_failed(started.id, e.to_string()).await?;
            }
            Err(_) => {
                // Server-side audit deadline expired.
                self.on_audit_failed(
                    started.id,
                    format!("audit timed out after {}s", self.audit_timeout.as_secs()),
                )
                .await?;
            }
        }

        Ok(())
    }

    /// Audit runner completion callback.
    ///
    /// Normalizes the raw report and flips the record to `Completed`.
    /// A report that fails normalization is a runner failure, not a
    /// separate error class.
    pub async fn on_audit_complete(
        &self,
        id: Uuid,
        raw: RawAuditReport,
    ) -> Result<ScanRecord, ScanUseCaseError> {
        let results = match normalize_report(&raw) {
            Ok(results) => results,
            Err(e) => {
                warn!("Scan {} produced a malformed report: {}", id, e);
                return self.on_audit_failed(id, e.to_string()).await;
            }
        };

        let record = self.require(id).await?;
        let completed = record.complete(results)?;
        let completed = self.repo.update(&completed).await?;
        let score = completed.results.as_ref().map(|r| r.score).unwrap_or(0);
        info!("Scan {} completed with score {}", id, score);
        Ok(completed)
    }

    /// Audit runner failure callback. Terminal; the orchestrator does
    /// not retry, retry policy belongs to the caller.
    pub async fn on_audit_failed(
        &self,
        id: Uuid,
        message: String,
    ) -> Result<ScanRecord, ScanUseCaseError> {
        let record = self.require(id).await?;
        let failed = record.fail(message)?;
        let failed = self.repo.update(&failed).await?;
        warn!(
            "Scan {} failed: {}",
            id,
            failed.error.as_deref().unwrap_or("unknown")
        );
        Ok(failed)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ScanRecord, ScanUseCaseError> {
        self.require(id).await
    }

    /// Bounded snapshot of the most recent scans, newest first.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<ScanRecord>, ScanUseCaseError> {
        Ok(self.repo.list_recent(limit).await?)
    }

    /// Bulk delete with per-id outcomes.
    pub async fn delete_many(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<(Vec<Uuid>, Vec<(Uuid, String)>), ScanUseCaseError> {
        let (deleted, failed) = self.repo.delete_many(ids).await?;
        if !failed.is_empty() {
            warn!(
                "Bulk delete: {} removed, {} failed",
                deleted.len(),
                failed.len()
            );
        }
        Ok((deleted, failed))
    }

    async fn require(&self, id: Uuid) -> Result<ScanRecord, ScanUseCaseError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ScanUseCaseError::NotFound)
    }
}
