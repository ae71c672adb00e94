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
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::models::scan::ScanRecord;
use crate::domain::repositories::scan_repository::{RepositoryError, ScanRepository};

/// In-memory scan repository backed by a concurrent map.
///
/// The orchestrator is the only writer per record; concurrent readers
/// see whole records, never partial updates, because update replaces
/// the entry in one shot.
pub struct MemoryScanRepository {
    records: DashMap<Uuid, ScanRecord>,
}

impl MemoryScanRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for MemoryScanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanRepository for MemoryScanRepository {
    async fn create(&self, record: &ScanRecord) -> Result<ScanRecord, RepositoryError> {
        if self.records.contains_key(&record.id) {
            return Err(RepositoryError::Storage(format!(
                "duplicate scan id {}",
                record.id
            )));
        }
        self.records.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScanRecord>, RepositoryError> {
        Ok(self.records.get(&id).map(|entry| entry.clone()))
    }

    async fn update(&self, record: &ScanRecord) -> Result<ScanRecord, RepositoryError> {
        if !self.records.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        self.records.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ScanRecord>, RepositoryError> {
        let mut records: Vec<ScanRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn delete_many(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<(Vec<Uuid>, Vec<(Uuid, String)>), RepositoryError> {
        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        for id in ids {
            if self.records.remove(&id).is_some() {
                deleted.push(id);
            } else {
                failed.push((id, "Record not found".to_string()));
            }
        }

        Ok((deleted, failed))
    }
}
