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

use serde_json::{json, Value};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::scan::{ScanRecord, ScanStatus};

/// Identifier field names seen across backend and store variants.
const ID_ALIASES: [&str; 3] = ["id", "_id", "scanId"];

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record has no recognizable identifier")]
    MissingIdentifier,
    #[error("Record identifier is not a valid UUID: {0}")]
    InvalidIdentifier(String),
    #[error("Record has no interpretable status")]
    MissingStatus,
    #[error("Unknown status value: {0}")]
    UnknownStatus(String),
    #[error("Record is not a JSON object")]
    NotAnObject,
    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Resolve the identifier of a fetched record, whichever alias the
/// backend used. A record without any known identifier field is
/// malformed, never silently skipped.
pub fn identifier_of(record: &Value) -> Result<Uuid, RecordError> {
    let raw = ID_ALIASES
        .iter()
        .find_map(|alias| record.get(alias).and_then(Value::as_str))
        .ok_or(RecordError::MissingIdentifier)?;

    Uuid::parse_str(raw).map_err(|_| RecordError::InvalidIdentifier(raw.to_string()))
}

/// Resolve the status of a fetched record.
///
/// An explicit status field always wins. Older records may omit it; a
/// record carrying results is completed, anything else is surfaced as
/// malformed rather than polled forever.
pub fn status_of(record: &Value) -> Result<ScanStatus, RecordError> {
    if let Some(raw) = record.get("status").and_then(Value::as_str) {
        return ScanStatus::from_str(raw).map_err(|_| RecordError::UnknownStatus(raw.to_string()));
    }

    let has_results = record.get("results").is_some_and(|r| !r.is_null());
    if has_results {
        Ok(ScanStatus::Completed)
    } else {
        Err(RecordError::MissingStatus)
    }
}

/// Parse a raw store record into a `ScanRecord`, normalizing the
/// identifier and status fields first.
pub fn parse_record(value: &Value) -> Result<ScanRecord, RecordError> {
    let id = identifier_of(value)?;
    let status = status_of(value)?;

    let mut normalized = value.clone();
    let object = normalized.as_object_mut().ok_or(RecordError::NotAnObject)?;
    for alias in ID_ALIASES.iter().skip(1) {
        object.remove(*alias);
    }
    object.insert("id".to_string(), json!(id));
    object.insert("status".to_string(), json!(status));

    serde_json::from_value(normalized).map_err(|e| RecordError::Malformed(e.to_string()))
}
