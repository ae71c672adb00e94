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

use std::str::FromStr;

use crate::domain::models::scan::{
    CategoryMetrics, Issue, IssueSeverity, ScanResults, SeverityCounts,
};
use crate::scanner::traits::{RawAuditReport, RawIssue, ScannerError};

/// Normalize a raw runner report into `ScanResults`.
///
/// The accessibility score doubles as the primary `score`. Missing or
/// out-of-range score fields make the whole report malformed; the
/// orchestrator treats that as a runner failure.
pub fn normalize_report(raw: &RawAuditReport) -> Result<ScanResults, ScannerError> {
    let metrics = CategoryMetrics {
        performance: score_field("performanceScore", raw.performance_score)?,
        accessibility: score_field("accessibilityScore", raw.accessibility_score)?,
        best_practices: score_field("bestPracticesScore", raw.best_practices_score)?,
        seo: score_field("seoScore", raw.seo_score)?,
    };

    let issues = raw
        .issues
        .iter()
        .map(normalize_issue)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScanResults {
        score: metrics.accessibility,
        metrics,
        issues_by_severity: SeverityCounts::tally(&issues),
        issues,
    })
}

fn score_field(name: &str, value: Option<i64>) -> Result<u8, ScannerError> {
    let value = value
        .ok_or_else(|| ScannerError::MalformedReport(format!("missing score field {}", name)))?;

    if !(0..=100).contains(&value) {
        return Err(ScannerError::MalformedReport(format!(
            "score field {} out of range: {}",
            name, value
        )));
    }

    Ok(value as u8)
}

fn normalize_issue(raw: &RawIssue) -> Result<Issue, ScannerError> {
    let severity = match raw.impact.as_deref() {
        // Rule checkers occasionally omit the impact field entirely
        None => IssueSeverity::Minor,
        Some(impact) => IssueSeverity::from_str(impact).map_err(|_| {
            ScannerError::MalformedReport(format!(
                "unknown issue severity '{}' on rule {}",
                impact, raw.id
            ))
        })?,
    };

    Ok(Issue {
        id: raw.id.clone(),
        severity,
        title: raw
            .title
            .clone()
            .unwrap_or_else(|| title_from_rule_id(&raw.id)),
        description: raw.description.clone().unwrap_or_default(),
        affected_elements: raw.affected_elements.clone(),
        wcag_criteria: raw.wcag_criteria.clone(),
        recommendation: raw.recommendation.clone(),
    })
}

/// "color-contrast" → "Color Contrast"
fn title_from_rule_id(id: &str) -> String {
    id.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
