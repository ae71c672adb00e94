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
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 审计引擎错误类型
///
/// 任何一种错误都会把扫描标记为失败，编排器不做重试。
#[derive(Error, Debug)]
pub enum ScannerError {
    /// 请求失败
    #[error("Audit request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 原始报告格式错误
    #[error("Malformed audit report: {0}")]
    MalformedReport(String),
    /// 其他错误
    #[error("Audit error: {0}")]
    Other(String),
}

/// 审计引擎的原始输出
///
/// 两个子审计（性能/SEO评分与DOM规则检查）合并后的结果，
/// 各项得分均为0-100。字段缺失或越界由归一化阶段处理。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuditReport {
    /// 性能得分
    pub performance_score: Option<i64>,
    /// 无障碍得分
    pub accessibility_score: Option<i64>,
    /// 最佳实践得分
    pub best_practices_score: Option<i64>,
    /// SEO得分
    pub seo_score: Option<i64>,
    /// 规则违规列表
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

/// 审计引擎报告的单个规则违规
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    /// 规则标识符
    pub id: String,
    /// 严重程度 (critical/serious/moderate/minor)
    pub impact: Option<String>,
    /// 问题标题
    pub title: Option<String>,
    /// 问题描述
    pub description: Option<String>,
    /// 受影响的元素选择器
    #[serde(default)]
    pub affected_elements: Vec<String>,
    /// WCAG标准条目
    pub wcag_criteria: Option<String>,
    /// 修复建议
    pub recommendation: Option<String>,
}

/// 审计引擎特质
///
/// 对外部审计引擎的抽象：输入URL，输出合并的原始报告。
/// 单次调用，引擎内部不做重试。
#[async_trait]
pub trait AuditRunner: Send + Sync {
    /// 对目标URL执行一次完整审计
    async fn run_audit(&self, url: &str) -> Result<RawAuditReport, ScannerError>;

    /// 获取引擎名称
    fn name(&self) -> &str;
}
