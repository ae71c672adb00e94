// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 扫描记录实体
///
/// 表示针对单个URL的一次无障碍审计，是系统的核心实体。
/// 记录由编排器创建并独占修改，状态机为：
/// Pending → InProgress → Completed/Failed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// 扫描唯一标识符
    pub id: Uuid,
    /// 被扫描的目标URL，创建后不可变
    pub url: String,
    /// 扫描状态，跟踪扫描在其生命周期中的当前阶段
    pub status: ScanStatus,
    /// 创建时间，扫描提交的时间戳
    pub created_at: DateTime<Utc>,
    /// 完成时间，扫描进入终态的时间戳
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// 审计结果，仅当状态为Completed时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ScanResults>,
    /// 错误信息，仅当状态为Failed时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 扫描状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → InProgress → Completed/Failed
/// Completed 和 Failed 是终态，不允许再转换。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// 已接受，审计尚未开始
    #[default]
    Pending,
    /// 审计进行中
    InProgress,
    /// 审计成功完成
    Completed,
    /// 审计失败
    Failed,
}

impl ScanStatus {
    /// 判断是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanStatus::Pending => write!(f, "pending"),
            ScanStatus::InProgress => write!(f, "in_progress"),
            ScanStatus::Completed => write!(f, "completed"),
            ScanStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ScanStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScanStatus::Pending),
            "in_progress" => Ok(ScanStatus::InProgress),
            "completed" => Ok(ScanStatus::Completed),
            "failed" => Ok(ScanStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 规范化后的审计结果
///
/// 由审计引擎的原始输出归一化得到，总分和各分类指标均为 0-100。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResults {
    /// 总分 (0-100)，以无障碍得分为准
    pub score: u8,
    /// 各分类指标
    pub metrics: CategoryMetrics,
    /// 规则违规问题列表
    pub issues: Vec<Issue>,
    /// 按严重程度统计的问题数量，随报告一起下发
    #[serde(default)]
    pub issues_by_severity: SeverityCounts,
}

/// 分类指标，每项均为 0-100
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetrics {
    /// 性能得分
    pub performance: u8,
    /// 无障碍得分
    pub accessibility: u8,
    /// 最佳实践得分
    pub best_practices: u8,
    /// SEO得分
    pub seo: u8,
}

/// 单个无障碍问题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// 规则标识符，如 "color-contrast"
    pub id: String,
    /// 严重程度
    pub severity: IssueSeverity,
    /// 问题标题
    pub title: String,
    /// 问题描述
    pub description: String,
    /// 受影响的元素选择器列表
    #[serde(default)]
    pub affected_elements: Vec<String>,
    /// 对应的WCAG标准条目
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_criteria: Option<String>,
    /// 修复建议
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// 问题严重程度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// 严重，阻断性问题
    Critical,
    /// 重要
    Serious,
    /// 中等
    Moderate,
    /// 轻微
    Minor,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IssueSeverity::Critical => write!(f, "critical"),
            IssueSeverity::Serious => write!(f, "serious"),
            IssueSeverity::Moderate => write!(f, "moderate"),
            IssueSeverity::Minor => write!(f, "minor"),
        }
    }
}

impl FromStr for IssueSeverity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(IssueSeverity::Critical),
            "serious" => Ok(IssueSeverity::Serious),
            "moderate" => Ok(IssueSeverity::Moderate),
            "minor" => Ok(IssueSeverity::Minor),
            _ => Err(()),
        }
    }
}

/// 按严重程度的问题计数
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl SeverityCounts {
    /// 统计问题列表中各严重程度的数量
    pub fn tally(issues: &[Issue]) -> Self {
        let mut counts = SeverityCounts::default();
        for issue in issues {
            match issue.severity {
                IssueSeverity::Critical => counts.critical += 1,
                IssueSeverity::Serious => counts.serious += 1,
                IssueSeverity::Moderate => counts.moderate += 1,
                IssueSeverity::Minor => counts.minor += 1,
            }
        }
        counts
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当扫描状态转换不符合生命周期规则时发生
    #[error("Invalid state transition")]
    InvalidStateTransition,
}

impl ScanRecord {
    /// 创建一个新的扫描记录
    ///
    /// 新记录处于Pending状态，`results` 和 `error` 均为空。
    pub fn new(url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            status: ScanStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            results: None,
            error: None,
        }
    }

    /// 启动扫描
    ///
    /// 将状态从Pending变更为InProgress，在审计被派发时调用。
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            ScanStatus::Pending => {
                self.status = ScanStatus::InProgress;
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成扫描
    ///
    /// 将状态从InProgress变更为Completed并附加归一化结果。
    pub fn complete(mut self, results: ScanResults) -> Result<Self, DomainError> {
        match self.status {
            ScanStatus::InProgress => {
                self.status = ScanStatus::Completed;
                self.completed_at = Some(Utc::now());
                self.results = Some(results);
                self.error = None;
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记扫描失败
    ///
    /// Pending和InProgress都可以进入Failed；空消息使用通用回退文案。
    pub fn fail(mut self, message: String) -> Result<Self, DomainError> {
        match self.status {
            ScanStatus::Pending | ScanStatus::InProgress => {
                self.status = ScanStatus::Failed;
                self.completed_at = Some(Utc::now());
                self.results = None;
                self.error = Some(if message.trim().is_empty() {
                    "Audit failed for an unknown reason".to_string()
                } else {
                    message
                });
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 判断扫描是否处于终态
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
