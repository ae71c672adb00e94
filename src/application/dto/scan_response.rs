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

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::scan::ScanStatus;

/// 扫描提交响应
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponseDto {
    /// 新建扫描的标识符，客户端凭此轮询
    pub id: Uuid,
    /// 被扫描的URL
    pub url: String,
    /// 提交时的状态
    pub status: ScanStatus,
}

/// 批量删除响应
///
/// 部分失败不会被折叠成整体成功，逐条上报结果
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScansResponseDto {
    /// 成功删除的扫描ID
    pub deleted: Vec<Uuid>,
    /// 删除失败的扫描及原因
    pub failed: Vec<FailedDeleteDto>,
    /// 成功数量
    pub total_deleted: u64,
    /// 失败数量
    pub total_failed: u64,
}

/// 单条删除失败信息
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDeleteDto {
    pub id: Uuid,
    pub reason: String,
}
