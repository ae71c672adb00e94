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
use validator::Validate;

/// 扫描请求数据传输对象
///
/// 客户端在调用前负责将裸主机名补全为绝对URL
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScanRequestDto {
    /// 要扫描的目标URL
    #[validate(url(message = "url must be a valid absolute URL"))]
    pub url: String,
}

/// 报告列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// 返回数量上限
    pub limit: Option<u32>,
}

/// 批量删除扫描请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct DeleteScansRequestDto {
    /// 要删除的扫描ID列表
    #[validate(length(min = 1, message = "ids cannot be empty"))]
    pub ids: Vec<Uuid>,
}
