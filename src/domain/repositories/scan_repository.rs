// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan::ScanRecord;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 存储错误
    #[error("Storage error: {0}")]
    Storage(String),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 扫描仓库特质
///
/// 定义扫描记录的数据访问接口。编排器是唯一的写入方，
/// 读取（轮询、历史列表）不受限制。
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// 创建新扫描记录
    async fn create(&self, record: &ScanRecord) -> Result<ScanRecord, RepositoryError>;
    /// 根据ID查找扫描记录
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScanRecord>, RepositoryError>;
    /// 更新扫描记录，记录必须已存在
    async fn update(&self, record: &ScanRecord) -> Result<ScanRecord, RepositoryError>;
    /// 按创建时间倒序列出最近的扫描记录
    async fn list_recent(&self, limit: u32) -> Result<Vec<ScanRecord>, RepositoryError>;
    /// 批量删除扫描记录
    ///
    /// 返回成功删除的ID列表和失败的 (ID, 原因) 列表
    async fn delete_many(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<(Vec<Uuid>, Vec<(Uuid, String)>), RepositoryError>;
}
