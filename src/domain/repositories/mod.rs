// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义数据持久化抽象接口，具体实现位于infrastructure层
pub mod scan_repository;
