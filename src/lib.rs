// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含应用程序的核心业务逻辑和用例
pub mod application;

/// 扫描客户端模块
///
/// 提交扫描并轮询至终态的客户端实现
pub mod client;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体和仓库接口
pub mod domain;

/// 基础设施模块
///
/// 提供仓库接口的具体实现
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和错误映射
pub mod presentation;

/// 审计引擎模块
///
/// 外部审计引擎的抽象、HTTP实现与报告归一化
pub mod scanner;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
