// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 审计引擎模块
///
/// 对外部审计引擎的抽象与集成：
/// - traits：AuditRunner特质与原始报告类型
/// - http_runner：通过HTTP调用外部审计服务的实现
/// - normalize：原始报告到领域结果的归一化
pub mod http_runner;
pub mod normalize;
pub mod traits;
