// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体：
/// - 扫描记录（scan）：一次URL无障碍审计及其状态机、
///   归一化结果和问题列表
///
/// 这些模型构成了系统的数据基础，定义了业务概念的
/// 结构和行为。
pub mod scan;
