// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 扫描客户端模块
///
/// 面向前端/调用方的客户端：
/// - poller：提交扫描并轮询至终态
/// - record：跨后端变体的记录标识符与状态归一化
pub mod poller;
pub mod record;
