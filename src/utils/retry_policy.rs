// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// 轮询策略配置
///
/// 描述一次有界轮询的预算：最大尝试次数和固定的轮询间隔。
/// 可选的抖动用于避免多个客户端同步轮询。
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 轮询间隔
    pub interval: Duration,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_secs(3),
            jitter_factor: 0.1,
            enable_jitter: false,
        }
    }
}

impl PollPolicy {
    /// 是否还有剩余的尝试预算
    pub fn should_continue(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// 计算下一次轮询前的等待时间
    pub fn wait_interval(&self) -> Duration {
        if !self.enable_jitter {
            return self.interval;
        }

        let base = self.interval.as_secs_f64();
        let jitter_range = base * self.jitter_factor;
        let jitter = rand::random_range(-jitter_range..jitter_range);
        Duration::from_secs_f64((base + jitter).max(0.0))
    }
}

/// 轮询取消句柄
///
/// 克隆后可以跨任务传递，调用 `cancel` 后所有持有者都能观察到。
/// 轮询循环在每次等待时通过 `cancelled` 响应取消。
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// 请求取消
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// 等待取消信号
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
