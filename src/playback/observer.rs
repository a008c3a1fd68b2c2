//! 进度观察者

use tracing::{debug, info};

/// 进度回调：每个 tick 一次，加载/重置/跳转时各一次
pub trait ProgressObserver {
    fn on_progress(&mut self, left: &str, right: &str, cursor: usize, total: usize);

    /// 加载时调用一次，用于配置进度条范围
    fn on_total(&mut self, _total: usize) {}
}

/// 什么也不做
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&mut self, _left: &str, _right: &str, _cursor: usize, _total: usize) {}
}

/// 把进度写进日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_progress(&mut self, left: &str, right: &str, cursor: usize, total: usize) {
        debug!(cursor, total, "{left} | {right}");
    }

    fn on_total(&mut self, total: usize) {
        info!(total, "进度范围已设置");
    }
}
