//! tick 调度器
//!
//! 统一的周期回调抽象：开始、停止、调整周期。控制器只通过它驱动 tick，
//! 不依赖具体事件循环。

use std::thread;
use std::time::Duration;
use tracing::trace;

pub trait TickScheduler {
    fn start(&mut self, interval: Duration);

    fn stop(&mut self);

    /// 调整周期；未运行时只记录新周期
    fn reschedule(&mut self, interval: Duration);

    fn is_active(&self) -> bool;

    /// 等到下一次 tick 应当触发
    fn wait(&mut self);
}

/// 手动驱动的调度器：`wait` 立即返回，只记录状态。测试与单步调试使用。
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    active: bool,
    interval: Duration,
    pub starts: usize,
    pub stops: usize,
    pub reschedules: usize,
}

impl ManualTicker {
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl TickScheduler for ManualTicker {
    fn start(&mut self, interval: Duration) {
        self.active = true;
        self.interval = interval;
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.active {
            self.stops += 1;
        }
        self.active = false;
    }

    fn reschedule(&mut self, interval: Duration) {
        self.interval = interval;
        self.reschedules += 1;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn wait(&mut self) {}
}

/// 在当前线程上休眠等待下一次 tick
#[derive(Debug, Default, Clone)]
pub struct SleepTicker {
    active: bool,
    interval: Duration,
}

impl TickScheduler for SleepTicker {
    fn start(&mut self, interval: Duration) {
        self.active = true;
        self.interval = interval;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn reschedule(&mut self, interval: Duration) {
        self.interval = interval;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn wait(&mut self) {
        if !self.interval.is_zero() {
            trace!(interval = ?self.interval, "等待下一次 tick");
            thread::sleep(self.interval);
        }
    }
}
