//! 回放状态

use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;

/// 控制器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    #[default]
    Unloaded,
    Ready,
    Running,
    Paused,
    Finished,
}

/// 回放状态：只由 [`PlaybackController`](super::PlaybackController) 修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    /// 下一帧的下标（0..=total）
    pub cursor: usize,
    pub total: usize,
    pub paused: bool,
    pub finished: bool,
    pub delay_ms: u64,
    pub steps_per_tick: usize,
}

impl PlaybackState {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            phase: PlaybackPhase::Unloaded,
            cursor: 0,
            total: 0,
            paused: false,
            finished: false,
            delay_ms: config.delay_ms,
            steps_per_tick: config.steps_per_tick.max(1),
        }
    }

    /// 加载新时间轴：回到起点，回放参数保留
    pub(crate) fn reload(&mut self, total: usize) {
        self.phase = PlaybackPhase::Ready;
        self.cursor = 0;
        self.total = total;
        self.paused = false;
        self.finished = false;
    }

    pub(crate) fn set_phase(&mut self, phase: PlaybackPhase) {
        self.phase = phase;
        self.paused = phase == PlaybackPhase::Paused;
        self.finished = phase == PlaybackPhase::Finished;
    }
}
