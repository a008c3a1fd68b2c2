//! 配置
//!
//! 时间轴构建参数与回放参数。全部字段都有默认值，可从 JSON 文件加载，
//! 二进制工具再用命令行参数覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::error::Error;

/// 每种事件的帧数
pub const DEFAULT_PACKET_STEPS: usize = 20;
pub const DEFAULT_BROADCAST_STEPS: usize = 4;
pub const DEFAULT_RECEPTION_STEPS: usize = 4;
/// 信号半径随步数增长的系数
pub const DEFAULT_RADIUS_STEP: f64 = 5.0;
/// 没有任何接收记录时广播动画的持续时间
pub const DEFAULT_FALLBACK_BROADCAST_DURATION: f64 = 1e-5;

/// 结构性配置错误：构建前即失败
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{kind} needs at least 2 frames per event, got {steps}")]
    TooFewSteps { kind: &'static str, steps: usize },

    #[error("fallback broadcast duration must be finite and non-negative, got {0}")]
    InvalidFallbackDuration(f64),

    #[error("radius step must be finite and non-negative, got {0}")]
    InvalidRadiusStep(f64),
}

/// 时间轴构建参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub packet_steps: usize,
    pub broadcast_steps: usize,
    pub reception_steps: usize,
    pub radius_step: f64,
    pub fallback_broadcast_duration: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            packet_steps: DEFAULT_PACKET_STEPS,
            broadcast_steps: DEFAULT_BROADCAST_STEPS,
            reception_steps: DEFAULT_RECEPTION_STEPS,
            radius_step: DEFAULT_RADIUS_STEP,
            fallback_broadcast_duration: DEFAULT_FALLBACK_BROADCAST_DURATION,
        }
    }
}

impl TimelineConfig {
    /// 插值比例 `i / (K - 1)` 要求每种事件至少 2 帧
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, steps) in [
            ("wired_packet", self.packet_steps),
            ("broadcast", self.broadcast_steps),
            ("wireless_reception", self.reception_steps),
        ] {
            if steps < 2 {
                return Err(ConfigError::TooFewSteps { kind, steps });
            }
        }
        let d = self.fallback_broadcast_duration;
        if !d.is_finite() || d < 0.0 {
            return Err(ConfigError::InvalidFallbackDuration(d));
        }
        if !self.radius_step.is_finite() || self.radius_step < 0.0 {
            return Err(ConfigError::InvalidRadiusStep(self.radius_step));
        }
        Ok(())
    }
}

/// 回放参数（运行时可随时调整）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// 两次 tick 之间的间隔（毫秒）
    pub delay_ms: u64,
    /// 每次 tick 最多应用的帧数
    pub steps_per_tick: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            steps_per_tick: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    pub timeline: TimelineConfig,
    pub playback: PlaybackConfig,
}

impl AnimConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: AnimConfig = serde_json::from_str(&raw)?;
        cfg.timeline.validate()?;
        Ok(cfg)
    }
}
