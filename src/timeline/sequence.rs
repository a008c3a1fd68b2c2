//! 时间轴

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::frame::AnimationFrame;
use super::node_table::NodeState;

/// 时间比较：`-0.0` 与 `0.0` 视为相等，保证稳定排序下同一时刻保持先后
pub(crate) fn time_order(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// 按时间非递减排列的动画帧序列，附带构建前的初始节点快照。
///
/// 同一时间的帧保持生成顺序（稳定排序），因此同一合成 id 的帧按 `step_index` 递增出现。
///
/// 反序列化同样经过 [`Timeline::new`]，外部文件中乱序的帧会被重新排序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TimelineParts")]
pub struct Timeline {
    nodes: Vec<NodeState>,
    frames: Vec<AnimationFrame>,
}

#[derive(Deserialize)]
struct TimelineParts {
    #[serde(default)]
    nodes: Vec<NodeState>,
    #[serde(default)]
    frames: Vec<AnimationFrame>,
}

impl From<TimelineParts> for Timeline {
    fn from(parts: TimelineParts) -> Self {
        Timeline::new(parts.nodes, parts.frames)
    }
}

impl Timeline {
    /// 以稳定排序整理帧后构造时间轴
    pub fn new(nodes: Vec<NodeState>, mut frames: Vec<AnimationFrame>) -> Self {
        frames.sort_by(|a, b| time_order(a.time(), b.time()));
        Self { nodes, frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<&AnimationFrame> {
        self.frames.get(index)
    }

    /// 回放开始前应创建的节点
    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    pub fn start_time(&self) -> Option<f64> {
        self.frames.first().map(AnimationFrame::time)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.frames.last().map(AnimationFrame::time)
    }
}
