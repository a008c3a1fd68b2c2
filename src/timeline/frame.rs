//! 动画帧
//!
//! 帧一旦生成即不可变。数据包与信号帧通过 `step_index` / `last_step_index`
//! 表达生命周期角色，节点更新帧没有生命周期。

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::event::{NodeId, PacketId, Rgb, SignalId};

/// 帧对渲染对象生命周期的作用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRole {
    Create,
    Update,
    Remove,
}

impl FrameRole {
    /// 第 0 帧创建，最后一帧移除，其余更新
    pub fn for_step(step_index: usize, last_step_index: usize) -> Self {
        if step_index == 0 {
            FrameRole::Create
        } else if step_index >= last_step_index {
            FrameRole::Remove
        } else {
            FrameRole::Update
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketFrame {
    pub packet_id: PacketId,
    pub time: f64,
    pub step_index: usize,
    pub last_step_index: usize,
    pub pos: DVec3,
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdateFrame {
    pub node_id: NodeId,
    pub time: f64,
    pub pos: Option<DVec3>,
    pub color: Option<Rgb>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastFrame {
    pub signal_id: SignalId,
    pub time: f64,
    pub step_index: usize,
    pub last_step_index: usize,
    pub pos: DVec3,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptionFrame {
    pub signal_id: SignalId,
    pub time: f64,
    pub step_index: usize,
    pub last_step_index: usize,
    /// 接收节点位置
    pub pos: DVec3,
    pub radius: f64,
    /// 广播节点位置（用于定向绘制）
    pub source: DVec3,
}

/// 一帧动画
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationFrame {
    Packet(PacketFrame),
    NodeUpdate(NodeUpdateFrame),
    Broadcast(BroadcastFrame),
    Reception(ReceptionFrame),
}

impl AnimationFrame {
    pub fn time(&self) -> f64 {
        match self {
            AnimationFrame::Packet(f) => f.time,
            AnimationFrame::NodeUpdate(f) => f.time,
            AnimationFrame::Broadcast(f) => f.time,
            AnimationFrame::Reception(f) => f.time,
        }
    }

    /// 节点更新帧返回 `None`
    pub fn role(&self) -> Option<FrameRole> {
        match self {
            AnimationFrame::Packet(f) => Some(FrameRole::for_step(f.step_index, f.last_step_index)),
            AnimationFrame::NodeUpdate(_) => None,
            AnimationFrame::Broadcast(f) => {
                Some(FrameRole::for_step(f.step_index, f.last_step_index))
            }
            AnimationFrame::Reception(f) => {
                Some(FrameRole::for_step(f.step_index, f.last_step_index))
            }
        }
    }

    pub fn step_index(&self) -> Option<usize> {
        match self {
            AnimationFrame::Packet(f) => Some(f.step_index),
            AnimationFrame::NodeUpdate(_) => None,
            AnimationFrame::Broadcast(f) => Some(f.step_index),
            AnimationFrame::Reception(f) => Some(f.step_index),
        }
    }
}
