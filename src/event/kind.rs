//! 网络事件类型
//!
//! 每种事件一个变体；时间轴构建器通过穷尽匹配分派。

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// 节点颜色（0–255）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// 节点状态变化：位置、颜色、描述均可单独出现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub node_id: NodeId,
    pub trigger_time: f64,
    pub loc: Option<DVec3>,
    pub color: Option<Rgb>,
    pub description: Option<String>,
}

/// 有线点对点传输
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WiredPacket {
    pub from_id: NodeId,
    pub to_id: NodeId,
    /// 首比特发送时间
    pub tx_time: f64,
    /// 首比特接收时间
    pub rx_time: f64,
    pub meta: String,
}

/// 无线广播发射
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broadcast {
    pub broadcaster_id: NodeId,
    /// 关联同一次广播的所有接收记录
    pub unique_id: u64,
    pub tx_time: f64,
    pub meta: String,
}

/// 无线广播在某个节点上的接收
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirelessReception {
    pub unique_id: u64,
    pub to_id: NodeId,
    /// 首比特接收时间
    pub rx_time: f64,
    /// 末比特接收时间（可选）
    pub last_rx_time: Option<f64>,
}

/// 分类后的网络事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkEvent {
    NodeUpdate(NodeUpdate),
    WiredPacket(WiredPacket),
    Broadcast(Broadcast),
    WirelessReception(WirelessReception),
}

impl NetworkEvent {
    /// 合并排序所用的触发时间
    pub fn trigger_time(&self) -> f64 {
        match self {
            NetworkEvent::NodeUpdate(nu) => nu.trigger_time,
            NetworkEvent::WiredPacket(p) => p.tx_time,
            NetworkEvent::Broadcast(b) => b.tx_time,
            NetworkEvent::WirelessReception(r) => r.rx_time,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NetworkEvent::NodeUpdate(_) => "node_update",
            NetworkEvent::WiredPacket(_) => "wired_packet",
            NetworkEvent::Broadcast(_) => "broadcast",
            NetworkEvent::WirelessReception(_) => "wireless_reception",
        }
    }
}
