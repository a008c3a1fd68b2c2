//! 内存渲染端
//!
//! 用显式的 id -> 句柄表维护场景，供无界面回放与测试使用。
//! 对不存在对象的移动/移除只计数，不报错。

use glam::DVec3;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use super::sink::{RenderSink, SignalShape};
use crate::event::{NodeId, PacketId, Rgb, SignalId};

#[derive(Debug, Clone, PartialEq)]
pub struct NodeHandle {
    pub pos: DVec3,
    pub color: Option<Rgb>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketHandle {
    pub pos: DVec3,
    pub moves: u32,
}

/// 渲染调用计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub packets_created: u64,
    pub packets_removed: u64,
    pub signals_created: u64,
    pub signals_removed: u64,
    pub node_updates: u64,
    pub clears: u64,
    pub flushes: u64,
    /// 指向不存在对象的调用
    pub ignored: u64,
}

/// 某一时刻的场景内容（不含计数）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub nodes: BTreeMap<NodeId, NodeHandle>,
    pub packets: BTreeMap<PacketId, PacketHandle>,
    pub signals: BTreeMap<SignalId, SignalShape>,
}

#[derive(Debug, Default)]
pub struct MemorySink {
    scene: SceneSnapshot,
    pub stats: SinkStats,
}

impl MemorySink {
    pub fn scene(&self) -> &SceneSnapshot {
        &self.scene
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeHandle> {
        self.scene.nodes.get(&id)
    }

    pub fn packet(&self, id: PacketId) -> Option<&PacketHandle> {
        self.scene.packets.get(&id)
    }

    pub fn signal(&self, id: SignalId) -> Option<&SignalShape> {
        self.scene.signals.get(&id)
    }

    pub fn live_packets(&self) -> usize {
        self.scene.packets.len()
    }

    pub fn live_signals(&self) -> usize {
        self.scene.signals.len()
    }

    fn ignore(&mut self, what: &str) {
        debug!(what, "对象不存在，忽略渲染调用");
        self.stats.ignored += 1;
    }
}

impl RenderSink for MemorySink {
    fn create_node(&mut self, id: NodeId, pos: DVec3, description: &str) {
        self.scene.nodes.insert(
            id,
            NodeHandle {
                pos,
                color: None,
                description: description.to_string(),
            },
        );
    }

    fn update_node(
        &mut self,
        id: NodeId,
        pos: Option<DVec3>,
        color: Option<Rgb>,
        description: Option<&str>,
    ) {
        let Some(node) = self.scene.nodes.get_mut(&id) else {
            self.ignore("node");
            return;
        };
        if let Some(pos) = pos {
            node.pos = pos;
        }
        if color.is_some() {
            node.color = color;
        }
        if let Some(descr) = description {
            node.description = descr.to_string();
        }
        self.stats.node_updates += 1;
    }

    fn create_packet(&mut self, id: PacketId, pos: DVec3) {
        trace!(%id, ?pos, "创建数据包");
        self.scene.packets.insert(id, PacketHandle { pos, moves: 0 });
        self.stats.packets_created += 1;
    }

    fn move_packet(&mut self, id: PacketId, pos: DVec3) {
        match self.scene.packets.get_mut(&id) {
            Some(pkt) => {
                pkt.pos = pos;
                pkt.moves += 1;
            }
            None => self.ignore("packet"),
        }
    }

    fn remove_packet(&mut self, id: PacketId) {
        if self.scene.packets.remove(&id).is_some() {
            trace!(%id, "移除数据包");
            self.stats.packets_removed += 1;
        } else {
            self.ignore("packet");
        }
    }

    fn create_signal(&mut self, id: SignalId, shape: &SignalShape) {
        self.scene.signals.insert(id, *shape);
        self.stats.signals_created += 1;
    }

    fn update_signal(&mut self, id: SignalId, shape: &SignalShape) {
        match self.scene.signals.get_mut(&id) {
            Some(s) => *s = *shape,
            None => self.ignore("signal"),
        }
    }

    fn remove_signal(&mut self, id: SignalId) {
        if self.scene.signals.remove(&id).is_some() {
            self.stats.signals_removed += 1;
        } else {
            self.ignore("signal");
        }
    }

    fn clear(&mut self) {
        self.scene = SceneSnapshot::default();
        self.stats.clears += 1;
    }

    fn flush(&mut self) {
        self.stats.flushes += 1;
    }
}
