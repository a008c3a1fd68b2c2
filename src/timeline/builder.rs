//! 时间轴构建器
//!
//! 按触发时间合并全部事件，单遍顺序遍历：节点更新先修改快照表再出帧，
//! 数据包与信号按当时的快照插值生成固定数量的帧，最后对全部帧做稳定排序。

use glam::DVec3;
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

use super::error::ReferenceError;
use super::frame::{
    AnimationFrame, BroadcastFrame, NodeUpdateFrame, PacketFrame, ReceptionFrame,
};
use super::node_table::NodeTable;
use super::sequence::{Timeline, time_order};
use crate::config::{ConfigError, TimelineConfig};
use crate::event::{
    Broadcast, ExtractionError, NetworkEvent, NodeId, NodeUpdate, PacketId, SignalId,
    TopologyNode, TraceFile, WiredPacket, WirelessReception, extract,
};

/// 一次构建的结果
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub timeline: Timeline,
    /// 提取阶段丢弃的记录（只有 [`TimelineBuilder::build_trace`] 会填充）
    pub extraction_errors: Vec<ExtractionError>,
    /// 构建阶段丢弃的事件
    pub reference_errors: Vec<ReferenceError>,
    /// 被跳过的自发自收数据包（不算错误）
    pub self_addressed: usize,
}

impl BuildReport {
    pub fn dropped(&self) -> usize {
        self.extraction_errors.len() + self.reference_errors.len()
    }
}

/// 时间轴构建器：配置在构造时校验，之后的构建只会按事件容错
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    config: TimelineConfig,
}

impl TimelineBuilder {
    pub fn new(config: TimelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// 提取原始记录后构建
    pub fn build_trace(&self, trace: &TraceFile) -> BuildReport {
        let (events, extraction_errors) = extract(&trace.records);
        let mut report = self.build(&trace.nodes, &events);
        report.extraction_errors = extraction_errors;
        report
    }

    /// 由拓扑与事件构建时间轴。相同输入（包括同时间事件的先后）得到相同输出。
    #[tracing::instrument(skip_all, fields(nodes = topology.len(), events = events.len()))]
    pub fn build(&self, topology: &[TopologyNode], events: &[NetworkEvent]) -> BuildReport {
        let table = NodeTable::from_topology(topology);
        let initial_nodes = table.iter().cloned().collect::<Vec<_>>();

        let mut pass = BuildPass::new(&self.config, table, events);

        // 稳定排序：同一时间的事件保持输入顺序
        let mut merged = events.iter().collect::<Vec<_>>();
        merged.sort_by(|a, b| time_order(a.trigger_time(), b.trigger_time()));

        for ev in merged {
            pass.process(ev);
        }

        let BuildPass {
            frames,
            errors,
            self_addressed,
            next_packet,
            next_signal,
            ..
        } = pass;

        let timeline = Timeline::new(initial_nodes, frames);

        if errors.is_empty() {
            info!(
                frames = timeline.len(),
                packets = next_packet,
                signals = next_signal,
                self_addressed,
                "🧵 时间轴构建完成"
            );
        } else {
            warn!(
                frames = timeline.len(),
                packets = next_packet,
                signals = next_signal,
                self_addressed,
                dropped = errors.len(),
                "🧵 时间轴构建完成，部分事件被丢弃"
            );
        }

        BuildReport {
            timeline,
            extraction_errors: Vec::new(),
            reference_errors: errors,
            self_addressed,
        }
    }
}

/// 单次构建的可变状态
struct BuildPass<'a> {
    config: &'a TimelineConfig,
    table: NodeTable,
    /// 预扫描：每个广播 uId 的最晚接收时间
    latest_rx: HashMap<u64, f64>,
    /// 已处理的广播：uId -> 广播节点位置
    sources: HashMap<u64, DVec3>,
    next_packet: u64,
    next_signal: u64,
    frames: Vec<AnimationFrame>,
    errors: Vec<ReferenceError>,
    self_addressed: usize,
}

impl<'a> BuildPass<'a> {
    fn new(config: &'a TimelineConfig, table: NodeTable, events: &[NetworkEvent]) -> Self {
        let mut latest_rx: HashMap<u64, f64> = HashMap::new();
        for ev in events {
            if let NetworkEvent::WirelessReception(r) = ev {
                latest_rx
                    .entry(r.unique_id)
                    .and_modify(|t| *t = t.max(r.rx_time))
                    .or_insert(r.rx_time);
            }
        }

        Self {
            config,
            table,
            latest_rx,
            sources: HashMap::new(),
            next_packet: 0,
            next_signal: 0,
            frames: Vec::new(),
            errors: Vec::new(),
            self_addressed: 0,
        }
    }

    fn process(&mut self, ev: &NetworkEvent) {
        trace!(kind = ev.kind_name(), t = ev.trigger_time(), "处理事件");
        match ev {
            NetworkEvent::NodeUpdate(nu) => self.node_update(nu),
            NetworkEvent::WiredPacket(p) => self.wired_packet(p),
            NetworkEvent::Broadcast(b) => self.broadcast(b),
            NetworkEvent::WirelessReception(r) => self.reception(r),
        }
    }

    fn reject(&mut self, err: ReferenceError) {
        warn!(%err, "丢弃事件");
        self.errors.push(err);
    }

    fn locate(
        &mut self,
        node: NodeId,
        kind: &'static str,
        role: &'static str,
        time: f64,
    ) -> Option<DVec3> {
        let pos = self.table.position(node);
        if pos.is_none() {
            self.reject(ReferenceError::UnknownNode {
                kind,
                role,
                node,
                time,
            });
        }
        pos
    }

    fn node_update(&mut self, nu: &NodeUpdate) {
        // 先改快照，后续事件才能看到新位置
        if !self.table.apply(nu) {
            self.reject(ReferenceError::UnknownNode {
                kind: "node_update",
                role: "updated",
                node: nu.node_id,
                time: nu.trigger_time,
            });
            return;
        }
        self.frames.push(AnimationFrame::NodeUpdate(NodeUpdateFrame {
            node_id: nu.node_id,
            time: nu.trigger_time,
            pos: nu.loc,
            color: nu.color,
            description: nu.description.clone(),
        }));
    }

    fn wired_packet(&mut self, p: &WiredPacket) {
        if p.from_id == p.to_id {
            debug!(node = %p.from_id, t = p.tx_time, "跳过自发自收的数据包");
            self.self_addressed += 1;
            return;
        }
        let Some(from) = self.locate(p.from_id, "wired_packet", "from", p.tx_time) else {
            return;
        };
        let Some(to) = self.locate(p.to_id, "wired_packet", "to", p.tx_time) else {
            return;
        };

        let packet_id = PacketId(self.next_packet);
        self.next_packet += 1;

        let steps = self.config.packet_steps;
        let times = spaced_times(p.tx_time, p.rx_time, steps);
        for (step, time) in times.into_iter().enumerate() {
            self.frames.push(AnimationFrame::Packet(PacketFrame {
                packet_id,
                time,
                step_index: step,
                last_step_index: steps - 1,
                pos: lerp3(from, to, fraction(step, steps)),
                meta: p.meta.clone(),
            }));
        }
        debug!(%packet_id, from = %p.from_id, to = %p.to_id, steps, "生成数据包帧");
    }

    fn broadcast(&mut self, b: &Broadcast) {
        let Some(center) = self.locate(b.broadcaster_id, "broadcast", "broadcaster", b.tx_time)
        else {
            return;
        };

        let end = self
            .latest_rx
            .get(&b.unique_id)
            .copied()
            .unwrap_or(b.tx_time + self.config.fallback_broadcast_duration)
            .max(b.tx_time);

        if self.sources.insert(b.unique_id, center).is_some() {
            warn!(unique_id = b.unique_id, "广播 uId 重复，后出现的广播覆盖前者");
        }

        let signal_id = self.alloc_signal();
        let steps = self.config.broadcast_steps;
        for (step, time) in spaced_times(b.tx_time, end, steps).into_iter().enumerate() {
            self.frames.push(AnimationFrame::Broadcast(BroadcastFrame {
                signal_id,
                time,
                step_index: step,
                last_step_index: steps - 1,
                pos: center,
                radius: self.config.radius_step * step as f64,
            }));
        }
        debug!(%signal_id, unique_id = b.unique_id, end, "生成广播帧");
    }

    fn reception(&mut self, r: &WirelessReception) {
        // 广播必须已在本次遍历中处理过，不对输入顺序做隐式假设
        let Some(source) = self.sources.get(&r.unique_id).copied() else {
            self.reject(ReferenceError::UnresolvedBroadcast {
                unique_id: r.unique_id,
                to: r.to_id,
                time: r.rx_time,
            });
            return;
        };
        let Some(pos) = self.locate(r.to_id, "wireless_reception", "to", r.rx_time) else {
            return;
        };

        let end = r
            .last_rx_time
            .unwrap_or(r.rx_time + self.config.fallback_broadcast_duration);

        let signal_id = self.alloc_signal();
        let steps = self.config.reception_steps;
        for (step, time) in spaced_times(r.rx_time, end, steps).into_iter().enumerate() {
            self.frames.push(AnimationFrame::Reception(ReceptionFrame {
                signal_id,
                time,
                step_index: step,
                last_step_index: steps - 1,
                pos,
                radius: self.config.radius_step * step as f64,
                source,
            }));
        }
        debug!(%signal_id, unique_id = r.unique_id, to = %r.to_id, "生成接收帧");
    }

    fn alloc_signal(&mut self) -> SignalId {
        let id = SignalId(self.next_signal);
        self.next_signal += 1;
        id
    }
}

/// 第 `step` 帧的插值比例；`steps` 已由配置校验保证不小于 2
fn fraction(step: usize, steps: usize) -> f64 {
    if steps < 2 {
        return 1.0;
    }
    step as f64 / (steps - 1) as f64
}

/// 端点精确：比例为 0 时得到 `a`，为 1 时得到 `b`
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

fn lerp3(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    a * (1.0 - t) + b * t
}

/// `[start, end]` 上等距的 `steps` 个时间点。
///
/// 结果单调不减：舍入误差不能让同一对象的后一步排到前一步之前。
fn spaced_times(start: f64, end: f64, steps: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(steps);
    let mut prev = start;
    for step in 0..steps {
        let t = lerp(start, end, fraction(step, steps)).max(prev);
        out.push(t);
        prev = t;
    }
    out
}
