//! 渲染端接口与逐帧效果

use glam::DVec3;
use tracing::trace;

use crate::event::{NodeId, PacketId, Rgb, SignalId};
use crate::timeline::{AnimationFrame, FrameRole};

/// 信号（广播/接收波纹）的几何参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalShape {
    pub center: DVec3,
    pub radius: f64,
    /// 朝向广播源的单位向量（仅接收信号）
    pub direction: Option<DVec3>,
    pub normal: Option<DVec3>,
}

/// 渲染端：按合成 id 创建、更新、移除对象。
///
/// 每帧一次调用；`flush` 每个 tick 只调用一次。
pub trait RenderSink {
    fn create_node(&mut self, id: NodeId, pos: DVec3, description: &str);

    fn update_node(
        &mut self,
        id: NodeId,
        pos: Option<DVec3>,
        color: Option<Rgb>,
        description: Option<&str>,
    );

    fn create_packet(&mut self, id: PacketId, pos: DVec3);

    fn move_packet(&mut self, id: PacketId, pos: DVec3);

    fn remove_packet(&mut self, id: PacketId);

    fn create_signal(&mut self, id: SignalId, shape: &SignalShape);

    fn update_signal(&mut self, id: SignalId, shape: &SignalShape);

    fn remove_signal(&mut self, id: SignalId);

    /// 移除所有存活对象（节点、数据包、信号）
    fn clear(&mut self);

    fn flush(&mut self);
}

/// 把一帧按其生命周期角色应用到渲染端
pub fn apply_frame<S: RenderSink + ?Sized>(frame: &AnimationFrame, sink: &mut S) {
    trace!(t = frame.time(), role = ?frame.role(), "应用帧");
    match frame {
        AnimationFrame::Packet(f) => {
            match FrameRole::for_step(f.step_index, f.last_step_index) {
                FrameRole::Create => sink.create_packet(f.packet_id, f.pos),
                FrameRole::Update => sink.move_packet(f.packet_id, f.pos),
                FrameRole::Remove => sink.remove_packet(f.packet_id),
            }
        }
        AnimationFrame::NodeUpdate(f) => {
            sink.update_node(f.node_id, f.pos, f.color, f.description.as_deref());
        }
        AnimationFrame::Broadcast(f) => {
            let shape = SignalShape {
                center: f.pos,
                radius: f.radius,
                direction: None,
                normal: None,
            };
            apply_signal(sink, f.signal_id, f.step_index, f.last_step_index, &shape);
        }
        AnimationFrame::Reception(f) => {
            let shape = SignalShape {
                center: f.pos,
                radius: f.radius,
                direction: (f.source - f.pos).try_normalize(),
                normal: None,
            };
            apply_signal(sink, f.signal_id, f.step_index, f.last_step_index, &shape);
        }
    }
}

fn apply_signal<S: RenderSink + ?Sized>(
    sink: &mut S,
    id: SignalId,
    step_index: usize,
    last_step_index: usize,
    shape: &SignalShape,
) {
    match FrameRole::for_step(step_index, last_step_index) {
        FrameRole::Create => sink.create_signal(id, shape),
        FrameRole::Update => sink.update_signal(id, shape),
        FrameRole::Remove => sink.remove_signal(id),
    }
}
