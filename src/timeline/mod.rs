//! 时间轴构建模块
//!
//! 把稀疏的网络事件展开为按时间全局排序的细粒度动画帧，
//! 并为每个数据包/信号分配合成标识符，供渲染端跟踪生命周期（创建 → 移动 → 移除）。

mod builder;
mod error;
mod frame;
mod node_table;
mod sequence;

pub use builder::{BuildReport, TimelineBuilder};
pub use error::ReferenceError;
pub use frame::{
    AnimationFrame, BroadcastFrame, FrameRole, NodeUpdateFrame, PacketFrame, ReceptionFrame,
};
pub use node_table::{NodeState, NodeTable};
pub use sequence::Timeline;
