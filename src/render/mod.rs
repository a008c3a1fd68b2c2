//! 渲染端边界
//!
//! 回放控制器只持有不透明的 id，逐帧调用 [`RenderSink`]；
//! 渲染对象的句柄只存在于具体实现内部（见 [`MemorySink`]）。

mod memory;
mod sink;

pub use memory::{MemorySink, NodeHandle, PacketHandle, SceneSnapshot, SinkStats};
pub use sink::{RenderSink, SignalShape, apply_frame};
