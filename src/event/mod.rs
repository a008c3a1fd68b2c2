//! 网络事件模块
//!
//! 把上游解析出的原始记录（字符串属性）分类为强类型的网络事件。
//! 单条记录出错只会丢弃该记录，不会中断整批提取。

mod error;
mod extract;
mod id;
mod kind;
mod record;

pub use error::ExtractionError;
pub use extract::{RecordKind, extract};
pub use id::{NodeId, PacketId, SignalId};
pub use kind::{Broadcast, NetworkEvent, NodeUpdate, Rgb, WiredPacket, WirelessReception};
pub use record::{RawRecord, TopologyNode, TraceFile};
