//! 引用错误

use thiserror::Error;

use crate::event::NodeId;

/// 事件引用了不存在的节点或尚未处理的广播。该事件被丢弃，构建继续。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("{kind} at t={time}: unknown {role} node {node}")]
    UnknownNode {
        kind: &'static str,
        role: &'static str,
        node: NodeId,
        time: f64,
    },

    #[error("wireless_reception at t={time}: broadcast {unique_id} for node {to} has not been processed yet")]
    UnresolvedBroadcast { unique_id: u64, to: NodeId, time: f64 },
}
