//! 节点快照表
//!
//! 构建期间记录每个节点的“当前”位置、颜色与描述，
//! 按时间顺序被节点更新事件修改，供插值计算端点使用。

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::event::{NodeId, NodeUpdate, Rgb, TopologyNode};

/// 单个节点的当前状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub id: NodeId,
    pub pos: DVec3,
    pub color: Option<Rgb>,
    pub description: String,
}

impl NodeState {
    fn from_topology(node: &TopologyNode) -> Self {
        Self {
            id: node.id,
            pos: DVec3::new(node.x, node.y, node.z),
            color: None,
            description: format!("Node {}", node.id),
        }
    }
}

/// 节点快照表
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: BTreeMap<NodeId, NodeState>,
}

impl NodeTable {
    /// 由静态拓扑初始化；重复 id 以后出现者为准
    pub fn from_topology(topology: &[TopologyNode]) -> Self {
        let mut nodes = BTreeMap::new();
        for node in topology {
            if nodes
                .insert(node.id, NodeState::from_topology(node))
                .is_some()
            {
                warn!(node = %node.id, "拓扑中存在重复节点，以后者为准");
            }
        }
        Self { nodes }
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeState> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: NodeId) -> Option<DVec3> {
        self.nodes.get(&id).map(|n| n.pos)
    }

    /// 应用一次节点更新；节点不存在时返回 `false` 且不做修改
    pub fn apply(&mut self, update: &NodeUpdate) -> bool {
        let Some(node) = self.nodes.get_mut(&update.node_id) else {
            return false;
        };
        if let Some(loc) = update.loc {
            node.pos = loc;
        }
        if let Some(color) = update.color {
            node.color = Some(color);
        }
        if let Some(descr) = &update.description {
            node.description.clone_from(descr);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 按节点 id 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = &NodeState> {
        self.nodes.values()
    }
}
