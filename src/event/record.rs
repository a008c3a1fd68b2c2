//! 原始记录
//!
//! 上游解析器交付的扁平记录：一个类型标签加若干属性。
//! 属性值保持原始 JSON 形态（通常是字符串，也可能是数字），
//! 由 [`extract`](super::extract) 逐条解析，单条记录的坏值不会让整个文件加载失败。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::id::NodeId;
use crate::error::Error;

/// 一条原始事件记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 记录类型标签（如 `p`、`nu`、`pr`、`wpr`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

impl RawRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(Value::String(kind.into())),
            attrs: BTreeMap::new(),
        }
    }

    /// 追加一个属性（构造测试数据时使用）
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// 类型标签的文本形式；缺失或不是字符串/数字时为 `None`
    pub fn tag(&self) -> Option<Cow<'_, str>> {
        self.kind.as_ref().and_then(scalar_text)
    }

    /// 属性的文本形式；数字按 JSON 写法转成文本
    pub fn attr(&self, key: &str) -> Option<Cow<'_, str>> {
        self.attrs.get(key).and_then(scalar_text)
    }

    /// 原始属性值
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }
}

/// 字符串原样借出，数字转文本，其余类型没有文本形式
pub(crate) fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// 静态拓扑中的一个节点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl TopologyNode {
    pub fn new(id: u32, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: NodeId(id),
            x,
            y,
            z,
        }
    }
}

/// 二进制工具的输入文件：拓扑 + 原始事件记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceFile {
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl TraceFile {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trace = serde_json::from_str(&raw)?;
        Ok(trace)
    }
}
