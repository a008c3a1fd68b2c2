//! 事件提取
//!
//! 按类型标签分类原始记录，解析数值字段，过滤格式错误的记录。

use glam::DVec3;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, info, warn};

use super::error::ExtractionError;
use super::id::NodeId;
use super::kind::{Broadcast, NetworkEvent, NodeUpdate, Rgb, WiredPacket, WirelessReception};
use super::record::{RawRecord, scalar_text};

/// 可识别的记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    NodeUpdate,
    WiredPacket,
    Broadcast,
    WirelessReception,
}

impl RecordKind {
    /// 同时接受 NetAnim 的短标签和可读的长名称
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "nu" | "node_update" => Some(RecordKind::NodeUpdate),
            "p" | "wired_packet" => Some(RecordKind::WiredPacket),
            "pr" | "broadcast" => Some(RecordKind::Broadcast),
            "wpr" | "wireless_reception" => Some(RecordKind::WirelessReception),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RecordKind::NodeUpdate => "node_update",
            RecordKind::WiredPacket => "wired_packet",
            RecordKind::Broadcast => "broadcast",
            RecordKind::WirelessReception => "wireless_reception",
        }
    }
}

/// 把原始记录分类为事件。
///
/// 单条记录缺少类型或必填属性时产生一个 [`ExtractionError`] 并被排除，
/// 其余记录照常处理。纯函数，输出顺序与输入顺序一致。
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn extract(records: &[RawRecord]) -> (Vec<NetworkEvent>, Vec<ExtractionError>) {
    let mut events = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match classify(index, record) {
            Ok(ev) => events.push(ev),
            Err(err) => {
                debug!(%err, "丢弃无法解析的记录");
                errors.push(err);
            }
        }
    }

    if errors.is_empty() {
        info!(events = events.len(), "📥 记录提取完成");
    } else {
        warn!(
            events = events.len(),
            dropped = errors.len(),
            "📥 记录提取完成，部分记录被丢弃"
        );
    }
    (events, errors)
}

fn classify(index: usize, record: &RawRecord) -> Result<NetworkEvent, ExtractionError> {
    let raw_kind = record
        .kind
        .as_ref()
        .ok_or(ExtractionError::MissingKind { index })?;
    let tag = record
        .tag()
        .unwrap_or_else(|| Cow::Owned(raw_kind.to_string()));
    let kind = RecordKind::from_tag(&tag).ok_or_else(|| ExtractionError::UnknownKind {
        index,
        kind: tag.to_string(),
    })?;
    let fields = Fields {
        index,
        kind: kind.name(),
        record,
    };

    match kind {
        RecordKind::NodeUpdate => node_update(&fields).map(NetworkEvent::NodeUpdate),
        RecordKind::WiredPacket => wired_packet(&fields).map(NetworkEvent::WiredPacket),
        RecordKind::Broadcast => broadcast(&fields).map(NetworkEvent::Broadcast),
        RecordKind::WirelessReception => reception(&fields).map(NetworkEvent::WirelessReception),
    }
}

fn node_update(f: &Fields<'_>) -> Result<NodeUpdate, ExtractionError> {
    let node_id = f.node("id")?;
    let trigger_time = f.number("t")?;

    // x/y 成对出现才算位置更新；z 缺省为 0
    let loc = match (f.opt_number("x")?, f.opt_number("y")?) {
        (Some(x), Some(y)) => Some(DVec3::new(x, y, f.opt_number("z")?.unwrap_or(0.0))),
        (None, None) => None,
        (Some(_), None) => return Err(f.missing("y")),
        (None, Some(_)) => return Err(f.missing("x")),
    };

    let color = match (f.opt_channel("r")?, f.opt_channel("g")?, f.opt_channel("b")?) {
        (Some(r), Some(g), Some(b)) => Some(Rgb { r, g, b }),
        (None, None, None) => None,
        _ => return Err(ExtractionError::IncompleteColor { index: f.index }),
    };

    let description = f.optional("descr")?.map(Cow::into_owned);

    if loc.is_none() && color.is_none() && description.is_none() {
        return Err(ExtractionError::EmptyNodeUpdate { index: f.index });
    }

    Ok(NodeUpdate {
        node_id,
        trigger_time,
        loc,
        color,
        description,
    })
}

fn wired_packet(f: &Fields<'_>) -> Result<WiredPacket, ExtractionError> {
    let from_id = f.node("fId")?;
    let to_id = f.node("tId")?;
    let tx_time = f.number("fbTx")?;
    let rx_time = f.number("fbRx")?;
    f.ordered(tx_time, rx_time)?;

    Ok(WiredPacket {
        from_id,
        to_id,
        tx_time,
        rx_time,
        meta: f.text("meta-info")?,
    })
}

fn broadcast(f: &Fields<'_>) -> Result<Broadcast, ExtractionError> {
    Ok(Broadcast {
        broadcaster_id: f.node("fId")?,
        unique_id: f.unique_id("uId")?,
        tx_time: f.number("fbTx")?,
        meta: f.text("meta-info")?,
    })
}

fn reception(f: &Fields<'_>) -> Result<WirelessReception, ExtractionError> {
    let rx_time = f.number("fbRx")?;
    let last_rx_time = f.opt_number("lbRx")?;
    if let Some(last) = last_rx_time {
        f.ordered(rx_time, last)?;
    }

    Ok(WirelessReception {
        unique_id: f.unique_id("uId")?,
        to_id: f.node("tId")?,
        rx_time,
        last_rx_time,
    })
}

/// 带上下文的属性读取器，负责把解析失败转换为 [`ExtractionError`]
struct Fields<'a> {
    index: usize,
    kind: &'static str,
    record: &'a RawRecord,
}

impl<'a> Fields<'a> {
    fn missing(&self, field: &'static str) -> ExtractionError {
        ExtractionError::MissingField {
            index: self.index,
            kind: self.kind,
            field,
        }
    }

    fn invalid(&self, field: &'static str, value: &str) -> ExtractionError {
        ExtractionError::InvalidNumber {
            index: self.index,
            kind: self.kind,
            field,
            value: value.to_string(),
        }
    }

    /// `null` 视同缺失；字符串和数字之外的值是错误
    fn optional(&self, field: &'static str) -> Result<Option<Cow<'a, str>>, ExtractionError> {
        match self.record.value(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => scalar_text(value)
                .map(Some)
                .ok_or_else(|| ExtractionError::UnsupportedValue {
                    index: self.index,
                    kind: self.kind,
                    field,
                    value: value.to_string(),
                }),
        }
    }

    fn required(&self, field: &'static str) -> Result<Cow<'a, str>, ExtractionError> {
        self.optional(field)?.ok_or_else(|| self.missing(field))
    }

    fn parse_number(&self, field: &'static str, raw: &str) -> Result<f64, ExtractionError> {
        match raw.trim().parse::<f64>() {
            // -0 归一为 0：排序时与 0 视为同一时刻
            Ok(v) if v.is_finite() => Ok(v + 0.0),
            _ => Err(self.invalid(field, raw)),
        }
    }

    fn number(&self, field: &'static str) -> Result<f64, ExtractionError> {
        let raw = self.required(field)?;
        self.parse_number(field, &raw)
    }

    fn opt_number(&self, field: &'static str) -> Result<Option<f64>, ExtractionError> {
        self.optional(field)?
            .map(|raw| self.parse_number(field, &raw))
            .transpose()
    }

    fn opt_channel(&self, field: &'static str) -> Result<Option<u8>, ExtractionError> {
        self.optional(field)?
            .map(|raw| raw.trim().parse::<u8>().map_err(|_| self.invalid(field, &raw)))
            .transpose()
    }

    fn node(&self, field: &'static str) -> Result<NodeId, ExtractionError> {
        let raw = self.required(field)?;
        raw.trim()
            .parse::<u32>()
            .map(NodeId)
            .map_err(|_| self.invalid(field, &raw))
    }

    fn unique_id(&self, field: &'static str) -> Result<u64, ExtractionError> {
        let raw = self.required(field)?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| self.invalid(field, &raw))
    }

    fn text(&self, field: &'static str) -> Result<String, ExtractionError> {
        Ok(self
            .optional(field)?
            .map(Cow::into_owned)
            .unwrap_or_default())
    }

    fn ordered(&self, start: f64, end: f64) -> Result<(), ExtractionError> {
        if end < start {
            return Err(ExtractionError::InvertedInterval {
                index: self.index,
                kind: self.kind,
                start,
                end,
            });
        }
        Ok(())
    }
}
