//! 提取错误

use thiserror::Error;

/// 单条原始记录无法转换为事件的原因。记录被丢弃，批处理继续。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("record #{index}: missing kind")]
    MissingKind { index: usize },

    #[error("record #{index}: unknown kind `{kind}`")]
    UnknownKind { index: usize, kind: String },

    #[error("record #{index} ({kind}): missing field `{field}`")]
    MissingField {
        index: usize,
        kind: &'static str,
        field: &'static str,
    },

    #[error("record #{index} ({kind}): field `{field}` has invalid value `{value}`")]
    InvalidNumber {
        index: usize,
        kind: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("record #{index} ({kind}): field `{field}` must be a string or number, got {value}")]
    UnsupportedValue {
        index: usize,
        kind: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("record #{index} ({kind}): interval ends at {end} before it starts at {start}")]
    InvertedInterval {
        index: usize,
        kind: &'static str,
        start: f64,
        end: f64,
    },

    #[error("record #{index}: colour needs all of r, g and b")]
    IncompleteColor { index: usize },

    #[error("record #{index}: node update carries no position, colour or description")]
    EmptyNodeUpdate { index: usize },
}

impl ExtractionError {
    /// 出错记录在输入中的下标
    pub fn index(&self) -> usize {
        match self {
            ExtractionError::MissingKind { index }
            | ExtractionError::UnknownKind { index, .. }
            | ExtractionError::MissingField { index, .. }
            | ExtractionError::InvalidNumber { index, .. }
            | ExtractionError::UnsupportedValue { index, .. }
            | ExtractionError::InvertedInterval { index, .. }
            | ExtractionError::IncompleteColor { index }
            | ExtractionError::EmptyNodeUpdate { index } => *index,
        }
    }
}
