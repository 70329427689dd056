//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 单条订单解析失败 (丢弃该条，继续处理)
    #[error("failed to decode market order: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 被丢弃的原始订单
#[derive(Debug)]
pub struct RejectedRecord {
    /// 在响应中的位置
    pub index: usize,
    /// 丢弃原因
    pub error: IngestionError,
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
