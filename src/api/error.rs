// ==========================================
// 排产仿真快照分析 - API层错误类型
// ==========================================
// 职责: 汇总快照层/配置层错误，给调用方统一的错误出口
// ==========================================

use crate::config::error::ConfigError;
use crate::snapshot::error::SnapshotError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("快照读取失败: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("内部错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否因快照缺少必需的表
    pub fn is_missing_input(&self) -> bool {
        matches!(self, ApiError::Snapshot(SnapshotError::MissingInput { .. }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
