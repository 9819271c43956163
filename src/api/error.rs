// ==========================================
// 学校管理系统 - API层错误类型
// ==========================================
// 职责: 定义服务层错误类型，转换传输/存储错误
// 说明: 状态仓库按调用点选择 吞掉记日志 / 写入 error 字段 / 向上抛出
// ==========================================

use crate::storage::error::StorageError;
use crate::transport::error::TransportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 通信错误
    // ==========================================
    #[error("请求失败: {0}")]
    Transport(#[from] TransportError),

    // ==========================================
    // 业务错误（后端返回 success=false）
    // ==========================================
    #[error("后端拒绝请求: {message}")]
    Rejected { message: String },

    #[error("响应缺少数据: {0}")]
    MissingData(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 本地资源错误
    // ==========================================
    #[error("本地存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 错误代码（日志/界面使用）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(TransportError::Status { status: 401, .. }) => "UNAUTHORIZED",
            ApiError::Transport(TransportError::Status { status: 403, .. }) => "FORBIDDEN",
            ApiError::Transport(TransportError::Status { status: 404, .. }) => "NOT_FOUND",
            ApiError::Transport(TransportError::Status { .. }) => "HTTP_ERROR",
            ApiError::Transport(TransportError::Network(_)) => "NETWORK_ERROR",
            ApiError::Transport(TransportError::Decode(_)) => "DECODE_ERROR",
            ApiError::Transport(TransportError::InvalidUrl(_)) => "INVALID_URL",
            ApiError::Rejected { .. } => "REJECTED",
            ApiError::MissingData(_) => "MISSING_DATA",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Io(_) => "IO_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 是否为 HTTP 404
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(TransportError::Status { status: 404, .. })
        )
    }

    /// 由 success=false 的响应构造
    pub fn rejected(message: impl Into<String>) -> Self {
        ApiError::Rejected {
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
