// ==========================================
// 学校管理系统 - HTTP 传输层错误类型
// ==========================================

use thiserror::Error;

/// Result 类型别名
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// 与后端 HTTP 通信时的错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 请求未拿到响应（DNS、连接、超时等）
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    /// 后端返回非 2xx
    ///
    /// `body`: 能解析为 JSON 则为解析结果，否则原文包装成 JSON 字符串；空响应体为 None
    #[error("HTTP {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// 2xx 响应但响应体结构不符
    #[error("响应体格式错误: {0}")]
    Decode(String),

    /// 路径/查询参数无法拼成 URL
    #[error("URL 无效: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 错误响应体携带的消息
    ///
    /// 字符串响应体原样返回；对象响应体取 `message` 或 `detail` 字段
    pub fn body_message(&self) -> Option<String> {
        let TransportError::Status { body: Some(body), .. } = self else {
            return None;
        };
        match body {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Object(map) => ["message", "detail"]
                .iter()
                .filter_map(|k| map.get(*k))
                .find(|v| !v.is_null())
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                }),
            _ => None,
        }
    }
}
