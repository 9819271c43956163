// ==========================================
// 学校管理系统 - 失败信息归一化
// ==========================================
// 把任意失败转换成一条可展示的文本
// ==========================================

use crate::api::error::ApiError;
use crate::transport::error::TransportError;

/// 失败 → 展示文本
///
/// - 后端非 2xx: 响应体是字符串则取之；是对象则取 `message`，其次 `detail`；否则用 fallback
/// - 业务拒绝: 后端给的 message，空则用 fallback
/// - 其它错误: 错误自身的描述
pub fn describe_failure(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Transport(transport @ TransportError::Status { .. }) => transport
            .body_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
        ApiError::Rejected { message } if message.trim().is_empty() => fallback.to_string(),
        ApiError::Rejected { message } => message.clone(),
        ApiError::MissingData(message) | ApiError::InvalidInput(message) => message.clone(),
        other => {
            let text = other.to_string();
            if text.trim().is_empty() {
                fallback.to_string()
            } else {
                text
            }
        }
    }
}
