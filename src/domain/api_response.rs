// ==========================================
// 学校管理系统 - 后端统一响应信封
// ==========================================
// 对齐: 后端包装接口 { success, message, data }
// ==========================================

use serde::{Deserialize, Serialize};

/// 后端包装接口的统一响应
///
/// `data` 在失败响应中通常缺失，因此建模为 `Option`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// 构造成功响应（测试与本地桩实现使用）
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
            status_code: None,
        }
    }

    /// 构造失败响应
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status_code: None,
        }
    }

    /// 仅当 success 且携带 data 时返回数据
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}
