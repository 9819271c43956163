// ==========================================
// 学校管理系统 - 响应信封解包
// ==========================================
// 部分接口返回 { success, message, data } 包装，部分直接返回载荷；
// 列表/统计类服务统一在这里解包成载荷本身
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::ApiResponse;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped(ApiResponse<T>),
    Bare(T),
}

impl<T> Envelope<T> {
    /// 解包: 包装响应要求 success=true 且带 data
    pub(crate) fn into_payload(self, what: &str) -> ApiResult<T> {
        match self {
            Envelope::Bare(payload) => Ok(payload),
            Envelope::Wrapped(resp) if !resp.success => Err(ApiError::rejected(resp.message)),
            Envelope::Wrapped(resp) => resp
                .data
                .ok_or_else(|| ApiError::MissingData(what.to_string())),
        }
    }
}
