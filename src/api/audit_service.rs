// ==========================================
// 学校管理系统 - 审计日志（bitácora）服务
// ==========================================
// 接口: /api/bitacora/auditoria | estadisticas | tipos-acciones | exportar
// ==========================================

use crate::api::envelope::Envelope;
use crate::api::error::ApiResult;
use crate::domain::{ActionTypes, AuditFilters, AuditPage, AuditStats, ExportFormat};
use crate::transport::{HttpTransport, QueryPair};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

pub mod paths {
    pub const QUERY: &str = "/api/bitacora/auditoria";
    pub const STATS: &str = "/api/bitacora/estadisticas";
    pub const ACTION_TYPES: &str = "/api/bitacora/tipos-acciones";
    pub const EXPORT: &str = "/api/bitacora/exportar";
}

/// 审计日志服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogService: Send + Sync {
    /// 分页查询
    async fn query(&self, filters: &AuditFilters, skip: u32, limit: u32) -> ApiResult<AuditPage>;

    /// 最近 days 天的统计
    async fn stats(&self, days: u32) -> ApiResult<AuditStats>;

    async fn action_types(&self) -> ApiResult<Vec<String>>;

    /// 导出（二进制文件内容）
    async fn export(&self, filters: &AuditFilters, format: ExportFormat) -> ApiResult<Bytes>;
}

/// HTTP 实现
pub struct HttpAuditLogService {
    transport: Arc<HttpTransport>,
}

impl HttpAuditLogService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuditLogService for HttpAuditLogService {
    async fn query(&self, filters: &AuditFilters, skip: u32, limit: u32) -> ApiResult<AuditPage> {
        let mut query: Vec<QueryPair<'_>> = filters.to_query_pairs();
        query.push(("skip", Some(skip.to_string())));
        query.push(("limit", Some(limit.to_string())));

        let envelope: Envelope<AuditPage> = self.transport.get(paths::QUERY, &query).await?;
        envelope.into_payload("auditoria")
    }

    async fn stats(&self, days: u32) -> ApiResult<AuditStats> {
        let envelope: Envelope<AuditStats> = self
            .transport
            .get(paths::STATS, &[("dias", Some(days.to_string()))])
            .await?;
        envelope.into_payload("estadisticas")
    }

    async fn action_types(&self) -> ApiResult<Vec<String>> {
        let envelope: Envelope<ActionTypes> =
            self.transport.get(paths::ACTION_TYPES, &[]).await?;
        Ok(envelope.into_payload("tipos-acciones")?.acciones)
    }

    async fn export(&self, filters: &AuditFilters, format: ExportFormat) -> ApiResult<Bytes> {
        let mut query: Vec<QueryPair<'_>> = filters.to_query_pairs();
        query.push(("formato", Some(format.as_str().to_string())));
        Ok(self.transport.get_blob(paths::EXPORT, &query).await?)
    }
}
