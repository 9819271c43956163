// ==========================================
// 学校管理系统 - 统一 API 客户端
// ==========================================
// 职责: 把各模块服务与原始 HTTP 方法合并到同一个命名空间
// 架构: 状态仓库 → ApiClient / 服务 trait → HttpTransport
// ==========================================

use crate::api::audit_service::{AuditLogService, HttpAuditLogService};
use crate::api::auth_service::{AuthService, HttpAuthService};
use crate::api::error::ApiResult;
use crate::api::personnel_service::{HttpPersonnelService, PersonnelService};
use crate::config::ClientConfig;
use crate::domain::{ApiResponse, LoginData, MeData, PermissionsData, RefreshData};
use crate::storage::KeyValueStore;
use crate::transport::{HttpTransport, QueryPair};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// 统一 API 客户端
///
/// - 认证: 直接委托 `AuthService`
/// - 其它模块: 通过 `audit_log()` / `personnel()` 取服务实例
/// - 未封装的接口: `get` / `post` / `put` / `del` 原始透传
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<HttpTransport>,
    auth: Arc<dyn AuthService>,
    audit_log: Arc<dyn AuditLogService>,
    personnel: Arc<dyn PersonnelService>,
}

impl ApiClient {
    /// 注入任意服务实现
    pub fn new(
        transport: Arc<HttpTransport>,
        auth: Arc<dyn AuthService>,
        audit_log: Arc<dyn AuditLogService>,
        personnel: Arc<dyn PersonnelService>,
    ) -> Self {
        Self {
            transport,
            auth,
            audit_log,
            personnel,
        }
    }

    /// 全部使用 HTTP 实现
    pub fn http(config: &ClientConfig, token_store: Arc<dyn KeyValueStore>) -> ApiResult<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(config, token_store)?);
        tracing::info!("ApiClient 初始化，后端地址: {}", transport.base_url());

        Ok(Self::new(
            transport.clone(),
            Arc::new(HttpAuthService::new(transport.clone())),
            Arc::new(HttpAuditLogService::new(transport.clone())),
            Arc::new(HttpPersonnelService::new(transport)),
        ))
    }

    // ==========================================
    // 服务实例
    // ==========================================

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    pub fn audit_log(&self) -> Arc<dyn AuditLogService> {
        self.audit_log.clone()
    }

    pub fn personnel(&self) -> Arc<dyn PersonnelService> {
        self.personnel.clone()
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    // ==========================================
    // 认证与权限（直接委托）
    // ==========================================

    pub async fn login(&self, usuario: &str, password: &str) -> ApiResult<ApiResponse<LoginData>> {
        self.auth.login(usuario, password).await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.auth.logout().await
    }

    pub async fn get_me(&self) -> ApiResult<ApiResponse<MeData>> {
        self.auth.get_me().await
    }

    pub async fn get_my_permissions(&self) -> ApiResult<ApiResponse<PermissionsData>> {
        self.auth.get_my_permissions().await
    }

    pub async fn refresh_token(&self) -> ApiResult<ApiResponse<RefreshData>> {
        self.auth.refresh_token().await
    }

    // ==========================================
    // 原始 HTTP 透传
    // ==========================================

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[QueryPair<'_>],
    ) -> ApiResult<T> {
        Ok(self.transport.get(path, query).await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        Ok(self.transport.post(path, body).await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        Ok(self.transport.put(path, body).await?)
    }

    pub async fn del<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Ok(self.transport.del(path).await?)
    }

    pub fn build_query(params: &[QueryPair<'_>]) -> String {
        HttpTransport::build_query(params)
    }
}
