// ==========================================
// 学校管理系统 - 认证服务
// ==========================================
// 接口: /api/auth/login | logout | me | mis-permisos | refresh
// 说明: 返回完整响应信封，由会话仓库判断 success/data
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{ApiResponse, LoginData, LoginRequest, MeData, PermissionsData, RefreshData};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use std::sync::Arc;

pub mod paths {
    pub const LOGIN: &str = "/api/auth/login";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const ME: &str = "/api/auth/me";
    pub const MY_PERMISSIONS: &str = "/api/auth/mis-permisos";
    pub const REFRESH: &str = "/api/auth/refresh";
}

/// 认证与权限服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, usuario: &str, password: &str) -> ApiResult<ApiResponse<LoginData>>;

    /// 服务端会话终止
    async fn logout(&self) -> ApiResult<()>;

    /// whoami：用当前令牌换取用户信息
    async fn get_me(&self) -> ApiResult<ApiResponse<MeData>>;

    async fn get_my_permissions(&self) -> ApiResult<ApiResponse<PermissionsData>>;

    async fn refresh_token(&self) -> ApiResult<ApiResponse<RefreshData>>;
}

/// HTTP 实现
pub struct HttpAuthService {
    transport: Arc<HttpTransport>,
}

impl HttpAuthService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, usuario: &str, password: &str) -> ApiResult<ApiResponse<LoginData>> {
        let body = LoginRequest {
            usuario: usuario.to_string(),
            password: password.to_string(),
        };
        Ok(self.transport.post(paths::LOGIN, &body).await?)
    }

    async fn logout(&self) -> ApiResult<()> {
        let _: serde_json::Value = self
            .transport
            .post(paths::LOGOUT, &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn get_me(&self) -> ApiResult<ApiResponse<MeData>> {
        Ok(self.transport.get(paths::ME, &[]).await?)
    }

    async fn get_my_permissions(&self) -> ApiResult<ApiResponse<PermissionsData>> {
        Ok(self.transport.get(paths::MY_PERMISSIONS, &[]).await?)
    }

    async fn refresh_token(&self) -> ApiResult<ApiResponse<RefreshData>> {
        Ok(self
            .transport
            .post(paths::REFRESH, &serde_json::json!({}))
            .await?)
    }
}
