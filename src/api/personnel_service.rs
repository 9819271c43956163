// ==========================================
// 学校管理系统 - 人员（personas）服务
// ==========================================
// 接口: /api/personas/* 以及人员账号管理 /api/personas/usuarios/*
// ==========================================

use crate::api::envelope::Envelope;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::{
    AccountCreate, AccountInfo, ApiResponse, AccountUpdate, AccountWithCredentials, PasswordChange,
    PasswordReset, PasswordResetResult, Person, PersonFilters, PersonPage, PersonStats,
    PersonType,
};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use std::sync::Arc;

pub mod paths {
    pub const LIST: &str = "/api/personas";
    pub const STATS: &str = "/api/personas/estadisticas";
    pub const BY_CI: &str = "/api/personas/ci";
    pub const BY_TYPE: &str = "/api/personas/tipo";
    pub const ACCOUNTS: &str = "/api/personas/usuarios";
    pub const CHANGE_PASSWORD: &str = "/api/personas/usuarios/cambiar-password";
    pub const RESET_PASSWORD: &str = "/api/personas/usuarios/reset-password";
}

/// 人员服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonnelService: Send + Sync {
    async fn list(&self, filters: &PersonFilters) -> ApiResult<PersonPage>;

    async fn stats(&self) -> ApiResult<PersonStats>;

    /// 按身份证号查找；不存在返回 Ok(None)
    async fn find_by_ci(&self, ci: &str) -> ApiResult<Option<Person>>;

    async fn list_by_type(&self, person_type: PersonType) -> ApiResult<Vec<Person>>;

    async fn get(&self, id_persona: i64) -> ApiResult<Person>;

    // ===== 账号管理 =====

    async fn create_account(&self, dto: &AccountCreate) -> ApiResult<AccountWithCredentials>;

    async fn update_account(&self, id_usuario: i64, dto: &AccountUpdate) -> ApiResult<AccountInfo>;

    async fn change_password(&self, dto: &PasswordChange) -> ApiResult<()>;

    async fn reset_password(&self, dto: &PasswordReset) -> ApiResult<PasswordResetResult>;
}

/// HTTP 实现
pub struct HttpPersonnelService {
    transport: Arc<HttpTransport>,
}

impl HttpPersonnelService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PersonnelService for HttpPersonnelService {
    async fn list(&self, filters: &PersonFilters) -> ApiResult<PersonPage> {
        let envelope: Envelope<PersonPage> = self
            .transport
            .get(paths::LIST, &filters.to_query_pairs())
            .await?;
        envelope.into_payload("personas")
    }

    async fn stats(&self) -> ApiResult<PersonStats> {
        let envelope: Envelope<PersonStats> = self.transport.get(paths::STATS, &[]).await?;
        envelope.into_payload("estadisticas")
    }

    async fn find_by_ci(&self, ci: &str) -> ApiResult<Option<Person>> {
        let ci = ci.trim();
        if ci.is_empty() || !ci.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ApiError::InvalidInput(format!("CI 格式无效: '{}'", ci)));
        }

        let path = format!("{}/{}", paths::BY_CI, ci);
        match self.transport.get::<Envelope<Person>>(&path, &[]).await {
            Ok(envelope) => envelope.into_payload("persona").map(Some),
            Err(e) => {
                let err = ApiError::from(e);
                if err.is_not_found() {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn list_by_type(&self, person_type: PersonType) -> ApiResult<Vec<Person>> {
        let path = format!("{}/{}", paths::BY_TYPE, person_type.as_str());
        let envelope: Envelope<Vec<Person>> = self.transport.get(&path, &[]).await?;
        envelope.into_payload("personas")
    }

    async fn get(&self, id_persona: i64) -> ApiResult<Person> {
        let path = format!("{}/{}", paths::LIST, id_persona);
        let envelope: Envelope<Person> = self.transport.get(&path, &[]).await?;
        envelope.into_payload("persona")
    }

    async fn create_account(&self, dto: &AccountCreate) -> ApiResult<AccountWithCredentials> {
        let envelope: Envelope<AccountWithCredentials> =
            self.transport.post(paths::ACCOUNTS, dto).await?;
        envelope.into_payload("usuario")
    }

    async fn update_account(&self, id_usuario: i64, dto: &AccountUpdate) -> ApiResult<AccountInfo> {
        let path = format!("{}/{}", paths::ACCOUNTS, id_usuario);
        let envelope: Envelope<AccountInfo> = self.transport.put(&path, dto).await?;
        envelope.into_payload("usuario")
    }

    async fn change_password(&self, dto: &PasswordChange) -> ApiResult<()> {
        if !dto.confirmation_matches() {
            return Err(ApiError::InvalidInput(
                "确认密码与新密码不一致".to_string(),
            ));
        }
        let resp: ApiResponse<serde_json::Value> =
            self.transport.post(paths::CHANGE_PASSWORD, dto).await?;
        if resp.success {
            Ok(())
        } else {
            Err(ApiError::rejected(resp.message))
        }
    }

    async fn reset_password(&self, dto: &PasswordReset) -> ApiResult<PasswordResetResult> {
        if !dto.generar_automatica && dto.password_nueva.as_deref().unwrap_or("").is_empty() {
            return Err(ApiError::InvalidInput(
                "未选择自动生成时必须提供新密码".to_string(),
            ));
        }
        let envelope: Envelope<PasswordResetResult> =
            self.transport.post(paths::RESET_PASSWORD, dto).await?;
        envelope.into_payload("reset-password")
    }
}
