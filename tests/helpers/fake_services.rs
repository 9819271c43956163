// ==========================================
// 服务层假实现 - 用于集成测试
// ==========================================
// 职责: 以内存数据实现三个服务 trait，并记录调用
// 说明: 单元测试使用 mockall 生成的 Mock*；集成测试使用这里的手写实现
// ==========================================

use async_trait::async_trait;
use bytes::Bytes;
use school_admin_client::api::{
    ApiClient, ApiError, ApiResult, AuditLogService, AuthService, PersonnelService,
};
use school_admin_client::domain::{
    AccountCreate, AccountInfo, AccountUpdate, AccountWithCredentials, ActiveState, ApiResponse,
    AuditFilters, AuditPage, AuditRecord, AuditStats, CreatedAccount, ExportFormat, LoginData,
    MeData, PasswordChange, PasswordReset, PasswordResetResult, PermissionsData, Person,
    PersonFilters, PersonPage, PersonStats, PersonType, RefreshData,
};
use school_admin_client::storage::KeyValueStore;
use school_admin_client::transport::{HttpTransport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

fn not_found() -> ApiError {
    ApiError::from(TransportError::Status {
        status: 404,
        body: Some(serde_json::json!({ "detail": "No encontrado" })),
    })
}

fn server_error(detail: &str) -> ApiError {
    ApiError::from(TransportError::Status {
        status: 500,
        body: Some(serde_json::json!({ "detail": detail })),
    })
}

/// 用假服务组装 ApiClient（传输层指向不可达地址，只用于原始透传）
pub fn fake_client(
    token_store: Arc<dyn KeyValueStore>,
    auth: Arc<FakeAuthService>,
    audit: Arc<FakeAuditLogService>,
    personnel: Arc<FakePersonnelService>,
) -> ApiClient {
    let transport = Arc::new(HttpTransport::with_client(
        "http://127.0.0.1:9",
        reqwest::Client::new(),
        token_store,
    ));
    ApiClient::new(transport, auth, audit, personnel)
}

// ==========================================
// 认证服务
// ==========================================

/// 账号表: (usuario, password, LoginData)
#[derive(Default)]
pub struct FakeAuthService {
    pub accounts: Mutex<Vec<(String, String, LoginData)>>,
    /// whoami 结果；None 表示令牌无效
    pub me: Mutex<Option<MeData>>,
    /// 权限结果；None 表示服务端错误
    pub permissions: Mutex<Option<PermissionsData>>,
    /// 刷新得到的新令牌；None 表示刷新被拒绝
    pub refreshed_token: Mutex<Option<String>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, usuario: &str, password: &str, data: LoginData) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .push((usuario.to_string(), password.to_string(), data));
        self
    }

    pub fn with_permissions(self, permissions: PermissionsData) -> Self {
        *self.permissions.lock().unwrap() = Some(permissions);
        self
    }

    pub fn with_me(self, me: MeData) -> Self {
        *self.me.lock().unwrap() = Some(me);
        self
    }

    pub fn with_refreshed_token(self, token: &str) -> Self {
        *self.refreshed_token.lock().unwrap() = Some(token.to_string());
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn login(&self, usuario: &str, password: &str) -> ApiResult<ApiResponse<LoginData>> {
        self.record("login");
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|(u, p, _)| u == usuario && p == password)
            .map(|(_, _, data)| ApiResponse::ok(data.clone()))
            .unwrap_or_else(|| ApiResponse::failure("Usuario o contraseña incorrectos")))
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record("logout");
        Ok(())
    }

    async fn get_me(&self) -> ApiResult<ApiResponse<MeData>> {
        self.record("get_me");
        match self.me.lock().unwrap().clone() {
            Some(me) => Ok(ApiResponse::ok(me)),
            None => Err(ApiError::from(TransportError::Status {
                status: 401,
                body: Some(serde_json::json!({ "detail": "Token inválido" })),
            })),
        }
    }

    async fn get_my_permissions(&self) -> ApiResult<ApiResponse<PermissionsData>> {
        self.record("get_my_permissions");
        match self.permissions.lock().unwrap().clone() {
            Some(p) => Ok(ApiResponse::ok(p)),
            None => Err(server_error("permisos no disponibles")),
        }
    }

    async fn refresh_token(&self) -> ApiResult<ApiResponse<RefreshData>> {
        self.record("refresh_token");
        Ok(match self.refreshed_token.lock().unwrap().clone() {
            Some(token) => ApiResponse::ok(RefreshData {
                access_token: Some(token),
                token_type: Some("bearer".to_string()),
                expires_in: Some(3600),
            }),
            None => ApiResponse::failure("Token expirado"),
        })
    }
}

// ==========================================
// 审计日志服务
// ==========================================

#[derive(Default)]
pub struct FakeAuditLogService {
    pub records: Mutex<Vec<AuditRecord>>,
    pub stats: Mutex<Option<AuditStats>>,
    pub action_types: Mutex<Vec<String>>,
    /// 依次分配给 query 调用；Some 表示该次调用等待通知后才返回
    pub gates: Mutex<VecDeque<Option<Arc<Notify>>>>,
    /// 为 true 时 query 返回错误
    pub failing: Mutex<bool>,
    /// (filters, skip, limit)
    pub queries: Mutex<Vec<(AuditFilters, u32, u32)>>,
    pub exports: Mutex<Vec<(AuditFilters, ExportFormat)>>,
}

impl FakeAuditLogService {
    pub fn new(records: Vec<AuditRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn gate_next_query(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().push_back(Some(gate.clone()));
        gate
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn queries(&self) -> Vec<(AuditFilters, u32, u32)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogService for FakeAuditLogService {
    async fn query(&self, filters: &AuditFilters, skip: u32, limit: u32) -> ApiResult<AuditPage> {
        self.queries
            .lock()
            .unwrap()
            .push((filters.clone(), skip, limit));
        let gate = self.gates.lock().unwrap().pop_front().flatten();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.failing.lock().unwrap() {
            return Err(server_error("Servicio de auditoría caído"));
        }

        let matching: Vec<AuditRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filters.accion.as_deref().map_or(true, |a| r.accion == a))
            .filter(|r| filters.usuario_admin.map_or(true, |u| r.id_usuario_admin == u))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let limit = limit.max(1);
        let items: Vec<AuditRecord> = matching
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();
        let pages = ((total as u32) + limit - 1) / limit;

        Ok(AuditPage {
            items,
            total,
            page: skip / limit + 1,
            pages: pages.max(1),
            skip,
            limit,
            has_more: u64::from(skip + limit) < total,
            filtros_aplicados: filters.clone(),
        })
    }

    async fn stats(&self, _days: u32) -> ApiResult<AuditStats> {
        self.stats
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| server_error("sin estadísticas"))
    }

    async fn action_types(&self) -> ApiResult<Vec<String>> {
        Ok(self.action_types.lock().unwrap().clone())
    }

    async fn export(&self, filters: &AuditFilters, format: ExportFormat) -> ApiResult<Bytes> {
        self.exports
            .lock()
            .unwrap()
            .push((filters.clone(), format));
        let mut csv = String::from("id_bitacora,accion\n");
        for r in self.records.lock().unwrap().iter() {
            if filters.accion.as_deref().map_or(true, |a| r.accion == a) {
                csv.push_str(&format!("{},{}\n", r.id_bitacora, r.accion));
            }
        }
        Ok(Bytes::from(csv))
    }
}

// ==========================================
// 人员服务
// ==========================================

#[derive(Default)]
pub struct FakePersonnelService {
    pub persons: Mutex<Vec<Person>>,
    pub gates: Mutex<VecDeque<Option<Arc<Notify>>>>,
    pub failing: Mutex<bool>,
    pub stats_failing: Mutex<bool>,
    pub list_calls: Mutex<Vec<PersonFilters>>,
}

impl FakePersonnelService {
    pub fn new(persons: Vec<Person>) -> Self {
        Self {
            persons: Mutex::new(persons),
            ..Default::default()
        }
    }

    pub fn gate_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().push_back(Some(gate.clone()));
        gate
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn set_stats_failing(&self, failing: bool) {
        *self.stats_failing.lock().unwrap() = failing;
    }

    pub fn list_calls(&self) -> Vec<PersonFilters> {
        self.list_calls.lock().unwrap().clone()
    }

    fn matches(p: &Person, filters: &PersonFilters) -> bool {
        let type_ok = filters.tipo_persona.map_or(true, |t| p.tipo_persona == t);
        let state_ok = match filters.estado {
            Some(ActiveState::Activo) => p.is_active,
            Some(ActiveState::Inactivo) => !p.is_active,
            None => true,
        };
        let search_ok = filters
            .busqueda
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or(true, |s| {
                p.nombre_completo.to_lowercase().contains(&s.to_lowercase()) || p.ci.contains(s)
            });
        type_ok && state_ok && search_ok
    }
}

#[async_trait]
impl PersonnelService for FakePersonnelService {
    async fn list(&self, filters: &PersonFilters) -> ApiResult<PersonPage> {
        self.list_calls.lock().unwrap().push(filters.clone());
        let gate = self.gates.lock().unwrap().pop_front().flatten();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.failing.lock().unwrap() {
            return Err(ApiError::from(anyhow::anyhow!("connection reset")));
        }

        let matching: Vec<Person> = self
            .persons
            .lock()
            .unwrap()
            .iter()
            .filter(|p| Self::matches(p, filters))
            .cloned()
            .collect();
        let skip = filters.skip.unwrap_or(0);
        let per_page = filters.limit.unwrap_or(50).max(1);
        let total = matching.len() as u64;

        Ok(PersonPage {
            items: matching
                .into_iter()
                .skip(skip as usize)
                .take(per_page as usize)
                .collect(),
            total,
            page: skip / per_page + 1,
            per_page,
            pages: ((total as u32) + per_page - 1) / per_page,
        })
    }

    async fn stats(&self) -> ApiResult<PersonStats> {
        if *self.stats_failing.lock().unwrap() {
            return Err(server_error("estadísticas no disponibles"));
        }
        let persons = self.persons.lock().unwrap();
        let count = |f: fn(&Person) -> bool| persons.iter().filter(|p| f(p)).count() as u64;
        Ok(PersonStats {
            total_personas: persons.len() as u64,
            total_profesores: count(|p| p.tipo_persona == PersonType::Profesor),
            total_administrativos: count(|p| p.tipo_persona == PersonType::Administrativo),
            personas_activas: count(|p| p.is_active),
            personas_inactivas: count(|p| !p.is_active),
            personas_con_usuario: count(|p| p.tiene_usuario),
            personas_sin_usuario: count(|p| !p.tiene_usuario),
        })
    }

    async fn find_by_ci(&self, ci: &str) -> ApiResult<Option<Person>> {
        if ci.trim().is_empty() {
            return Err(ApiError::InvalidInput("CI vacío".to_string()));
        }
        Ok(self
            .persons
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.ci == ci)
            .cloned())
    }

    async fn list_by_type(&self, person_type: PersonType) -> ApiResult<Vec<Person>> {
        Ok(self
            .persons
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.tipo_persona == person_type)
            .cloned()
            .collect())
    }

    async fn get(&self, id_persona: i64) -> ApiResult<Person> {
        self.persons
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id_persona == id_persona)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_account(&self, dto: &AccountCreate) -> ApiResult<AccountWithCredentials> {
        let mut persons = self.persons.lock().unwrap();
        let person = persons
            .iter_mut()
            .find(|p| p.id_persona == dto.id_persona)
            .ok_or_else(not_found)?;
        let id_usuario = 100 + dto.id_persona;
        person.tiene_usuario = true;
        person.id_usuario = Some(id_usuario);
        person.usuario = Some(dto.usuario.clone());

        Ok(AccountWithCredentials {
            usuario: CreatedAccount {
                id_usuario,
                id_persona: dto.id_persona,
                usuario: dto.usuario.clone(),
                correo: dto.correo.clone(),
                is_active: dto.is_active.unwrap_or(true),
                requiere_cambio_password: dto.password.is_none(),
            },
            password_temporal: dto.password.clone().unwrap_or_else(|| "Temp1234".to_string()),
            mensaje: "Usuario creado".to_string(),
        })
    }

    async fn update_account(&self, id_usuario: i64, dto: &AccountUpdate) -> ApiResult<AccountInfo> {
        let persons = self.persons.lock().unwrap();
        let person = persons
            .iter()
            .find(|p| p.id_usuario == Some(id_usuario))
            .ok_or_else(not_found)?;
        Ok(AccountInfo {
            id_usuario,
            usuario: dto
                .usuario
                .clone()
                .or_else(|| person.usuario.clone())
                .unwrap_or_default(),
            correo: dto
                .correo
                .clone()
                .or_else(|| person.correo.clone())
                .unwrap_or_default(),
            is_active: dto.is_active.unwrap_or(true),
            requiere_cambio_password: None,
        })
    }

    async fn change_password(&self, dto: &PasswordChange) -> ApiResult<()> {
        if dto.password_actual == dto.password_nueva {
            return Err(ApiError::rejected("La nueva contraseña debe ser distinta"));
        }
        Ok(())
    }

    async fn reset_password(&self, dto: &PasswordReset) -> ApiResult<PasswordResetResult> {
        Ok(PasswordResetResult {
            mensaje: "Contraseña restablecida".to_string(),
            usuario: format!("user{}", dto.id_usuario - 100),
            password_temporal: dto
                .password_nueva
                .clone()
                .unwrap_or_else(|| "Auto5678".to_string()),
            advertencia: "Debe cambiarla al iniciar sesión".to_string(),
        })
    }
}
