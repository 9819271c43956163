// ==========================================
// 学校管理系统 - 会话/权限仓库
// ==========================================
// 状态机: Unauthenticated → Authenticating → Authenticated
//         Authenticated ⇄ LoadingPermissions（失败不影响已认证状态）
// 不变量: 会话存在 <=> 内存令牌存在 <=> 已认证
// 错误策略:
// - login: 清理后向上抛出
// - logout / refresh_token / restore_session: 永不抛出
// - load_permissions: 吞掉并记日志，保留原权限集
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::AuthService;
use crate::domain::{
    ApiResponse, LoginData, MenuEntry, PermissionSet, Session, SessionUser, SystemModule,
};
use crate::i18n::t;
use crate::storage::{KeyValueStore, TOKEN_KEY};
use crate::store::notifier::{StoreEvent, StoreNotifier};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 认证状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    /// Authenticated 的子状态
    LoadingPermissions,
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    session: Option<Session>,
    /// 启动恢复会话完成前为 true
    is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            session: None,
            is_loading: true,
        }
    }
}

/// 会话/权限仓库
pub struct SessionStore {
    auth: Arc<dyn AuthService>,
    token_store: Arc<dyn KeyValueStore>,
    notifier: StoreNotifier,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthService>,
        token_store: Arc<dyn KeyValueStore>,
        notifier: StoreNotifier,
    ) -> Self {
        Self {
            auth,
            token_store,
            notifier,
            state: RwLock::new(SessionState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.write().phase = phase;
        self.notifier.publish(StoreEvent::SessionChanged);
    }

    /// 有会话则回到 Authenticated，否则 Unauthenticated
    fn settle_phase(&self) {
        {
            let mut state = self.write();
            state.phase = if state.session.is_some() {
                SessionPhase::Authenticated
            } else {
                SessionPhase::Unauthenticated
            };
        }
        self.notifier.publish(StoreEvent::SessionChanged);
    }

    fn establish(&self, user: SessionUser, token: String) {
        {
            let mut state = self.write();
            state.session = Some(Session::new(user, token));
            state.phase = SessionPhase::Authenticated;
        }
        self.notifier.publish(StoreEvent::SessionChanged);
    }

    // ==========================================
    // 认证流程
    // ==========================================

    /// 登录
    ///
    /// 成功: 持久化令牌 → 建立会话 → 加载权限（失败只记日志）
    /// 失败: 先 logout() 再返回错误
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginData> {
        tracing::info!("登录: usuario={}", username);
        self.set_phase(SessionPhase::Authenticating);

        match self.authenticate(username, password).await {
            Ok(data) => {
                tracing::info!("登录成功: usuario_id={}", data.usuario_id);
                self.load_permissions().await;
                Ok(data)
            }
            Err(e) => {
                tracing::error!("登录失败 [{}]: {}", e.code(), e);
                self.logout().await;
                Err(e)
            }
        }
    }

    async fn authenticate(&self, username: &str, password: &str) -> ApiResult<LoginData> {
        let resp = self.auth.login(username, password).await?;
        if !resp.success {
            return Err(ApiError::rejected(resp.message));
        }
        let data = resp
            .data
            .ok_or_else(|| ApiError::MissingData("login: 响应缺少 data".to_string()))?;

        self.token_store.set(TOKEN_KEY, &data.access_token)?;
        self.establish(SessionUser::from(&data), data.access_token.clone());
        Ok(data)
    }

    /// 注销（永不失败）
    ///
    /// 持有令牌时先通知服务端；无论结果如何都清除本地令牌与会话
    pub async fn logout(&self) {
        if self.holds_token() {
            if let Err(e) = self.auth.logout().await {
                tracing::warn!("服务端注销失败（忽略）: {}", e);
            }
        }

        if let Err(e) = self.token_store.remove(TOKEN_KEY) {
            tracing::warn!("清除持久化令牌失败: {}", e);
        }
        {
            let mut state = self.write();
            state.session = None;
            state.phase = SessionPhase::Unauthenticated;
        }
        self.notifier.publish(StoreEvent::SessionChanged);
        tracing::info!("已注销");
    }

    fn holds_token(&self) -> bool {
        if self.read().session.is_some() {
            return true;
        }
        matches!(self.token_store.get(TOKEN_KEY), Ok(Some(token)) if !token.is_empty())
    }

    /// 启动时恢复会话（只调用一次）
    pub async fn restore_session(&self) {
        let token = match self.token_store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("读取持久化令牌失败: {}", e);
                None
            }
        };

        match token {
            None => {
                tracing::info!("无持久化令牌，保持未认证状态");
                self.settle_phase();
            }
            Some(token) => match self.auth.get_me().await {
                Ok(ApiResponse {
                    success: true,
                    data: Some(me),
                    ..
                }) => {
                    tracing::info!("会话已恢复: usuario={}", me.usuario);
                    self.establish(SessionUser::from(me), token);
                    self.load_permissions().await;
                }
                Ok(resp) => {
                    tracing::warn!("令牌校验未通过: {}", resp.message);
                    self.logout().await;
                }
                Err(e) => {
                    tracing::warn!("令牌校验失败 [{}]: {}", e.code(), e);
                    self.logout().await;
                }
            },
        }

        self.write().is_loading = false;
        self.notifier.publish(StoreEvent::SessionChanged);
    }

    /// 加载详细权限（幂等）
    ///
    /// 成功时覆盖当前会话的权限集；任何失败都保留原值
    pub async fn load_permissions(&self) {
        if !self.is_authenticated() {
            tracing::debug!("无会话，跳过权限加载");
            return;
        }
        self.set_phase(SessionPhase::LoadingPermissions);

        match self.auth.get_my_permissions().await {
            Ok(ApiResponse {
                success: true,
                data: Some(data),
                ..
            }) => {
                let permissions = PermissionSet::from(data);
                tracing::info!(
                    "权限已加载: modulos={} administrador={}",
                    permissions.accessible_modules.len(),
                    permissions.is_administrator
                );
                let applied = {
                    let mut state = self.write();
                    match state.session.as_mut() {
                        Some(session) => {
                            session.permissions = Some(permissions);
                            true
                        }
                        None => false,
                    }
                };
                if applied {
                    self.notifier.publish(StoreEvent::PermissionsChanged);
                }
            }
            Ok(resp) => {
                tracing::warn!("权限加载被拒绝，保留原权限: {}", resp.message);
            }
            Err(e) => {
                tracing::warn!("权限加载失败，保留原权限 [{}]: {}", e.code(), e);
            }
        }

        self.settle_phase();
    }

    /// 刷新令牌（永不抛出）
    ///
    /// 成功替换持久化与内存中的令牌并返回 true；其它任何结果都会 logout() 并返回 false。
    /// 无会话时不请求服务端，也不写入令牌，直接返回 false
    pub async fn refresh_token(&self) -> bool {
        if self.read().session.is_none() {
            tracing::debug!("无会话，跳过令牌刷新");
            return false;
        }

        let token = match self.auth.refresh_token().await {
            Ok(resp) => {
                let message = resp.message.clone();
                match resp.into_data() {
                    Some(data) => data.access_token.filter(|t| !t.is_empty()),
                    None => {
                        tracing::warn!("令牌刷新被拒绝: {}", message);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("令牌刷新失败 [{}]: {}", e.code(), e);
                None
            }
        };

        let Some(token) = token else {
            self.logout().await;
            return false;
        };

        if let Err(e) = self.token_store.set(TOKEN_KEY, &token) {
            tracing::error!("保存新令牌失败: {}", e);
            self.logout().await;
            return false;
        }
        if let Some(session) = self.write().session.as_mut() {
            session.token = token;
        }
        self.notifier.publish(StoreEvent::SessionChanged);
        tracing::info!("令牌已刷新");
        true
    }

    // ==========================================
    // 权限查询（管理员一律放行；无权限集视为无权限）
    // ==========================================

    pub fn is_administrator(&self) -> bool {
        self.read()
            .session
            .as_ref()
            .map(Session::is_administrator)
            .unwrap_or(false)
    }

    /// 旧版粗粒度权限码
    pub fn has_permission(&self, code: &str) -> bool {
        let state = self.read();
        match state.session.as_ref() {
            Some(session) if session.is_administrator() => true,
            Some(session) => session.user.legacy_permissions.iter().any(|p| p == code),
            None => false,
        }
    }

    pub fn can_access_module(&self, module: &str) -> bool {
        self.check_permissions(|set| set.can_access_module(module))
    }

    pub fn can_perform_action(&self, action: &str) -> bool {
        self.check_permissions(|set| set.can_perform_action(action))
    }

    pub fn has_permission_in_module(&self, module: &str, code: &str) -> bool {
        self.check_permissions(|set| set.has_permission_in_module(module, code))
    }

    fn check_permissions<F>(&self, check: F) -> bool
    where
        F: FnOnce(&PermissionSet) -> bool,
    {
        let state = self.read();
        let Some(session) = state.session.as_ref() else {
            return false;
        };
        match session.permissions.as_ref() {
            Some(set) if set.is_administrator => true,
            Some(set) => check(set),
            None => false,
        }
    }

    /// 当前用户可见的菜单（固定顺序，按模块访问权过滤）
    pub fn menu_modules(&self) -> Vec<MenuEntry> {
        SystemModule::ALL
            .iter()
            .filter(|module| self.can_access_module(module.as_str()))
            .map(|module| MenuEntry {
                id: *module,
                label: t(&format!("menu.{}", module.as_str())),
                icon: module.icon().to_string(),
                route: module.route().to_string(),
            })
            .collect()
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn phase(&self) -> SessionPhase {
        self.read().phase
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.read().session.as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read().session.as_ref().map(|s| s.token.clone())
    }

    pub fn permission_set(&self) -> Option<PermissionSet> {
        self.read()
            .session
            .as_ref()
            .and_then(|s| s.permissions.clone())
    }

    pub fn legacy_permissions(&self) -> Vec<String> {
        self.read()
            .session
            .as_ref()
            .map(|s| s.user.legacy_permissions.clone())
            .unwrap_or_default()
    }

    pub fn accessible_modules(&self) -> Vec<String> {
        self.permission_set()
            .map(|p| p.accessible_modules.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn available_actions(&self) -> Vec<String> {
        self.permission_set()
            .map(|p| p.available_actions.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn permissions_by_module(&self) -> BTreeMap<String, Vec<String>> {
        self.permission_set()
            .map(|p| p.by_module)
            .unwrap_or_default()
    }

    pub fn module_permissions(&self, module: &str) -> Vec<String> {
        self.read()
            .session
            .as_ref()
            .and_then(|s| s.permissions.as_ref())
            .map(|p| p.module_permissions(module).to_vec())
            .unwrap_or_default()
    }
}
