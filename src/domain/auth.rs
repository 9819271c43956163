// ==========================================
// 学校管理系统 - 认证与权限领域模型
// ==========================================
// 对齐: 后端 /api/auth/* 载荷
// 职责: 登录/whoami/刷新响应、详细权限矩阵、当前会话
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ==========================================
// 请求/响应载荷
// ==========================================

/// 登录请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub password: String,
}

/// 登录成功数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub usuario_id: i64,
    pub usuario: String,
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub rol: String,
    #[serde(default)]
    pub permisos: Vec<String>,
    #[serde(default)]
    pub expires_in: i64,
}

/// whoami 响应数据（启动时校验令牌）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeData {
    pub id_usuario: i64,
    pub usuario: String,
    pub nombres: Option<String>,
    pub rol: Option<String>,
    pub permisos: Option<Vec<String>>,
}

/// 刷新令牌响应数据
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefreshData {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

/// 单条详细权限: (动作, 模块)
///
/// 例: { "permiso": "Lectura", "modulo": "usuarios" }
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionDetail {
    #[serde(rename = "permiso")]
    pub action: String,
    #[serde(rename = "modulo")]
    pub module: String,
}

/// /api/auth/mis-permisos 响应数据
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PermissionsData {
    #[serde(default)]
    pub usuario: String,
    #[serde(default)]
    pub permisos: Vec<PermissionDetail>,
    #[serde(default)]
    pub permisos_por_modulo: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub modulos_accesibles: Vec<String>,
    #[serde(default)]
    pub acciones_disponibles: Vec<String>,
    #[serde(default)]
    pub es_administrador: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

// ==========================================
// PermissionSet - 详细权限矩阵
// ==========================================
// 红线: 管理员标志为 true 时覆盖所有模块/动作检查
// 容器全部有序，相同响应构建出的权限集逐字节相等
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    pub detailed: Vec<PermissionDetail>,
    pub by_module: BTreeMap<String, Vec<String>>,
    pub accessible_modules: BTreeSet<String>,
    pub available_actions: BTreeSet<String>,
    pub is_administrator: bool,
    pub roles: Vec<String>,
}

impl From<PermissionsData> for PermissionSet {
    fn from(data: PermissionsData) -> Self {
        Self {
            detailed: data.permisos,
            by_module: data.permisos_por_modulo,
            accessible_modules: data.modulos_accesibles.into_iter().collect(),
            available_actions: data.acciones_disponibles.into_iter().collect(),
            is_administrator: data.es_administrador,
            roles: data.roles,
        }
    }
}

impl PermissionSet {
    pub fn can_access_module(&self, module: &str) -> bool {
        self.is_administrator || self.accessible_modules.contains(module)
    }

    pub fn can_perform_action(&self, action: &str) -> bool {
        self.is_administrator || self.available_actions.contains(action)
    }

    /// 模块内的动作列表（未授权模块返回空）
    pub fn module_permissions(&self, module: &str) -> &[String] {
        self.by_module
            .get(module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_permission_in_module(&self, module: &str, code: &str) -> bool {
        self.is_administrator
            || self
                .module_permissions(module)
                .iter()
                .any(|p| p == code)
    }
}

// ==========================================
// Session - 当前会话
// ==========================================
// 不变量: 会话存在 <=> 令牌存在 <=> 已认证

/// 会话用户基础信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role_name: String,
    /// 旧版粗粒度权限码（兼容保留）
    pub legacy_permissions: Vec<String>,
}

impl From<&LoginData> for SessionUser {
    fn from(data: &LoginData) -> Self {
        Self {
            user_id: data.usuario_id,
            username: data.usuario.clone(),
            display_name: data.nombres.clone(),
            role_name: data.rol.clone(),
            legacy_permissions: data.permisos.clone(),
        }
    }
}

impl From<MeData> for SessionUser {
    fn from(data: MeData) -> Self {
        Self {
            user_id: data.id_usuario,
            username: data.usuario,
            display_name: data.nombres.unwrap_or_default(),
            role_name: data.rol.unwrap_or_else(|| DEFAULT_ROLE_NAME.to_string()),
            legacy_permissions: data.permisos.unwrap_or_default(),
        }
    }
}

/// whoami 未返回角色时使用的角色名
pub const DEFAULT_ROLE_NAME: &str = "Usuario";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub token: String,
    /// None 表示“仅基础权限”，不是错误状态
    pub permissions: Option<PermissionSet>,
}

impl Session {
    pub fn new(user: SessionUser, token: String) -> Self {
        Self {
            user,
            token,
            permissions: None,
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.permissions
            .as_ref()
            .map(|p| p.is_administrator)
            .unwrap_or(false)
    }
}

// ==========================================
// SystemModule - 系统模块
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemModule {
    Usuarios,
    Esquelas,
    Incidentes,
    RetirosTempranos,
    Reportes,
    Profesores,
    Administracion,
}

impl SystemModule {
    /// 菜单展示顺序
    pub const ALL: [SystemModule; 7] = [
        SystemModule::Usuarios,
        SystemModule::Esquelas,
        SystemModule::Incidentes,
        SystemModule::RetirosTempranos,
        SystemModule::Reportes,
        SystemModule::Profesores,
        SystemModule::Administracion,
    ];

    /// 模块标识（与后端 modulo 字段一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemModule::Usuarios => "usuarios",
            SystemModule::Esquelas => "esquelas",
            SystemModule::Incidentes => "incidentes",
            SystemModule::RetirosTempranos => "retiros_tempranos",
            SystemModule::Reportes => "reportes",
            SystemModule::Profesores => "profesores",
            SystemModule::Administracion => "administracion",
        }
    }

    /// 前端路由
    pub fn route(&self) -> &'static str {
        match self {
            SystemModule::RetirosTempranos => "retiros",
            other => other.as_str(),
        }
    }

    /// 菜单图标
    pub fn icon(&self) -> &'static str {
        match self {
            SystemModule::Usuarios => "users",
            SystemModule::Esquelas => "document",
            SystemModule::Incidentes => "alert",
            SystemModule::RetirosTempranos => "exit",
            SystemModule::Reportes => "chart",
            SystemModule::Profesores => "academic",
            SystemModule::Administracion => "settings",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for SystemModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 菜单项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: SystemModule,
    pub label: String,
    pub icon: String,
    pub route: String,
}
