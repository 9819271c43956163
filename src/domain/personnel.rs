// ==========================================
// 学校管理系统 - 人员（personas）领域模型
// ==========================================
// 对齐: 后端 /api/personas/* 载荷
// 说明: 人员在前端只读；账号（usuario）可创建/修改
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PersonType - 人员类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    Profesor,
    Administrativo,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Profesor => "profesor",
            PersonType::Administrativo => "administrativo",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 人员关联账号信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id_usuario: i64,
    pub usuario: String,
    pub correo: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requiere_cambio_password: Option<bool>,
}

// ==========================================
// Person - 人员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id_persona: i64,
    pub ci: String,
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub nombre_completo: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub tipo_persona: PersonType,
    pub is_active: bool,

    // ===== 账号关联 =====
    #[serde(default)]
    pub tiene_usuario: bool,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub id_usuario: Option<i64>,
    #[serde(default)]
    pub usuario_info: Option<AccountInfo>,
    #[serde(default)]
    pub usuario_activo: Option<bool>,
}

// ==========================================
// PersonStats - 人员统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonStats {
    pub total_personas: u64,
    pub total_profesores: u64,
    pub total_administrativos: u64,
    pub personas_activas: u64,
    pub personas_inactivas: u64,
    pub personas_con_usuario: u64,
    pub personas_sin_usuario: u64,
}

/// 在职状态过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveState {
    Activo,
    Inactivo,
}

impl ActiveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveState::Activo => "activo",
            ActiveState::Inactivo => "inactivo",
        }
    }
}

// ==========================================
// PersonFilters - 列表过滤条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_persona: Option<PersonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busqueda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<ActiveState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// 默认分页大小
pub const DEFAULT_PAGE_SIZE: u32 = 50;

impl Default for PersonFilters {
    fn default() -> Self {
        Self {
            tipo_persona: None,
            busqueda: None,
            estado: None,
            skip: Some(0),
            limit: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PersonFilters {
    /// 转为查询参数（空值跳过，空白搜索词视为无）
    pub fn to_query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("tipo_persona", self.tipo_persona.map(|t| t.as_str().to_string())),
            (
                "busqueda",
                self.busqueda
                    .as_ref()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            ),
            ("estado", self.estado.map(|e| e.as_str().to_string())),
            ("skip", self.skip.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
        ]
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonPage {
    pub items: Vec<Person>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
}

// ==========================================
// 账号 DTO
// ==========================================

/// 为人员创建账号
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub id_persona: i64,
    pub usuario: String,
    pub correo: String,
    /// 不传则由后端生成临时密码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// 首次登录修改密码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub password_actual: String,
    pub password_nueva: String,
    pub password_confirmacion: String,
}

impl PasswordChange {
    pub fn confirmation_matches(&self) -> bool {
        self.password_nueva == self.password_confirmacion
    }
}

/// 管理员重置密码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub id_usuario: i64,
    pub generar_automatica: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_nueva: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedAccount {
    pub id_usuario: i64,
    pub id_persona: i64,
    pub usuario: String,
    pub correo: String,
    pub is_active: bool,
    pub requiere_cambio_password: bool,
}

/// 创建账号结果（含临时密码）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountWithCredentials {
    pub usuario: CreatedAccount,
    pub password_temporal: String,
    pub mensaje: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetResult {
    pub mensaje: String,
    pub usuario: String,
    pub password_temporal: String,
    pub advertencia: String,
}
