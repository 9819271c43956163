// ==========================================
// 学校管理系统 - 用户/角色/权限管理领域模型
// ==========================================
// 对齐: 后端用户管理载荷（id_usuario / id_rol / id_permiso）
// 附: 旧版前端格式投影（兼容仍使用旧字段名的界面）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// 主实体
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id_usuario: i64,
    pub id_persona: i64,
    pub usuario: String,
    pub correo: String,
    pub is_active: bool,
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
    #[serde(default)]
    pub ultimo_acceso: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id_rol: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub permisos: Option<Vec<Permission>>,
    #[serde(rename = "usuariosCount", default)]
    pub users_count: u32,
    #[serde(rename = "permisosCount", default)]
    pub permissions_count: u32,
    #[serde(rename = "fechaCreacion", default)]
    pub created_display: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

/// 权限动作（CRUD）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Crear,
    Leer,
    Actualizar,
    Eliminar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id_permiso: i64,
    pub codigo: String,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub modulo: String,
    pub accion: PermissionAction,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub updated_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleLink {
    pub id: i64,
    pub usuario_id: i64,
    pub rol_id: i64,
    pub fecha_asignacion: String,
}

/// 登录访问结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessOutcome {
    Exitoso,
    Fallido,
    Bloqueado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: i64,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    pub fecha: String,
    pub accion: String,
    pub ip: String,
    pub estado: AccessOutcome,
    #[serde(default)]
    pub detalles: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersStats {
    pub total_usuarios: u64,
    pub roles_activos: u64,
    pub total_permisos: u64,
    pub accesos_hoy: u64,
}

// ==========================================
// 创建/更新 DTO
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCreate {
    pub nombre: String,
    pub codigo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub modulo: String,
    pub accion: PermissionAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accion: Option<PermissionAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub nombre: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub id_persona: i64,
    pub usuario: String,
    pub correo: String,
    pub password: String,
}

// ==========================================
// 旧版前端格式投影
// ==========================================
// 缺失时间戳回退到调用方提供的 now

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUser {
    pub id: i64,
    pub nombre: String,
    pub username: String,
    pub email: String,
    pub rol: String,
    pub estado: String,
    pub ultimo_acceso: String,
    pub fecha_creacion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRole {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub usuarios_count: u32,
    pub permisos_count: u32,
    pub fecha_creacion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPermission {
    pub id: i64,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: String,
    pub modulo: String,
    pub accion: PermissionAction,
}

/// 无角色时展示的角色名
pub const NO_ROLE_LABEL: &str = "Sin rol";

impl UserAccount {
    pub fn to_legacy(&self, now: DateTime<Utc>) -> LegacyUser {
        let now = now.to_rfc3339();
        LegacyUser {
            id: self.id_usuario,
            nombre: self.usuario.clone(),
            username: self.usuario.clone(),
            email: self.correo.clone(),
            rol: self
                .roles
                .as_ref()
                .and_then(|roles| roles.first())
                .map(|r| r.nombre.clone())
                .unwrap_or_else(|| NO_ROLE_LABEL.to_string()),
            estado: if self.is_active { "activo" } else { "inactivo" }.to_string(),
            ultimo_acceso: self.ultimo_acceso.clone().unwrap_or_else(|| now.clone()),
            fecha_creacion: self.fecha_creacion.clone().unwrap_or(now),
        }
    }
}

impl Role {
    pub fn to_legacy(&self, now: DateTime<Utc>) -> LegacyRole {
        LegacyRole {
            id: self.id_rol,
            nombre: self.nombre.clone(),
            descripcion: self.descripcion.clone(),
            usuarios_count: self.users_count,
            permisos_count: self.permissions_count,
            fecha_creacion: self
                .created_display
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| self.fecha_creacion.clone())
                .unwrap_or_else(|| now.to_rfc3339()),
        }
    }
}

impl Permission {
    pub fn to_legacy(&self) -> LegacyPermission {
        LegacyPermission {
            id: self.id_permiso,
            codigo: self.codigo.clone(),
            nombre: self.nombre.clone(),
            descripcion: self.descripcion.clone().unwrap_or_default(),
            modulo: self.modulo.clone(),
            accion: self.accion,
        }
    }
}
