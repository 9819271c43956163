// ==========================================
// 测试数据构造
// ==========================================
// 职责: 以后端 JSON 形状构造领域对象，保证与反序列化路径一致
// ==========================================

use school_admin_client::domain::{
    AuditRecord, LoginData, MeData, Person, PermissionsData,
};
use serde_json::json;

/// 登录成功数据
pub fn login_data(token: &str, user_id: i64, username: &str) -> LoginData {
    serde_json::from_value(json!({
        "access_token": token,
        "token_type": "bearer",
        "usuario_id": user_id,
        "usuario": username,
        "nombres": "Admin Principal",
        "rol": "Director",
        "permisos": ["ver_reportes"],
        "expires_in": 3600
    }))
    .expect("login fixture")
}

pub fn me_data(user_id: i64, username: &str) -> MeData {
    MeData {
        id_usuario: user_id,
        usuario: username.to_string(),
        nombres: Some("Admin Principal".to_string()),
        rol: Some("Director".to_string()),
        permisos: Some(vec!["ver_reportes".to_string()]),
    }
}

/// 普通用户权限: usuarios(Lectura/Escritura) + reportes(Lectura)
pub fn secretary_permissions() -> PermissionsData {
    serde_json::from_value(json!({
        "usuario": "secretaria",
        "permisos": [
            { "permiso": "Lectura", "modulo": "usuarios" },
            { "permiso": "Escritura", "modulo": "usuarios" },
            { "permiso": "Lectura", "modulo": "reportes" }
        ],
        "permisos_por_modulo": {
            "usuarios": ["Lectura", "Escritura"],
            "reportes": ["Lectura"]
        },
        "modulos_accesibles": ["usuarios", "reportes"],
        "acciones_disponibles": ["Lectura", "Escritura"],
        "es_administrador": false,
        "roles": ["Secretaria"]
    }))
    .expect("permissions fixture")
}

pub fn admin_permissions() -> PermissionsData {
    PermissionsData {
        es_administrador: true,
        roles: vec!["Administrador".to_string()],
        ..secretary_permissions()
    }
}

pub fn audit_record(id: i64, accion: &str, admin: i64, objetivo: Option<(&str, i64)>) -> AuditRecord {
    serde_json::from_value(json!({
        "id_bitacora": id,
        "id_usuario_admin": admin,
        "usuario": format!("admin{}", admin),
        "nombre_completo": "Admin",
        "accion": accion,
        "descripcion": format!("{} #{}", accion, id),
        "fecha_hora": "2026-10-01T08:30:00",
        "tipo_objetivo": objetivo.map(|o| o.0),
        "id_objetivo": objetivo.map(|o| o.1),
        "icono": "📝"
    }))
    .expect("audit fixture")
}

pub fn person(id: i64, tipo: &str, active: bool, with_account: bool) -> Person {
    serde_json::from_value(json!({
        "id_persona": id,
        "ci": format!("{}LP", 1000 + id),
        "nombres": format!("Nombre{}", id),
        "apellido_paterno": "Quispe",
        "apellido_materno": "Mamani",
        "nombre_completo": format!("Nombre{} Quispe Mamani", id),
        "correo": format!("persona{}@colegio.edu.bo", id),
        "tipo_persona": tipo,
        "is_active": active,
        "tiene_usuario": with_account,
        "usuario": if with_account { Some(format!("user{}", id)) } else { None },
        "id_usuario": if with_account { Some(100 + id) } else { None }
    }))
    .expect("person fixture")
}

/// 5 名人员: 3 名教师（1 名停用）、2 名行政（1 名有账号）
pub fn staff() -> Vec<Person> {
    vec![
        person(1, "profesor", true, true),
        person(2, "profesor", true, false),
        person(3, "profesor", false, false),
        person(4, "administrativo", true, true),
        person(5, "administrativo", true, false),
    ]
}
