// ==========================================
// 学校管理系统 - 审计日志（bitácora）领域模型
// ==========================================
// 对齐: 后端 /api/bitacora/* 载荷
// 用途: 审计追踪列表、统计、导出
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// AuditRecord - 审计记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id_bitacora: i64,
    pub id_usuario_admin: i64,
    pub usuario: String,
    pub nombre_completo: String,
    pub accion: String,
    pub descripcion: String,
    pub fecha_hora: String,
    pub tipo_objetivo: Option<String>,
    pub id_objetivo: Option<i64>,
    #[serde(default)]
    pub icono: String,
}

// ==========================================
// AuditFilters - 查询过滤条件
// ==========================================
// 全部为空表示不过滤；后端会把“实际生效的过滤条件”原样回传
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario_admin: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_objetivo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_objetivo: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<String>,
}

impl AuditFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 转为查询参数（按固定顺序，空值跳过）
    pub fn to_query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("usuario_admin", self.usuario_admin.map(|v| v.to_string())),
            ("accion", self.accion.clone()),
            ("tipo_objetivo", self.tipo_objetivo.clone()),
            ("id_objetivo", self.id_objetivo.map(|v| v.to_string())),
            ("fecha_inicio", self.fecha_inicio.clone()),
            ("fecha_fin", self.fecha_fin.clone()),
        ]
    }
}

// ==========================================
// AuditPage - 分页结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPage {
    pub items: Vec<AuditRecord>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub filtros_aplicados: AuditFilters,
}

// ==========================================
// AuditStats - 统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStats {
    pub periodo: StatsPeriod,
    pub resumen: StatsSummary,
    #[serde(default)]
    pub acciones_comunes: Vec<ActionCount>,
    #[serde(default)]
    pub usuarios_activos: Vec<UserActivity>,
    #[serde(default)]
    pub por_tipo_objetivo: Vec<TargetCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPeriod {
    pub dias: u32,
    pub desde: String,
    pub hasta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_registros: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCount {
    pub accion: String,
    pub cantidad: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub usuario: String,
    pub cantidad: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCount {
    pub tipo: String,
    pub cantidad: u64,
}

/// 可用动作类型列表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionTypes {
    #[serde(default)]
    pub acciones: Vec<String>,
    #[serde(default)]
    pub total: u64,
}

// ==========================================
// ExportFormat - 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    /// 查询参数值，同时也是下载文件扩展名
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
        }
    }
}
