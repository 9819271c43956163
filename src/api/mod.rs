// ==========================================
// 学校管理系统 - API 层
// ==========================================
// 职责: 各业务模块的服务封装 + 统一客户端,供状态仓库调用
// ==========================================

pub mod audit_service;
pub mod auth_service;
pub mod client;
pub(crate) mod envelope;
pub mod error;
pub mod personnel_service;

// 重导出核心类型
pub use audit_service::{AuditLogService, HttpAuditLogService};
pub use auth_service::{AuthService, HttpAuthService};
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use personnel_service::{HttpPersonnelService, PersonnelService};

#[cfg(test)]
pub use audit_service::MockAuditLogService;
#[cfg(test)]
pub use auth_service::MockAuthService;
#[cfg(test)]
pub use personnel_service::MockPersonnelService;
