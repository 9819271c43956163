// ==========================================
// 学校管理系统 - 领域模型层
// ==========================================
// 职责: 定义与后端载荷一一对应的数据结构
// 红线: 不含网络访问逻辑,不含状态管理逻辑
// ==========================================

pub mod api_response;
pub mod audit;
pub mod auth;
pub mod personnel;
pub mod users;

// 重导出核心类型
pub use api_response::ApiResponse;
pub use audit::{
    ActionTypes, AuditFilters, AuditPage, AuditRecord, AuditStats, ExportFormat,
};
pub use auth::{
    LoginData, LoginRequest, MeData, MenuEntry, PermissionDetail, PermissionSet,
    PermissionsData, RefreshData, Session, SessionUser, SystemModule,
};
pub use personnel::{
    AccountCreate, AccountInfo, AccountUpdate, AccountWithCredentials, ActiveState, CreatedAccount,
    PasswordChange, PasswordReset, PasswordResetResult, Person, PersonFilters, PersonPage,
    PersonStats, PersonType, DEFAULT_PAGE_SIZE,
};
pub use users::{Permission, PermissionAction, Role, UserAccount};
