// ==========================================
// 学校管理系统 - 客户端数据层核心库
// ==========================================
// 组成: 统一 API 客户端 + 会话/权限仓库 + 列表仓库 + 数据结构
// 技术栈: Rust + reqwest + SQLite（令牌持久化）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 与后端载荷对应的数据结构
pub mod domain;

// 持久化层 - 令牌 key/value
pub mod storage;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 传输层 - HTTP
pub mod transport;

// API 层 - 服务封装与统一客户端
pub mod api;

// 仓库层 - 状态缓存
pub mod store;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiClient, ApiError, ApiResult};
pub use app::AppState;
pub use config::ClientConfig;
pub use domain::{
    ApiResponse, AuditFilters, AuditRecord, ExportFormat, Person, PersonFilters, PersonType,
    PermissionSet, Session, SessionUser, SystemModule,
};
pub use storage::{KeyValueStore, TOKEN_KEY};
pub use store::{
    AuditLogStore, PersonnelStore, SessionPhase, SessionStore, StoreEvent, StoreNotifier,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Sistema de Administración Escolar";
