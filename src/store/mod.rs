// ==========================================
// 学校管理系统 - 状态仓库层
// ==========================================
// 职责: 缓存已获取的数据 + 加载/错误标志，供界面层读取
// 架构: 界面 → Store → Service trait → HttpTransport
// 红线: 读锁/写锁不跨 .await 持有
// ==========================================

pub mod audit_log;
pub mod error_message;
pub mod notifier;
pub mod personnel;
pub mod session;

pub use audit_log::{AuditLogStore, DEFAULT_STATS_DAYS};
pub use error_message::describe_failure;
pub use notifier::{StoreEvent, StoreNotifier};
pub use personnel::{Pagination, PersonnelStore};
pub use session::{SessionPhase, SessionStore};
