// ==========================================
// 学校管理系统 - 应用层
// ==========================================
// 职责: 组装存储、客户端与各仓库（应用根作用域，显式依赖注入）
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
