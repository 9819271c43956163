// ==========================================
// 学校管理系统 - 本地持久化层
// ==========================================
// 职责: 持久化 key/value 字符串（目前只有访问令牌）
// 写入方: 登录 / 刷新令牌 / 注销；读取方: 启动恢复会话 + HTTP 传输层
// ==========================================

pub mod error;
mod memory;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

/// 访问令牌的固定键名
pub const TOKEN_KEY: &str = "token";

/// 持久化 key/value 存储
///
/// 不对并发写入做保护；同一时刻只会有一个认证流程写令牌。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// 删除不存在的键不是错误
    fn remove(&self, key: &str) -> StorageResult<()>;
}
