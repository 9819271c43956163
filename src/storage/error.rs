// ==========================================
// 学校管理系统 - 本地存储错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 本地 key/value 存储错误
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("本地存储打开失败: {0}")]
    OpenError(String),

    #[error("本地存储锁获取失败: {0}")]
    LockError(String),

    #[error("本地存储读写失败: {0}")]
    QueryError(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => StorageError::QueryError(msg),
            _ => StorageError::QueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type StorageResult<T> = Result<T, StorageError>;
