use crate::db::{ensure_kv_schema, open_sqlite_connection};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::KeyValueStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

// ==========================================
// SqliteKeyValueStore - SQLite 持久化实现
// ==========================================
// 存储: client_kv 表 (key 主键 + value)
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// 打开（必要时创建）存储文件
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = open_sqlite_connection(path)
            .map_err(|e| StorageError::OpenError(format!("{}: {}", path.display(), e)))?;
        ensure_kv_schema(&conn)?;
        tracing::debug!("本地存储已打开: {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 从已有连接创建（会确保表存在）
    pub fn from_connection(conn: Connection) -> StorageResult<Self> {
        ensure_kv_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get_conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM client_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO client_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM client_kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
