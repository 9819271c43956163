// ==========================================
// 学校管理系统 - 客户端配置
// ==========================================
// 职责: 后端地址、超时、本地存储路径、下载目录、分页大小、语言
// 来源: 默认值 + 环境变量覆写
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::personnel::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;
use std::time::Duration;

/// 环境变量键
pub mod config_keys {
    pub const API_URL: &str = "SCHOOL_ADMIN_API_URL";
    pub const TIMEOUT_SECS: &str = "SCHOOL_ADMIN_TIMEOUT_SECS";
    pub const STORAGE_PATH: &str = "SCHOOL_ADMIN_STORAGE_PATH";
    pub const DOWNLOAD_DIR: &str = "SCHOOL_ADMIN_DOWNLOAD_DIR";
    pub const PAGE_SIZE: &str = "SCHOOL_ADMIN_PAGE_SIZE";
    pub const LOCALE: &str = "SCHOOL_ADMIN_LOCALE";
}

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOCALE: &str = "es";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// 后端根地址（不含末尾 /）
    pub base_url: String,
    pub timeout_secs: u64,
    /// 令牌等本地数据的 SQLite 文件
    pub storage_path: PathBuf,
    /// 导出文件保存目录
    pub download_dir: PathBuf,
    pub page_size: u32,
    pub locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_path: default_storage_path(),
            download_dir: default_download_dir(),
            page_size: DEFAULT_PAGE_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ClientConfig {
    /// 默认值 + 环境变量覆写
    ///
    /// 数值类环境变量解析失败时保留默认值并告警。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意来源读取覆写项（便于测试，不触碰进程环境变量）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = read(config_keys::API_URL) {
            config.base_url = url;
        }
        if let Some(raw) = read(config_keys::TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(v) => config.timeout_secs = v,
                Err(e) => tracing::warn!(
                    "{} 解析失败，使用默认值 {}: {}",
                    config_keys::TIMEOUT_SECS,
                    DEFAULT_TIMEOUT_SECS,
                    e
                ),
            }
        }
        if let Some(path) = read(config_keys::STORAGE_PATH) {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(dir) = read(config_keys::DOWNLOAD_DIR) {
            config.download_dir = PathBuf::from(dir);
        }
        if let Some(raw) = read(config_keys::PAGE_SIZE) {
            match raw.parse::<u32>() {
                Ok(v) => config.page_size = v,
                Err(e) => tracing::warn!(
                    "{} 解析失败，使用默认值 {}: {}",
                    config_keys::PAGE_SIZE,
                    DEFAULT_PAGE_SIZE,
                    e
                ),
            }
        }
        if let Some(locale) = read(config_keys::LOCALE) {
            config.locale = locale;
        }

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ApiError::InvalidInput("后端地址不能为空".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidInput(format!(
                "后端地址必须以 http:// 或 https:// 开头: {}",
                self.base_url
            )));
        }
        if self.page_size == 0 {
            return Err(ApiError::InvalidInput("分页大小必须大于 0".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ==========================================
// 默认路径辅助函数
// ==========================================

/// 默认本地存储路径
///
/// - 开发环境: 用户数据目录/school-admin-dev/client.db
/// - 生产环境: 用户数据目录/school-admin/client.db
/// - 拿不到用户数据目录时回退到 ./school_admin_client.db
pub fn default_storage_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => {
            let app_dir = if cfg!(debug_assertions) {
                "school-admin-dev"
            } else {
                "school-admin"
            };
            data_dir.join(app_dir).join("client.db")
        }
        None => PathBuf::from("./school_admin_client.db"),
    }
}

/// 默认导出目录：用户下载目录，回退到当前目录
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
