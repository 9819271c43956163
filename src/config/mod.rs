// ==========================================
// 学校管理系统 - 配置层
// ==========================================
// 职责: 客户端运行配置,支持环境变量覆写
// ==========================================

pub mod client_config;

// 重导出
pub use client_config::{
    config_keys, default_download_dir, default_storage_path, ClientConfig,
};
