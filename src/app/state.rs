// ==========================================
// 学校管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和仓库实例
// 说明: 不使用模块级全局单例；界面层持有 AppState 并按需 clone Arc
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::domain::ExportFormat;
use crate::storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
use crate::store::{AuditLogStore, PersonnelStore, SessionStore, StoreNotifier};

/// 应用状态
///
/// 包含客户端、通知器和所有仓库实例
#[derive(Clone)]
pub struct AppState {
    /// 启动配置
    pub config: ClientConfig,

    /// 令牌持久化
    pub token_store: Arc<dyn KeyValueStore>,

    /// 统一 API 客户端
    pub client: ApiClient,

    /// 仓库变更通知
    pub notifier: StoreNotifier,

    /// 会话/权限仓库
    pub session: Arc<SessionStore>,

    /// 审计日志仓库
    pub audit_log: Arc<AuditLogStore>,

    /// 人员仓库
    pub personnel: Arc<PersonnelStore>,
}

impl AppState {
    /// 创建 AppState，令牌保存在 config.storage_path 指向的 SQLite 文件
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        tracing::info!("初始化AppState，存储路径: {}", config.storage_path.display());
        let token_store: Arc<dyn KeyValueStore> =
            Arc::new(SqliteKeyValueStore::open(&config.storage_path)?);
        Self::with_token_store(config, token_store)
    }

    /// 令牌只保存在内存中（测试/临时会话）
    pub fn in_memory(config: ClientConfig) -> ApiResult<Self> {
        Self::with_token_store(config, Arc::new(MemoryKeyValueStore::new()))
    }

    pub fn with_token_store(
        config: ClientConfig,
        token_store: Arc<dyn KeyValueStore>,
    ) -> ApiResult<Self> {
        let client = ApiClient::http(&config, token_store.clone())?;
        Ok(Self::from_client(config, token_store, client))
    }

    /// 使用外部构建的客户端（可注入任意服务实现）
    pub fn from_client(
        config: ClientConfig,
        token_store: Arc<dyn KeyValueStore>,
        client: ApiClient,
    ) -> Self {
        let notifier = StoreNotifier::default();

        let session = Arc::new(SessionStore::new(
            client.auth(),
            token_store.clone(),
            notifier.clone(),
        ));
        let audit_log = Arc::new(AuditLogStore::with_page_size(
            client.audit_log(),
            notifier.clone(),
            config.page_size,
        ));
        let personnel = Arc::new(PersonnelStore::with_page_size(
            client.personnel(),
            notifier.clone(),
            config.page_size,
        ));

        tracing::info!("AppState初始化完成");

        Self {
            config,
            token_store,
            client,
            notifier,
            session,
            audit_log,
            personnel,
        }
    }

    /// 按当前审计筛选导出到配置的下载目录
    pub async fn export_audit_log(&self, format: ExportFormat) -> ApiResult<PathBuf> {
        self.audit_log
            .export(format, &self.config.download_dir)
            .await
    }
}
