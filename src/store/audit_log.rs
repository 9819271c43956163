// ==========================================
// 学校管理系统 - 审计日志列表仓库
// ==========================================
// 错误策略:
// - load: 失败写入 error 字段（不抛出）
// - load_stats / load_action_types: 吞掉并记日志
// - export: 向上抛出
// 并发: 每次 load 领取递增序号，只有最新一次的响应会写回状态
// ==========================================

use crate::api::error::ApiResult;
use crate::api::AuditLogService;
use crate::domain::{AuditFilters, AuditRecord, AuditStats, ExportFormat, DEFAULT_PAGE_SIZE};
use crate::i18n::t;
use crate::store::error_message::describe_failure;
use crate::store::notifier::{StoreEvent, StoreNotifier};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 统计默认时间窗口（天）
pub const DEFAULT_STATS_DAYS: u32 = 7;

#[derive(Debug, Clone)]
struct AuditLogState {
    records: Vec<AuditRecord>,
    stats: Option<AuditStats>,
    action_types: Vec<String>,
    total: u64,
    page: u32,
    pages: u32,
    limit: u32,
    has_more: bool,
    active_filters: AuditFilters,
    is_loading: bool,
    is_loading_stats: bool,
    error: Option<String>,
}

impl AuditLogState {
    fn new(limit: u32) -> Self {
        Self {
            records: Vec::new(),
            stats: None,
            action_types: Vec::new(),
            total: 0,
            page: 1,
            pages: 1,
            limit,
            has_more: false,
            active_filters: AuditFilters::default(),
            is_loading: false,
            is_loading_stats: false,
            error: None,
        }
    }
}

/// 审计日志仓库
pub struct AuditLogStore {
    service: Arc<dyn AuditLogService>,
    notifier: StoreNotifier,
    state: RwLock<AuditLogState>,
    load_seq: AtomicU64,
    default_limit: u32,
}

impl AuditLogStore {
    pub fn new(service: Arc<dyn AuditLogService>, notifier: StoreNotifier) -> Self {
        Self::with_page_size(service, notifier, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        service: Arc<dyn AuditLogService>,
        notifier: StoreNotifier,
        page_size: u32,
    ) -> Self {
        let limit = page_size.max(1);
        Self {
            service,
            notifier,
            state: RwLock::new(AuditLogState::new(limit)),
            load_seq: AtomicU64::new(0),
            default_limit: limit,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuditLogState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuditLogState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn update<F>(&self, event: StoreEvent, mutate: F)
    where
        F: FnOnce(&mut AuditLogState),
    {
        mutate(&mut self.write());
        self.notifier.publish(event);
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载一页记录
    pub async fn load(&self, filters: AuditFilters, skip: u32) {
        let ticket = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let limit = self.read().limit;
        tracing::info!("加载审计记录: skip={} limit={} filtros={:?}", skip, limit, filters);

        self.update(StoreEvent::AuditLogChanged, |s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.service.query(&filters, skip, limit).await;

        if self.load_seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!("丢弃过期的审计记录响应: ticket={}", ticket);
            return;
        }

        match result {
            Ok(page) => {
                tracing::info!("审计记录已加载: {} / {}", page.items.len(), page.total);
                self.update(StoreEvent::AuditLogChanged, |s| {
                    s.records = page.items;
                    s.total = page.total;
                    s.page = page.page;
                    s.pages = page.pages;
                    s.has_more = page.has_more;
                    s.active_filters = page.filtros_aplicados;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                let message = describe_failure(&e, &t("errors.audit_load"));
                tracing::error!("加载审计记录失败 [{}]: {}", e.code(), e);
                self.update(StoreEvent::AuditLogChanged, |s| {
                    s.error = Some(message);
                    s.is_loading = false;
                });
            }
        }
    }

    /// 加载统计（失败只记日志）
    pub async fn load_stats(&self, days: u32) {
        self.update(StoreEvent::AuditStatsChanged, |s| s.is_loading_stats = true);

        match self.service.stats(days).await {
            Ok(stats) => {
                tracing::info!("审计统计已加载: dias={}", days);
                self.update(StoreEvent::AuditStatsChanged, |s| {
                    s.stats = Some(stats);
                    s.is_loading_stats = false;
                });
            }
            Err(e) => {
                tracing::warn!("加载审计统计失败: {}", e);
                self.update(StoreEvent::AuditStatsChanged, |s| s.is_loading_stats = false);
            }
        }
    }

    pub async fn load_default_stats(&self) {
        self.load_stats(DEFAULT_STATS_DAYS).await;
    }

    /// 加载可选动作类型（失败只记日志）
    pub async fn load_action_types(&self) {
        match self.service.action_types().await {
            Ok(types) => {
                tracing::info!("动作类型已加载: {}", types.len());
                self.update(StoreEvent::AuditLogChanged, |s| s.action_types = types);
            }
            Err(e) => tracing::warn!("加载动作类型失败: {}", e),
        }
    }

    // ==========================================
    // 筛选与分页
    // ==========================================

    pub async fn apply_filters(&self, filters: AuditFilters) {
        self.load(filters, 0).await;
    }

    pub async fn clear_filters(&self) {
        self.update(StoreEvent::AuditLogChanged, |s| {
            s.active_filters = AuditFilters::default()
        });
        self.load(AuditFilters::default(), 0).await;
    }

    /// 跳到第 n 页（n 从 1 开始，小于 1 按 1 处理）
    pub async fn change_page(&self, n: u32) {
        let (filters, skip) = {
            let state = self.read();
            (
                state.active_filters.clone(),
                n.max(1).saturating_sub(1).saturating_mul(state.limit),
            )
        };
        self.load(filters, skip).await;
    }

    /// 重新加载当前页与统计
    pub async fn refresh(&self) {
        let (filters, skip) = {
            let state = self.read();
            (
                state.active_filters.clone(),
                state.page.max(1).saturating_sub(1).saturating_mul(state.limit),
            )
        };
        futures::join!(self.load(filters, skip), self.load_default_stats());
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 按当前筛选导出，写入 dir/auditoria_<YYYY-MM-DD>.<ext>
    pub async fn export(&self, format: ExportFormat, dir: &Path) -> ApiResult<PathBuf> {
        let filters = self.active_filters();
        tracing::info!("导出审计记录: formato={}", format.as_str());

        let blob = self.service.export(&filters, format).await.map_err(|e| {
            tracing::error!("导出审计记录失败: {}", e);
            e
        })?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(export_file_name(format, &Utc::now().format("%Y-%m-%d").to_string()));
        tokio::fs::write(&path, &blob).await?;

        tracing::info!("审计记录已导出: {} ({} bytes)", path.display(), blob.len());
        Ok(path)
    }

    // ==========================================
    // 派生视图（不触发请求）
    // ==========================================

    pub fn records_by_action(&self, action: &str) -> Vec<AuditRecord> {
        self.filtered(|r| r.accion == action)
    }

    pub fn records_by_admin(&self, user_id: i64) -> Vec<AuditRecord> {
        self.filtered(|r| r.id_usuario_admin == user_id)
    }

    pub fn records_for_target(&self, kind: &str, id: i64) -> Vec<AuditRecord> {
        self.filtered(|r| r.tipo_objetivo.as_deref() == Some(kind) && r.id_objetivo == Some(id))
    }

    fn filtered<F>(&self, predicate: F) -> Vec<AuditRecord>
    where
        F: Fn(&AuditRecord) -> bool,
    {
        self.read()
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    // ==========================================
    // 状态维护
    // ==========================================

    pub fn clear_error(&self) {
        self.update(StoreEvent::AuditLogChanged, |s| s.error = None);
    }

    /// 恢复初始状态；进行中的 load 结果将被丢弃
    pub fn reset(&self) {
        self.load_seq.fetch_add(1, Ordering::SeqCst);
        let limit = self.default_limit;
        self.update(StoreEvent::AuditLogChanged, |s| *s = AuditLogState::new(limit));
        self.notifier.publish(StoreEvent::AuditStatsChanged);
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn records(&self) -> Vec<AuditRecord> {
        self.read().records.clone()
    }

    pub fn stats(&self) -> Option<AuditStats> {
        self.read().stats.clone()
    }

    pub fn action_types(&self) -> Vec<String> {
        self.read().action_types.clone()
    }

    pub fn total(&self) -> u64 {
        self.read().total
    }

    pub fn page(&self) -> u32 {
        self.read().page
    }

    pub fn pages(&self) -> u32 {
        self.read().pages
    }

    pub fn limit(&self) -> u32 {
        self.read().limit
    }

    pub fn has_more(&self) -> bool {
        self.read().has_more
    }

    pub fn active_filters(&self) -> AuditFilters {
        self.read().active_filters.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn is_loading_stats(&self) -> bool {
        self.read().is_loading_stats
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }
}

fn export_file_name(format: ExportFormat, date: &str) -> String {
    format!("auditoria_{}.{}", date, format.as_str())
}
