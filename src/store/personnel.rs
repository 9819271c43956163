// ==========================================
// 学校管理系统 - 人员列表仓库
// ==========================================
// 错误策略:
// - load / load_all: 失败写入 error 字段（不抛出）
// - load_stats / find_by_ci / select_by_id: 吞掉并记日志
// - list_by_type: 向上抛出
// 并发: 与审计日志仓库相同，过期响应直接丢弃
// ==========================================

use crate::api::error::ApiResult;
use crate::api::PersonnelService;
use crate::domain::{Person, PersonFilters, PersonPage, PersonStats, PersonType, DEFAULT_PAGE_SIZE};
use crate::i18n::t;
use crate::store::error_message::describe_failure;
use crate::store::notifier::{StoreEvent, StoreNotifier};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
}

impl Pagination {
    fn empty(per_page: u32) -> Self {
        Self {
            total: 0,
            page: 1,
            per_page,
            pages: 0,
        }
    }
}

impl From<&PersonPage> for Pagination {
    fn from(page: &PersonPage) -> Self {
        Self {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            pages: page.pages,
        }
    }
}

#[derive(Debug, Clone)]
struct PersonnelState {
    persons: Vec<Person>,
    stats: Option<PersonStats>,
    selected: Option<Person>,
    is_loading: bool,
    error: Option<String>,
    pagination: Pagination,
    filters: PersonFilters,
}

impl PersonnelState {
    fn new(per_page: u32) -> Self {
        Self {
            persons: Vec::new(),
            stats: None,
            selected: None,
            is_loading: false,
            error: None,
            pagination: Pagination::empty(per_page),
            filters: PersonFilters {
                limit: Some(per_page),
                ..PersonFilters::default()
            },
        }
    }
}

/// 人员仓库
pub struct PersonnelStore {
    service: Arc<dyn PersonnelService>,
    notifier: StoreNotifier,
    state: RwLock<PersonnelState>,
    load_seq: AtomicU64,
    default_per_page: u32,
}

impl PersonnelStore {
    pub fn new(service: Arc<dyn PersonnelService>, notifier: StoreNotifier) -> Self {
        Self::with_page_size(service, notifier, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        service: Arc<dyn PersonnelService>,
        notifier: StoreNotifier,
        page_size: u32,
    ) -> Self {
        let per_page = page_size.max(1);
        Self {
            service,
            notifier,
            state: RwLock::new(PersonnelState::new(per_page)),
            load_seq: AtomicU64::new(0),
            default_per_page: per_page,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PersonnelState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PersonnelState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn update<F>(&self, event: StoreEvent, mutate: F)
    where
        F: FnOnce(&mut PersonnelState),
    {
        mutate(&mut self.write());
        self.notifier.publish(event);
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载一页人员
    pub async fn load(&self, filters: PersonFilters, skip: u32) {
        self.fetch_page(filters, skip, "errors.personnel_load").await;
    }

    /// 加载人员列表，成功后再加载统计（统计失败只告警）
    pub async fn load_all(&self, filters: PersonFilters) {
        let skip = filters.skip.unwrap_or(0);
        if !self.fetch_page(filters, skip, "errors.personnel_load_all").await {
            return;
        }
        match self.service.stats().await {
            Ok(stats) => self.update(StoreEvent::PersonnelChanged, |s| s.stats = Some(stats)),
            Err(e) => tracing::warn!("人员统计加载失败（忽略）: {}", e),
        }
    }

    /// 返回是否成功写入了本次结果
    async fn fetch_page(&self, filters: PersonFilters, skip: u32, fallback_key: &str) -> bool {
        let ticket = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let request = PersonFilters {
            skip: Some(skip),
            limit: Some(self.read().pagination.per_page),
            ..filters
        };
        tracing::info!("加载人员: {:?}", request);

        self.update(StoreEvent::PersonnelChanged, |s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.service.list(&request).await;

        if self.load_seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!("丢弃过期的人员响应: ticket={}", ticket);
            return false;
        }

        match result {
            Ok(page) => {
                tracing::info!("人员已加载: {} (total={})", page.items.len(), page.total);
                self.update(StoreEvent::PersonnelChanged, |s| {
                    s.pagination = Pagination::from(&page);
                    s.persons = page.items;
                    s.filters = request;
                    s.is_loading = false;
                });
                true
            }
            Err(e) => {
                let message = describe_failure(&e, &t(fallback_key));
                tracing::error!("加载人员失败 [{}]: {}", e.code(), e);
                self.update(StoreEvent::PersonnelChanged, |s| {
                    s.error = Some(message);
                    s.is_loading = false;
                });
                false
            }
        }
    }

    /// 加载统计（失败只记日志）
    pub async fn load_stats(&self) {
        match self.service.stats().await {
            Ok(stats) => {
                tracing::info!("人员统计已加载: total={}", stats.total_personas);
                self.update(StoreEvent::PersonnelChanged, |s| s.stats = Some(stats));
            }
            Err(e) => tracing::warn!("加载人员统计失败: {}", e),
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按 CI 查找；任何失败都视为未找到
    pub async fn find_by_ci(&self, ci: &str) -> Option<Person> {
        match self.service.find_by_ci(ci).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("按 CI 查找失败: {}", e);
                None
            }
        }
    }

    pub async fn list_by_type(&self, person_type: PersonType) -> ApiResult<Vec<Person>> {
        self.service.list_by_type(person_type).await
    }

    // ==========================================
    // 选中
    // ==========================================

    pub fn select(&self, person: Option<Person>) {
        self.update(StoreEvent::PersonnelSelectionChanged, |s| s.selected = person);
    }

    pub async fn select_by_id(&self, id_persona: i64) {
        let selected = match self.service.get(id_persona).await {
            Ok(person) => Some(person),
            Err(e) => {
                tracing::error!("获取人员失败: id_persona={} {}", id_persona, e);
                None
            }
        };
        self.select(selected);
    }

    pub fn clear_selection(&self) {
        self.select(None);
    }

    // ==========================================
    // 筛选与分页
    // ==========================================

    pub async fn apply_filters(&self, filters: PersonFilters) {
        self.load(filters, 0).await;
    }

    pub async fn clear_filters(&self) {
        self.load(PersonFilters::default(), 0).await;
    }

    /// 跳到第 n 页（n 从 1 开始，小于 1 按 1 处理）
    pub async fn change_page(&self, n: u32) {
        let (filters, skip) = {
            let state = self.read();
            (
                state.filters.clone(),
                n.max(1)
                    .saturating_sub(1)
                    .saturating_mul(state.pagination.per_page),
            )
        };
        self.load(filters, skip).await;
    }

    // ==========================================
    // 本地查找（当前页）
    // ==========================================

    pub fn person_by_id(&self, id_persona: i64) -> Option<Person> {
        self.read()
            .persons
            .iter()
            .find(|p| p.id_persona == id_persona)
            .cloned()
    }

    /// CI 是否已被其他人员使用
    pub fn ci_exists(&self, ci: &str, exclude_id: Option<i64>) -> bool {
        self.read()
            .persons
            .iter()
            .any(|p| p.ci == ci && Some(p.id_persona) != exclude_id)
    }

    pub fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> bool {
        self.read()
            .persons
            .iter()
            .any(|p| p.correo.as_deref() == Some(email) && Some(p.id_persona) != exclude_id)
    }

    // ==========================================
    // 派生视图
    // ==========================================

    pub fn professors(&self) -> Vec<Person> {
        self.filtered(|p| p.tipo_persona == PersonType::Profesor)
    }

    pub fn administrative(&self) -> Vec<Person> {
        self.filtered(|p| p.tipo_persona == PersonType::Administrativo)
    }

    pub fn active(&self) -> Vec<Person> {
        self.filtered(|p| p.is_active)
    }

    pub fn inactive(&self) -> Vec<Person> {
        self.filtered(|p| !p.is_active)
    }

    pub fn with_account(&self) -> Vec<Person> {
        self.filtered(|p| p.tiene_usuario)
    }

    pub fn without_account(&self) -> Vec<Person> {
        self.filtered(|p| !p.tiene_usuario)
    }

    fn filtered<F>(&self, predicate: F) -> Vec<Person>
    where
        F: Fn(&Person) -> bool,
    {
        self.read()
            .persons
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }

    // ==========================================
    // 状态维护
    // ==========================================

    pub fn clear_error(&self) {
        self.update(StoreEvent::PersonnelChanged, |s| s.error = None);
    }

    /// 恢复初始状态；进行中的 load 结果将被丢弃
    pub fn reset(&self) {
        self.load_seq.fetch_add(1, Ordering::SeqCst);
        let per_page = self.default_per_page;
        self.update(StoreEvent::PersonnelChanged, |s| *s = PersonnelState::new(per_page));
        self.notifier.publish(StoreEvent::PersonnelSelectionChanged);
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn persons(&self) -> Vec<Person> {
        self.read().persons.clone()
    }

    pub fn stats(&self) -> Option<PersonStats> {
        self.read().stats.clone()
    }

    pub fn selected(&self) -> Option<Person> {
        self.read().selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.read().pagination
    }

    pub fn filters(&self) -> PersonFilters {
        self.read().filters.clone()
    }
}
