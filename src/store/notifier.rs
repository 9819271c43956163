// ==========================================
// 学校管理系统 - 状态变更通知
// ==========================================
// 职责: 仓库字段变化后广播事件，界面层订阅后重新读取
// 机制: tokio broadcast，一个发布方多个订阅方
// ==========================================

use tokio::sync::broadcast;

/// 默认通道容量
pub const DEFAULT_CAPACITY: usize = 64;

/// 仓库变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    /// 会话建立/清除/令牌刷新/加载状态变化
    SessionChanged,
    PermissionsChanged,
    /// 审计日志列表、分页、筛选、错误、加载状态
    AuditLogChanged,
    AuditStatsChanged,
    /// 人员列表、统计、分页、筛选、错误、加载状态
    PersonnelChanged,
    PersonnelSelectionChanged,
}

/// 变更通知器（可 clone，共享同一通道）
#[derive(Debug, Clone)]
pub struct StoreNotifier {
    sender: broadcast::Sender<StoreEvent>,
}

impl StoreNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// 发布事件；没有订阅者时静默丢弃
    pub fn publish(&self, event: StoreEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("无订阅者，丢弃事件 {:?}", event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StoreNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = StoreNotifier::default();
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.publish(StoreEvent::SessionChanged);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let notifier = StoreNotifier::default();
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.clone().subscribe();

        notifier.publish(StoreEvent::AuditLogChanged);

        assert_eq!(rx1.recv().await.unwrap(), StoreEvent::AuditLogChanged);
        assert_eq!(rx2.recv().await.unwrap(), StoreEvent::AuditLogChanged);
    }
}
