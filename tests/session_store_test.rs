// ==========================================
// SessionStore 集成测试
// ==========================================
// 测试范围:
// 1. 登录 → 权限 → 菜单 → 刷新令牌 → 注销 全流程
// 2. 重启后从 SQLite 令牌恢复会话
// 3. 失败路径: 错误密码、令牌失效、刷新被拒绝
// ==========================================

mod helpers;

use helpers::fake_services::{
    fake_client, FakeAuditLogService, FakeAuthService, FakePersonnelService,
};
use helpers::fixtures::*;
use school_admin_client::api::ApiError;
use school_admin_client::app::AppState;
use school_admin_client::config::ClientConfig;
use school_admin_client::domain::SystemModule;
use school_admin_client::storage::{KeyValueStore, SqliteKeyValueStore, TOKEN_KEY};
use school_admin_client::store::{SessionPhase, StoreEvent};
use std::path::Path;
use std::sync::Arc;

fn app_with(auth: Arc<FakeAuthService>, token_store: Arc<dyn KeyValueStore>) -> AppState {
    let client = fake_client(
        token_store.clone(),
        auth,
        Arc::new(FakeAuditLogService::default()),
        Arc::new(FakePersonnelService::default()),
    );
    AppState::from_client(ClientConfig::default(), token_store, client)
}

fn sqlite_store(path: &Path) -> Arc<dyn KeyValueStore> {
    Arc::new(SqliteKeyValueStore::open(path).expect("无法打开令牌存储"))
}

// ==========================================
// 全流程
// ==========================================

#[tokio::test]
async fn test_login_permissions_refresh_logout_flow() {
    let auth = Arc::new(
        FakeAuthService::new()
            .with_account("secretaria", "clave", login_data("T1", 5, "secretaria"))
            .with_permissions(secretary_permissions())
            .with_refreshed_token("T2"),
    );
    let dir = tempfile::tempdir().unwrap();
    let tokens = sqlite_store(&dir.path().join("client.db"));
    let app = app_with(auth.clone(), tokens.clone());
    let mut events = app.notifier.subscribe();

    // 登录
    let data = app.session.login("secretaria", "clave").await.unwrap();
    assert_eq!(data.usuario_id, 5);
    assert_eq!(app.session.phase(), SessionPhase::Authenticated);
    assert_eq!(tokens.get(TOKEN_KEY).unwrap().as_deref(), Some("T1"));
    assert_eq!(auth.calls(), vec!["login", "get_my_permissions"]);

    // 权限与菜单
    assert!(app.session.can_access_module("usuarios"));
    assert!(!app.session.can_access_module("administracion"));
    assert!(app.session.can_perform_action("Escritura"));
    assert!(app.session.has_permission("ver_reportes"));
    assert!(!app.session.has_permission("borrar_todo"));
    let menu = app.session.menu_modules();
    let ids: Vec<SystemModule> = menu.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![SystemModule::Usuarios, SystemModule::Reportes]);
    assert_eq!(menu[0].route, "usuarios");

    // 刷新令牌
    assert!(app.session.refresh_token().await);
    assert_eq!(app.session.token().as_deref(), Some("T2"));
    assert_eq!(tokens.get(TOKEN_KEY).unwrap().as_deref(), Some("T2"));

    // 注销
    app.session.logout().await;
    assert!(!app.session.is_authenticated());
    assert!(app.session.user().is_none());
    assert!(tokens.get(TOKEN_KEY).unwrap().is_none());
    assert!(app.session.menu_modules().is_empty());
    assert_eq!(auth.count("logout"), 1);

    // 至少收到会话与权限事件
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.contains(&StoreEvent::SessionChanged));
    assert!(seen.contains(&StoreEvent::PermissionsChanged));
}

#[tokio::test]
async fn test_wrong_password_leaves_no_session() {
    let auth = Arc::new(
        FakeAuthService::new().with_account("admin", "correcta", login_data("T1", 1, "admin")),
    );
    let dir = tempfile::tempdir().unwrap();
    let tokens = sqlite_store(&dir.path().join("client.db"));
    let app = app_with(auth.clone(), tokens.clone());

    let err = app.session.login("admin", "incorrecta").await.unwrap_err();

    match err {
        ApiError::Rejected { message } => {
            assert_eq!(message, "Usuario o contraseña incorrectos")
        }
        other => panic!("意外的错误类型: {:?}", other),
    }
    assert!(!app.session.is_authenticated());
    assert_eq!(app.session.phase(), SessionPhase::Unauthenticated);
    assert!(tokens.get(TOKEN_KEY).unwrap().is_none());
    // 没有令牌时不通知服务端
    assert_eq!(auth.count("logout"), 0);
}

#[tokio::test]
async fn test_administrator_sees_full_menu() {
    let auth = Arc::new(
        FakeAuthService::new()
            .with_account("director", "x", login_data("TA", 1, "director"))
            .with_permissions(admin_permissions()),
    );
    let app = app_with(auth, Arc::new(school_admin_client::storage::MemoryKeyValueStore::new()));

    app.session.login("director", "x").await.unwrap();

    assert!(app.session.is_administrator());
    assert!(app.session.can_access_module("administracion"));
    assert!(app.session.has_permission_in_module("incidentes", "Eliminar"));
    assert_eq!(app.session.menu_modules().len(), SystemModule::ALL.len());
}

// ==========================================
// 启动恢复
// ==========================================

#[tokio::test]
async fn test_restore_session_from_persisted_token() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("client.db");

    // 第一次运行: 登录后令牌写入 SQLite
    {
        let auth = Arc::new(
            FakeAuthService::new()
                .with_account("admin", "x", login_data("PERSIST", 1, "admin"))
                .with_permissions(secretary_permissions()),
        );
        let app = app_with(auth, sqlite_store(&db_path));
        app.session.login("admin", "x").await.unwrap();
    }

    // 第二次运行: 新实例读取同一文件
    let auth = Arc::new(
        FakeAuthService::new()
            .with_me(me_data(1, "admin"))
            .with_permissions(secretary_permissions()),
    );
    let app = app_with(auth.clone(), sqlite_store(&db_path));
    assert!(app.session.is_loading());

    app.session.restore_session().await;

    assert!(!app.session.is_loading());
    assert!(app.session.is_authenticated());
    assert_eq!(app.session.token().as_deref(), Some("PERSIST"));
    assert_eq!(app.session.user().unwrap().role_name, "Director");
    assert!(app.session.can_access_module("reportes"));
    assert_eq!(auth.calls(), vec!["get_me", "get_my_permissions"]);
}

#[tokio::test]
async fn test_restore_with_invalid_token_clears_storage() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = sqlite_store(&dir.path().join("client.db"));
    tokens.set(TOKEN_KEY, "EXPIRED").unwrap();

    let auth = Arc::new(FakeAuthService::new());
    let app = app_with(auth.clone(), tokens.clone());

    app.session.restore_session().await;

    assert!(!app.session.is_loading());
    assert!(!app.session.is_authenticated());
    assert!(tokens.get(TOKEN_KEY).unwrap().is_none());
    assert_eq!(auth.calls(), vec!["get_me", "logout"]);
}

#[tokio::test]
async fn test_restore_keeps_session_when_permissions_fail() {
    let tokens: Arc<dyn KeyValueStore> = Arc::new(
        school_admin_client::storage::MemoryKeyValueStore::with_entry(TOKEN_KEY, "T1"),
    );
    let auth = Arc::new(FakeAuthService::new().with_me(me_data(3, "prof")));
    let app = app_with(auth, tokens);

    app.session.restore_session().await;

    assert!(app.session.is_authenticated());
    assert!(app.session.permission_set().is_none());
    assert!(app.session.accessible_modules().is_empty());
    assert!(!app.session.can_access_module("usuarios"));
}

// ==========================================
// 刷新失败
// ==========================================

#[tokio::test]
async fn test_refresh_rejected_logs_out() {
    let auth = Arc::new(
        FakeAuthService::new()
            .with_account("admin", "x", login_data("T1", 1, "admin"))
            .with_permissions(secretary_permissions()),
    );
    let dir = tempfile::tempdir().unwrap();
    let tokens = sqlite_store(&dir.path().join("client.db"));
    let app = app_with(auth.clone(), tokens.clone());
    app.session.login("admin", "x").await.unwrap();

    assert!(!app.session.refresh_token().await);

    assert!(!app.session.is_authenticated());
    assert!(tokens.get(TOKEN_KEY).unwrap().is_none());
    assert_eq!(auth.count("logout"), 1);
}
