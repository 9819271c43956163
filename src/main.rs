// ==========================================
// 学校管理系统 - 客户端主入口
// ==========================================
// 职责: 初始化日志/配置/语言，组装 AppState，恢复持久化会话并报告状态
// ==========================================

use anyhow::Context;
use school_admin_client::app::AppState;
use school_admin_client::config::ClientConfig;
use school_admin_client::i18n::{self, t, t_with_args};
use school_admin_client::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", school_admin_client::APP_NAME);
    tracing::info!("系统版本: {}", school_admin_client::VERSION);
    tracing::info!("==================================================");

    let config = ClientConfig::from_env();
    config.validate().context("客户端配置无效")?;
    i18n::set_locale(&config.locale);
    tracing::info!("后端地址: {}", config.base_url);

    let state = AppState::new(config).context("无法初始化AppState")?;

    state.session.restore_session().await;

    match state.session.user() {
        Some(user) => {
            tracing::info!(
                "{}",
                t_with_args("app.session_restored", &[("usuario", &user.username)])
            );
            let menu: Vec<String> = state
                .session
                .menu_modules()
                .into_iter()
                .map(|entry| entry.label)
                .collect();
            tracing::info!(
                "角色: {} | 管理员: {} | 菜单: {}",
                user.role_name,
                state.session.is_administrator(),
                menu.join(", ")
            );
        }
        None => tracing::info!("{}", t("app.no_session")),
    }

    Ok(())
}
