// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持西班牙语（默认）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "es";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"es"、"en" 或 "zh-CN"）；不支持的语言回退为默认语言
pub fn set_locale(locale: &str) {
    if rust_i18n::available_locales!().iter().any(|l| *l == locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!("不支持的语言 '{}'，使用 {}", locale, DEFAULT_LOCALE);
        rust_i18n::set_locale(DEFAULT_LOCALE);
    }
}

/// 翻译消息（当前语言）
///
/// # 示例
/// ```no_run
/// use school_admin_client::i18n::t;
/// let msg = t("errors.audit_load");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（指定语言，不改变全局语言）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use school_admin_client::i18n::t_with_args;
/// let msg = t_with_args("app.session_restored", &[("usuario", "admin")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
