// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，文案在 locales/*.yml
// 支持英文（默认）、韩文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
//       locale 一律显式传入，不依赖全局 locale
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["en", "ko", "zh-CN"];

pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 规范化语言代码，未知语言回退为默认语言
///
/// # 示例
/// ```
/// use aps_snapshot_analysis::i18n::normalize_locale;
/// assert_eq!(normalize_locale("KO"), "ko");
/// assert_eq!(normalize_locale("zh_cn"), "zh-CN");
/// assert_eq!(normalize_locale("fr"), "en");
/// ```
pub fn normalize_locale(locale: &str) -> String {
    let wanted = locale.trim().replace('_', "-");
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(&wanted))
        .unwrap_or(&DEFAULT_LOCALE)
        .to_string()
}

/// 翻译消息（带参数，指定语言）
pub fn t_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key, locale = locale).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
