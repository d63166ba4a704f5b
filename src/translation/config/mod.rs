//! 本地化配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, LocalizerConfig};

/// 配置常量
pub mod constants {
    // 远程服务
    pub const DEFAULT_API_BASE: &str = "https://heylingo.io";
    pub const LANGUAGES_ENDPOINT: &str = "api/languages";
    pub const TRANSLATE_ENDPOINT: &str = "api/translate";

    // 语言偏好
    pub const DEFAULT_LOCALE: &str = "en-US";
    pub const SELECTED_LANGUAGE_KEY: &str = "selectedLanguage";
    pub const ORIGINAL_LANGUAGE_KEY: &str = "originalLanguage";
    pub const DEFAULT_PREFERENCES_PATH: &str = "~/.local/share/heylingo/preferences.redb";

    // 语言切换器根元素
    pub const SWITCHER_ID: &str = "languageSwitcher";

    // 参与翻译的元素
    pub const TRANSLATABLE_TAGS: &[&str] = &[
        "p", "li", "button", "a", "span", "h1", "h2", "h3", "h4", "h5", "h6",
    ];

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "heylingo.toml",
        ".heylingo.toml",
        "heylingo.json",
        "~/.config/heylingo/config.toml",
    ];
}

