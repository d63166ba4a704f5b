//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::pipeline::collector::CollectorConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 本地化配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// 远程服务根地址
    pub api_base: String,
    /// 语言切换器根元素 id
    pub switcher_id: String,
    /// 没有浏览器语言时使用的区域设置
    pub default_locale: String,
    /// 单次远程调用的期限（秒），缺省表示不设期限
    pub request_timeout_secs: Option<u64>,
    /// 语言偏好数据库路径
    pub preferences_path: String,
    /// 参与翻译的标签
    pub translatable_tags: Vec<String>,
    /// 日志级别
    pub log_level: String,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            switcher_id: constants::SWITCHER_ID.to_string(),
            default_locale: constants::DEFAULT_LOCALE.to_string(),
            request_timeout_secs: None,
            preferences_path: constants::DEFAULT_PREFERENCES_PATH.to_string(),
            translatable_tags: constants::TRANSLATABLE_TAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_level: "info".to_string(),
        }
    }
}

impl LocalizerConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        url::Url::parse(&self.api_base).map_err(|e| {
            TranslationError::ConfigError(format!("API地址无效 '{}': {}", self.api_base, e))
        })?;

        if self.switcher_id.trim().is_empty() {
            return Err(TranslationError::ConfigError("切换器id不能为空".to_string()));
        }

        if self.translatable_tags.is_empty() {
            return Err(TranslationError::ConfigError("可翻译标签列表不能为空".to_string()));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(TranslationError::ConfigError("请求期限必须大于0".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{localizer, EnvVar};

        if let Ok(api_base) = localizer::ApiBase::get() {
            tracing::info!("环境变量覆盖 API 地址: {}", api_base);
            self.api_base = api_base;
        }

        if let Ok(switcher_id) = localizer::SwitcherId::get() {
            self.switcher_id = switcher_id;
        }

        if let Ok(locale) = localizer::DefaultLocale::get() {
            self.default_locale = locale;
        }

        if let Ok(timeout) = localizer::RequestTimeout::get() {
            self.request_timeout_secs = Some(timeout.as_secs());
        }

        if let Ok(path) = localizer::PreferencesPath::get() {
            self.preferences_path = path;
        }

        if let Ok(level) = crate::env::core::LogLevel::get() {
            self.log_level = level;
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// 展开 `~` 后的偏好数据库路径
    pub fn preferences_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.preferences_path).as_ref())
    }

    /// 片段收集器配置
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            translatable_tags: self.translatable_tags.clone(),
            switcher_id: self.switcher_id.clone(),
        }
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: LocalizerConfig,
    source: Option<String>,
}

impl ConfigManager {
    /// 创建新的配置管理器
    ///
    /// 找到的配置文件无法解析时返回错误，不会静默退回默认值。
    pub fn new() -> TranslationResult<Self> {
        let (mut config, source) = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config, source })
    }

    /// 从指定文件创建（仍然应用环境变量覆盖）
    pub fn from_file(path: &str) -> TranslationResult<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self {
            config,
            source: Some(path.to_string()),
        })
    }

    /// 获取配置
    pub fn get_config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// 实际加载的配置文件，使用默认配置时为 `None`
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn into_config(self) -> LocalizerConfig {
        self.config
    }

    /// 从搜索路径加载配置
    fn load_config() -> TranslationResult<(LocalizerConfig, Option<String>)> {
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                let config = Self::load_from_file(&expanded_path)
                    .map_err(|e| e.with_context(expanded_path.as_ref()))?;
                return Ok((config, Some(expanded_path.into_owned())));
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok((LocalizerConfig::default(), None))
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> TranslationResult<LocalizerConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = LocalizerConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
