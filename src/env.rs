//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。未设置的变量返回错误，
//! 调用方据此决定是否保留配置文件或默认值。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "HEYLINGO_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 本地化相关环境变量
pub mod localizer {
    use super::*;

    /// 远程服务根地址
    pub struct ApiBase;
    impl EnvVar<String> for ApiBase {
        const NAME: &'static str = "HEYLINGO_API_BASE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Base URL of the language catalog and translation API";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.trim_end_matches('/').to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API base must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 语言切换器根元素 id
    pub struct SwitcherId;
    impl EnvVar<String> for SwitcherId {
        const NAME: &'static str = "HEYLINGO_SWITCHER_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Element id of the injected language switcher";

        fn parse(value: &str) -> EnvResult<String> {
            let id = value.trim();
            if id.is_empty() || id.contains(char::is_whitespace) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Element id must be non-empty and contain no whitespace".to_string(),
                });
            }
            Ok(id.to_string())
        }
    }

    /// 缺省区域设置
    pub struct DefaultLocale;
    impl EnvVar<String> for DefaultLocale {
        const NAME: &'static str = "HEYLINGO_DEFAULT_LOCALE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Locale used to seed the selected language when the browser reports none";

        fn parse(value: &str) -> EnvResult<String> {
            let locale = value.trim();
            if locale.is_empty() || !locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid locale '{}'", value),
                });
            }
            Ok(locale.to_string())
        }
    }

    /// 单次远程调用期限
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "HEYLINGO_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = None;
        const DESCRIPTION: &'static str = "Deadline for each remote call in seconds (unset: no deadline)";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value, Self::NAME, 1, 600)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }

    /// 语言偏好数据库路径
    pub struct PreferencesPath;
    impl EnvVar<String> for PreferencesPath {
        const NAME: &'static str = "HEYLINGO_PREFERENCES_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the on-disk language preference store";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path must not be empty".to_string(),
                });
            }
            Ok(path.to_string())
        }
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        core::LogLevel::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT
    ));

    docs.push_str("\n## Localizer Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        localizer::ApiBase::NAME,
        localizer::ApiBase::DESCRIPTION,
        localizer::ApiBase::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        localizer::SwitcherId::NAME,
        localizer::SwitcherId::DESCRIPTION,
        localizer::SwitcherId::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        localizer::DefaultLocale::NAME,
        localizer::DefaultLocale::DESCRIPTION,
        localizer::DefaultLocale::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        localizer::RequestTimeout::NAME,
        localizer::RequestTimeout::DESCRIPTION,
        localizer::RequestTimeout::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        localizer::PreferencesPath::NAME,
        localizer::PreferencesPath::DESCRIPTION,
        localizer::PreferencesPath::DEFAULT
    ));

    docs
}
