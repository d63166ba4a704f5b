//! 本地化模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。除 `MissingContext` 外，所有错误只会
//! 让当前阶段（语言目录或翻译）被放弃，不会影响页面本身。

use std::fmt;

use thiserror::Error;

/// 本地化错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 缺少站点标识（页面URL没有主机名）
    #[error("缺少执行上下文: {0}")]
    MissingContext(String),

    /// 远程服务在响应中报告了错误
    #[error("远程服务错误: {0}")]
    RemoteService(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 偏好存储错误
    #[error("存储错误: {0}")]
    StorageError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::MissingContext(_) => ErrorSeverity::Critical,
            TranslationError::RemoteService(_) => ErrorSeverity::Error,
            TranslationError::NetworkError(_) => ErrorSeverity::Error,
            TranslationError::ParseError(_) => ErrorSeverity::Error,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::StorageError(_) => ErrorSeverity::Warning,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::MissingContext(_) => ErrorCategory::Context,
            TranslationError::RemoteService(_) => ErrorCategory::Service,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// 是否终止整个本地化流程（其余错误只放弃当前阶段）
    pub fn is_fatal(&self) -> bool {
        matches!(self, TranslationError::MissingContext(_))
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let new_msg = match &self {
            TranslationError::MissingContext(msg)
            | TranslationError::RemoteService(msg)
            | TranslationError::NetworkError(msg)
            | TranslationError::ParseError(msg)
            | TranslationError::TimeoutError(msg)
            | TranslationError::StorageError(msg)
            | TranslationError::ConfigError(msg)
            | TranslationError::InvalidInput(msg)
            | TranslationError::IoError(msg) => format!("{} (上下文: {})", msg, context),
        };

        match &mut self {
            TranslationError::MissingContext(ref mut msg)
            | TranslationError::RemoteService(ref mut msg)
            | TranslationError::NetworkError(ref mut msg)
            | TranslationError::ParseError(ref mut msg)
            | TranslationError::TimeoutError(ref mut msg)
            | TranslationError::StorageError(ref mut msg)
            | TranslationError::ConfigError(ref mut msg)
            | TranslationError::InvalidInput(ref mut msg)
            | TranslationError::IoError(ref mut msg) => *msg = new_msg,
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Context,
    Service,
    Network,
    Parsing,
    Timeout,
    Storage,
    Configuration,
    Input,
    Io,
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ParseError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else if error.is_decode() {
            TranslationError::ParseError(error.to_string())
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<url::ParseError> for TranslationError {
    fn from(error: url::ParseError) -> Self {
        TranslationError::InvalidInput(format!("URL解析错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

impl From<redb::Error> for TranslationError {
    fn from(error: redb::Error) -> Self {
        TranslationError::StorageError(error.to_string())
    }
}

macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TranslationError {
                fn from(error: $ty) -> Self {
                    TranslationError::from(redb::Error::from(error))
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("本地化信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("本地化警告: {}", error),
            ErrorSeverity::Error => tracing::error!("本地化错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("本地化严重错误: {}", error),
        }
    }
}
