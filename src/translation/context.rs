//! 页面上下文（站点标识）

use url::Url;

use crate::translation::error::{TranslationError, TranslationResult};

/// 片段所属的站点与页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// 站点主机名
    pub domain: String,
    /// 页面路径（不含查询串和片段）
    pub page_path: String,
}

impl PageContext {
    pub fn new(domain: impl Into<String>, page_path: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            page_path: page_path.into(),
        }
    }

    /// 从页面URL中取主机名与路径
    ///
    /// 没有主机名的URL（`file:`、`data:` 等）没有可寻址的站点标识，返回
    /// [`TranslationError::MissingContext`]。
    pub fn from_url(url: &Url) -> TranslationResult<Self> {
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self::new(host, url.path())),
            _ => Err(TranslationError::MissingContext(format!(
                "页面URL缺少主机名: {}",
                url
            ))),
        }
    }

    pub fn parse(page_url: &str) -> TranslationResult<Self> {
        Self::from_url(&Url::parse(page_url)?)
    }
}
