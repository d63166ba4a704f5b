//! 远程服务客户端
//!
//! 语言目录与片段翻译两个远程调用。编排器只依赖 [`LanguageCatalog`] 与
//! [`SegmentTranslator`] 两个 trait，[`HttpRemoteClient`] 是基于 reqwest 的实现。

use std::future::Future;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::SegmentPayload;

/// 一种可选语言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogRequest<'a> {
    pub domain: &'a str,
}

/// 语言目录响应的原始形态
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub original_language: Option<CatalogLanguage>,
    #[serde(default)]
    pub target_languages: Option<Vec<Language>>,
}

/// 原始语言条目，`code` 可能缺失
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogLanguage {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// 校验后的语言目录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// 站点原始语言代码
    pub original_language: Option<String>,
    /// 响应缺少该列表时为 `None`，此时不挂载切换器
    pub target_languages: Option<Vec<Language>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest<'a> {
    pub domain: &'a str,
    pub target_lang: &'a str,
    pub segments: &'a [SegmentPayload],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub translations: Option<Value>,
}

/// 语言目录服务
pub trait LanguageCatalog {
    fn fetch_languages(&self, domain: &str) -> impl Future<Output = TranslationResult<Catalog>>;
}

/// 片段翻译服务
pub trait SegmentTranslator {
    /// 返回按片段 id 索引的译文映射（原样交给回填步骤）
    fn fetch_translations(
        &self,
        domain: &str,
        target_lang: &str,
        segments: &[SegmentPayload],
    ) -> impl Future<Output = TranslationResult<Option<Value>>>;
}

/// `error` 字段按 JavaScript 的真值规则判断
fn reported_error(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 解析语言目录响应
pub fn parse_catalog_response(body: &[u8]) -> TranslationResult<Catalog> {
    let response: CatalogResponse = serde_json::from_slice(body)?;

    if let Some(message) = reported_error(response.error.as_ref()) {
        return Err(TranslationError::RemoteService(message).with_context("languages"));
    }

    let original_language = response
        .original_language
        .and_then(|language| language.code)
        .filter(|code| !code.is_empty());

    Ok(Catalog {
        original_language,
        target_languages: response.target_languages,
    })
}

/// 解析翻译响应
pub fn parse_translate_response(body: &[u8]) -> TranslationResult<Option<Value>> {
    let response: TranslateResponse = serde_json::from_slice(body)?;

    if let Some(message) = reported_error(response.error.as_ref()) {
        return Err(TranslationError::RemoteService(message).with_context("translate"));
    }

    Ok(response.translations)
}

/// 基于 HTTP 的远程客户端
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
    api_base: Url,
}

impl HttpRemoteClient {
    pub fn new(api_base: &str) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("heylingo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, api_base)
    }

    /// 使用外部构建的 reqwest 客户端
    pub fn with_client(client: reqwest::Client, api_base: &str) -> TranslationResult<Self> {
        let mut api_base = Url::parse(api_base)?;
        // 保证 join 时保留已有的路径前缀
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }
        Ok(Self { client, api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn endpoint(&self, name: &str) -> TranslationResult<Url> {
        Ok(self.api_base.join(name)?)
    }

    async fn post_json<T: Serialize>(&self, endpoint: &str, body: &T) -> TranslationResult<Vec<u8>> {
        let url = self.endpoint(endpoint)?;
        let body = serde_json::to_vec(body)?;

        tracing::debug!("POST {} ({} 字节)", url, body.len());
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!("{} 返回 {} ({} 字节)", url, status, bytes.len());

        check_status(&url, status, &bytes)?;
        Ok(bytes.to_vec())
    }
}

/// 非 2xx 响应同样按正文中的 error 字段处理，正文不是 JSON 时报告状态码
fn check_status(url: &Url, status: StatusCode, body: &[u8]) -> TranslationResult<()> {
    if !status.is_success() && serde_json::from_slice::<Value>(body).is_err() {
        return Err(TranslationError::RemoteService(format!(
            "{} 返回 {}",
            url, status
        )));
    }
    Ok(())
}

impl LanguageCatalog for HttpRemoteClient {
    async fn fetch_languages(&self, domain: &str) -> TranslationResult<Catalog> {
        let body = self
            .post_json(constants::LANGUAGES_ENDPOINT, &CatalogRequest { domain })
            .await?;
        parse_catalog_response(&body)
    }
}

impl SegmentTranslator for HttpRemoteClient {
    async fn fetch_translations(
        &self,
        domain: &str,
        target_lang: &str,
        segments: &[SegmentPayload],
    ) -> TranslationResult<Option<Value>> {
        let request = TranslateRequest {
            domain,
            target_lang,
            segments,
        };
        let body = self
            .post_json(constants::TRANSLATE_ENDPOINT, &request)
            .await?;
        parse_translate_response(&body)
    }
}
