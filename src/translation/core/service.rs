//! 页面本地化编排
//!
//! 一次页面加载对应一次 [`PageLocalizer::localize`]：
//!
//! 1. 由页面URL得到站点上下文，缺少主机名时直接失败
//! 2. 尚未选择语言时，用浏览器区域设置初始化
//! 3. 语言目录阶段：记录原始语言，保留目标语言列表
//! 4. 翻译阶段：提取片段、请求译文、回填
//! 5. 设置文档语言，挂载语言切换器
//!
//! 远程调用严格顺序执行。除第1步外，任何阶段失败只会放弃该阶段，
//! 错误被记录并写入 [`LocalizationReport`]。

use std::fmt;
use std::future::Future;
use std::time::Instant;

use url::Url;

use crate::translation::client::{Language, LanguageCatalog, SegmentTranslator};
use crate::translation::config::LocalizerConfig;
use crate::translation::context::PageContext;
use crate::translation::document::DocumentView;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::pipeline::{apply_translations, CollectionStats, SegmentCollector};
use crate::translation::storage::{LanguagePreferences, PreferenceStore};
use crate::translation::switcher::{select_language, SwitcherAction, SwitcherModel};

/// 把浏览器区域设置转换为语言代码
///
/// 德语变体统一为 `DE`，其余区域设置原样保留。
pub fn locale_to_language(locale: &str) -> String {
    if locale.starts_with("de-") {
        "DE".to_string()
    } else {
        locale.to_string()
    }
}

/// 翻译阶段被跳过的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 没有选中的语言
    NoSelection,
    /// 选中的语言就是站点原始语言
    SameAsOriginal,
    /// 页面上没有可翻译的片段
    NoSegments,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NoSelection => "未选择语言",
            SkipReason::SameAsOriginal => "目标语言与原始语言相同",
            SkipReason::NoSegments => "没有可翻译的片段",
        };
        f.write_str(reason)
    }
}

/// 一次本地化的结果
#[derive(Debug, Clone, Default)]
pub struct LocalizationReport {
    pub page: Option<PageContext>,
    pub selected_language: Option<String>,
    pub original_language: Option<String>,
    /// 语言目录中的目标语言；目录阶段失败时为空
    pub available_languages: Vec<Language>,
    pub switcher_mounted: bool,
    pub segments_extracted: usize,
    pub segments_translated: usize,
    pub collection: CollectionStats,
    pub translation_skipped: Option<SkipReason>,
    pub catalog_error: Option<TranslationError>,
    pub translation_error: Option<TranslationError>,
}

/// 页面本地化器
pub struct PageLocalizer<R, S> {
    config: LocalizerConfig,
    remote: R,
    prefs: LanguagePreferences<S>,
    collector: SegmentCollector,
}

impl<R, S> PageLocalizer<R, S>
where
    R: LanguageCatalog + SegmentTranslator,
    S: PreferenceStore,
{
    pub fn new(config: LocalizerConfig, remote: R, store: S) -> Self {
        let collector = SegmentCollector::new(config.collector_config());
        Self {
            config,
            remote,
            prefs: LanguagePreferences::new(store),
            collector,
        }
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn preferences(&self) -> &LanguagePreferences<S> {
        &self.prefs
    }

    /// 用户在切换器中选择了新语言
    pub fn select_language(&self, code: &str) -> TranslationResult<SwitcherAction> {
        select_language(&self.prefs, code)
    }

    /// 本地化一个页面
    ///
    /// 只有页面URL缺少主机名时返回错误，此时文档与偏好都不会被改动。
    pub async fn localize<D: DocumentView>(
        &mut self,
        doc: &D,
        page_url: &Url,
        browser_locale: Option<&str>,
    ) -> TranslationResult<LocalizationReport> {
        let start_time = Instant::now();

        let page = PageContext::from_url(page_url).inspect_err(helpers::log_error)?;
        tracing::info!("开始本地化 {}{}", page.domain, page.page_path);

        let mut report = LocalizationReport {
            page: Some(page.clone()),
            ..Default::default()
        };

        self.seed_selection(browser_locale);

        // 语言目录阶段
        let switcher_options = match self.catalog_phase(&page).await {
            Ok(languages) => {
                report.available_languages = languages.clone().unwrap_or_default();
                languages
            }
            Err(e) => {
                helpers::log_error(&e);
                report.catalog_error = Some(e);
                None
            }
        };

        let selected = self.read_preference(self.prefs.selected());
        let original = self.read_preference(self.prefs.original());

        // 翻译阶段
        match self
            .translation_phase(doc, &page, selected.as_deref(), original.as_deref(), &mut report)
            .await
        {
            Ok(Some(reason)) => {
                tracing::info!("跳过翻译: {}", reason);
                report.translation_skipped = Some(reason);
            }
            Ok(None) => {}
            Err(e) => {
                helpers::log_error(&e);
                report.translation_error = Some(e);
            }
        }

        if let Some(lang) = &selected {
            doc.set_document_language(lang);
        }

        if let Some(options) = switcher_options {
            let model = SwitcherModel::new(&self.config.switcher_id, options, selected.clone());
            doc.mount_switcher(&model);
            report.switcher_mounted = true;
        }

        report.selected_language = selected;
        report.original_language = original;

        tracing::info!(
            "本地化完成: 提取 {} 个片段，回填 {} 个，耗时 {:?}",
            report.segments_extracted,
            report.segments_translated,
            start_time.elapsed()
        );
        Ok(report)
    }

    /// 尚未选择语言时用浏览器区域设置初始化
    fn seed_selection(&self, browser_locale: Option<&str>) {
        let locale = browser_locale
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
            .unwrap_or(self.config.default_locale.as_str());

        match self.prefs.seed_selected(&locale_to_language(locale)) {
            Ok(selected) => tracing::debug!("当前语言: {}", selected),
            Err(e) => helpers::log_error(&e.with_context("初始化语言选择")),
        }
    }

    fn read_preference(&self, value: TranslationResult<Option<String>>) -> Option<String> {
        value.unwrap_or_else(|e| {
            helpers::log_error(&e);
            None
        })
    }

    async fn catalog_phase(
        &self,
        page: &PageContext,
    ) -> TranslationResult<Option<Vec<Language>>> {
        let catalog = self
            .with_deadline("languages", self.remote.fetch_languages(&page.domain))
            .await?;

        if let Some(code) = &catalog.original_language {
            if self.prefs.selected()?.is_none() {
                self.prefs.set_selected(code)?;
            }
            self.prefs.set_original(code)?;
            tracing::debug!("站点原始语言: {}", code);
        }

        match &catalog.target_languages {
            Some(languages) => tracing::info!("语言目录包含 {} 种目标语言", languages.len()),
            None => tracing::warn!("语言目录缺少目标语言列表，不挂载切换器"),
        }
        Ok(catalog.target_languages)
    }

    async fn translation_phase<D: DocumentView>(
        &mut self,
        doc: &D,
        page: &PageContext,
        selected: Option<&str>,
        original: Option<&str>,
        report: &mut LocalizationReport,
    ) -> TranslationResult<Option<SkipReason>> {
        let Some(target_lang) = selected else {
            return Ok(Some(SkipReason::NoSelection));
        };

        if Some(target_lang) == original {
            return Ok(Some(SkipReason::SameAsOriginal));
        }

        let segments = self.collector.extract(doc, page);
        report.collection = self.collector.stats().clone();
        report.segments_extracted = segments.len();

        if segments.is_empty() {
            return Ok(Some(SkipReason::NoSegments));
        }

        let payloads: Vec<_> = segments.iter().map(|segment| segment.payload()).collect();
        tracing::info!("请求 {} 个片段的 {} 译文", payloads.len(), target_lang);

        let translations = self
            .with_deadline(
                "translate",
                self.remote
                    .fetch_translations(&page.domain, target_lang, &payloads),
            )
            .await?;

        report.segments_translated = apply_translations(doc, translations.as_ref(), &segments);
        Ok(None)
    }

    /// 按配置为单次远程调用加上期限
    async fn with_deadline<T>(
        &self,
        phase: &str,
        call: impl Future<Output = TranslationResult<T>>,
    ) -> TranslationResult<T> {
        match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|e| TranslationError::from(e).with_context(phase))?,
            None => call.await,
        }
    }
}
