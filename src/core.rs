use std::fs;
use std::io::{self, Read};
use std::path::Path;

use url::Url;

use crate::env::{self, EnvVar};
use crate::parsers::html::{find_elements, get_text_content, html_to_dom_detect};
use crate::parsers::serialize_document;
use crate::translation::{
    extract_segments, HtmlDocument, LanguageCatalog, LocalizationReport, PageContext,
    PageLocalizer, PreferenceStore, SegmentPayload, SegmentTranslator, TranslationError,
    TranslationResult,
};

/// 处理单个 HTML 文档的选项
#[derive(Debug, Default, Clone)]
pub struct LocalizeOptions {
    /// 页面的原始地址，决定站点与页面路径
    pub page_url: String,
    /// 模拟的浏览器区域设置
    pub browser_locale: Option<String>,
    /// 本地化之前先选中的语言（相当于在切换器中选择）
    pub language: Option<String>,
    /// 输入编码，缺省时按 `<meta charset>` 检测，最终退回 UTF-8
    pub input_encoding: Option<String>,
    pub silent: bool,
}

impl LocalizeOptions {
    pub fn page_url(&self) -> TranslationResult<Url> {
        Url::parse(&self.page_url).map_err(|e| {
            TranslationError::InvalidInput(format!("页面地址无效 '{}': {}", self.page_url, e))
        })
    }
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";
const DEFAULT_ENCODING: &str = "utf-8";

/// 读取输入文档，`-` 或缺省表示标准输入
pub fn read_input(target: Option<&str>) -> TranslationResult<Vec<u8>> {
    match target {
        None | Some("-") => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                return Err(TranslationError::InvalidInput(format!(
                    "文件不存在: {}",
                    path.display()
                )));
            }
            Ok(fs::read(path)?)
        }
    }
}

fn parse_input(data: &[u8], options: &LocalizeOptions) -> TranslationResult<(HtmlDocument, String)> {
    let fallback = options.input_encoding.as_deref().unwrap_or(DEFAULT_ENCODING);
    let (dom, encoding) = html_to_dom_detect(data, fallback)?;
    Ok((HtmlDocument::new(dom), encoding))
}

/// 只提取片段，不访问远程服务
pub fn collect_payloads(
    data: &[u8],
    options: &LocalizeOptions,
) -> TranslationResult<Vec<SegmentPayload>> {
    let page = PageContext::from_url(&options.page_url()?)?;
    let (doc, _) = parse_input(data, options)?;

    Ok(extract_segments(&doc, &page)
        .iter()
        .map(|segment| segment.payload())
        .collect())
}

/// 以 JSON 输出将要发送给翻译服务的片段
pub fn render_payloads(payloads: &[SegmentPayload]) -> TranslationResult<String> {
    Ok(serde_json::to_string_pretty(payloads)?)
}

/// 本地化文档并按原编码序列化
pub async fn localize_document<R, S>(
    localizer: &mut PageLocalizer<R, S>,
    data: &[u8],
    options: &LocalizeOptions,
) -> TranslationResult<(Vec<u8>, Option<String>, LocalizationReport)>
where
    R: LanguageCatalog + SegmentTranslator,
    S: PreferenceStore,
{
    let page_url = options.page_url()?;
    let (doc, encoding) = parse_input(data, options)?;

    if let Some(code) = options.language.as_deref() {
        localizer.select_language(code)?;
    }

    let report = localizer
        .localize(&doc, &page_url, options.browser_locale.as_deref())
        .await?;

    let title = get_title(&doc);
    let mut result = serialize_document(doc.dom(), &encoding)?;
    ensure_trailing_newline(&mut result);

    Ok((result, title, report))
}

/// 文档标题
pub fn get_title(doc: &HtmlDocument) -> Option<String> {
    find_elements(&doc.dom().document, &["title"])
        .first()
        .map(get_text_content)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

fn ensure_trailing_newline(result: &mut Vec<u8>) {
    if !result.ends_with(b"\n") {
        result.push(b'\n');
    }
}

/// 替换输出路径中的 `%title%` 与 `%lang%`
pub fn format_output_path(path: &str, document_title: Option<&str>, language: Option<&str>) -> String {
    let title = document_title.unwrap_or("");

    path.replace(
        "%title%",
        title
            .replace(['/', '\\'], "_")
            .replace('<', "[")
            .replace('>', "]")
            .replace(':', " - ")
            .replace('\"', "")
            .replace('|', "-")
            .replace('?', "")
            .trim_start_matches('.'),
    )
    .replace("%lang%", language.unwrap_or("original"))
}

/// 输出错误信息到标准错误
pub fn print_error_message(msg: &str) {
    if env::core::NoColor::get_or_default(false) {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// 输出提示信息到标准错误，保持标准输出只有文档内容
pub fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}
