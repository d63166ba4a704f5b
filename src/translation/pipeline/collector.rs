//! 片段收集器
//!
//! 遍历页面中所有可翻译元素，计算指纹并按指纹分组。同一段文字以相同
//! 角色、相同结构路径重复出现时（例如分别挂载的几个相同组件里的 "Subscribe"
//! 按钮）只产生一个片段，其 `elements` 中记录全部元素，回填时一并替换。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::translation::config::constants;
use crate::translation::context::PageContext;
use crate::translation::document::DocumentView;

use super::fingerprint::{fingerprint_from_parts, Fingerprint};
use super::normalizer::trim_text;
use super::path::encode_path;
use super::role::{classify_role, Role};

/// 一段去重后的可翻译文本，以及本次提取中显示它的所有元素
#[derive(Debug, Clone)]
pub struct Segment<H> {
    pub id: Fingerprint,
    /// 首个元素去掉首尾空白后的可见文本
    pub text: String,
    pub role: Role,
    pub page_path: String,
    /// 不持有所有权的元素引用，每次提取重新构建
    pub elements: Vec<H>,
}

impl<H> Segment<H> {
    /// 发送给翻译服务的部分
    pub fn payload(&self) -> SegmentPayload {
        SegmentPayload {
            id: self.id.clone(),
            text: self.text.clone(),
            role: self.role,
            page_path: self.page_path.clone(),
        }
    }
}

/// 片段的线上表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPayload {
    pub id: Fingerprint,
    pub text: String,
    pub role: Role,
    pub page_path: String,
}

/// 收集器配置
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 参与翻译的标签
    pub translatable_tags: Vec<String>,
    /// 语言切换器根元素的 id，其子树永不参与翻译
    pub switcher_id: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            translatable_tags: constants::TRANSLATABLE_TAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            switcher_id: constants::SWITCHER_ID.to_string(),
        }
    }
}

/// 单次提取的统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub candidates: usize,
    pub excluded: usize,
    pub empty: usize,
    pub segments: usize,
    pub duplicates: usize,
}

/// 片段提取器
pub struct SegmentCollector {
    config: CollectorConfig,
    stats: CollectionStats,
}

impl SegmentCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            stats: CollectionStats::default(),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// 最近一次提取的统计
    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }

    /// 提取页面片段
    ///
    /// 返回顺序为各指纹在文档顺序遍历中首次出现的顺序。
    pub fn extract<D: DocumentView>(
        &mut self,
        doc: &D,
        page: &PageContext,
    ) -> Vec<Segment<D::Handle>> {
        self.stats = CollectionStats::default();

        let tags: Vec<&str> = self.config.translatable_tags.iter().map(String::as_str).collect();
        let mut segments: Vec<Segment<D::Handle>> = Vec::new();
        let mut index: HashMap<Fingerprint, usize> = HashMap::new();

        for element in doc.query_translatable(&tags) {
            self.stats.candidates += 1;

            if doc.is_within_id(&element, &self.config.switcher_id) {
                self.stats.excluded += 1;
                continue;
            }

            let visible = doc.text(&element);
            let text = trim_text(&visible);
            if text.is_empty() {
                self.stats.empty += 1;
                continue;
            }

            let role = classify_role(doc, &element);
            let path = encode_path(doc, &element);
            let id = fingerprint_from_parts(page, role, &path, text);

            match index.get(&id) {
                Some(&position) => {
                    self.stats.duplicates += 1;
                    segments[position].elements.push(element);
                }
                None => {
                    index.insert(id.clone(), segments.len());
                    segments.push(Segment {
                        id,
                        text: text.to_string(),
                        role,
                        page_path: page.page_path.clone(),
                        elements: vec![element],
                    });
                }
            }
        }

        self.stats.segments = segments.len();
        tracing::debug!(
            "片段提取完成: 候选 {} 个, 排除 {} 个, 空文本 {} 个, 片段 {} 个, 重复 {} 个",
            self.stats.candidates,
            self.stats.excluded,
            self.stats.empty,
            self.stats.segments,
            self.stats.duplicates
        );

        segments
    }
}

impl Default for SegmentCollector {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

/// 使用默认配置提取片段
pub fn extract_segments<D: DocumentView>(doc: &D, page: &PageContext) -> Vec<Segment<D::Handle>> {
    SegmentCollector::default().extract(doc, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::html_to_dom;
    use crate::translation::document::{HtmlDocument, MemoryDocument};

    fn document(html: &str) -> HtmlDocument {
        HtmlDocument::new(html_to_dom(html.as_bytes(), "utf-8").expect("parse"))
    }

    fn page() -> PageContext {
        PageContext::new("example.com", "/")
    }

    #[test]
    fn sibling_containers_keep_buttons_apart() {
        let doc = document(
            "<div><button>Subscribe</button></div>\
             <div><button>Subscribe</button></div>\
             <div><button>Subscribe</button></div>",
        );

        let segments = extract_segments(&doc, &page());

        // div 的 nth-of-type 不同，三个按钮位置各不相同
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn different_lineage_keeps_segments_apart() {
        let doc = document(
            "<section><div><button>Subscribe</button></div></section>\
             <aside><div><button>Subscribe</button></div></aside>",
        );
        let mut collector = SegmentCollector::default();

        let segments = collector.extract(&doc, &page());

        assert_eq!(segments.len(), 2);
        assert_eq!(collector.stats().duplicates, 0);
    }

    #[test]
    fn groups_identical_widgets_mounted_separately() {
        let doc = MemoryDocument::new();
        let mut buttons = Vec::new();
        for _ in 0..3 {
            let root = doc.add_root("div");
            let container = doc.append_element(root, "form");
            buttons.push(doc.append_text_element(container, "button", "Subscribe"));
        }
        let mut collector = SegmentCollector::default();

        let segments = collector.extract(&doc, &page());

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].elements, buttons);
        assert_eq!(segments[0].role, Role::Button);
        assert_eq!(collector.stats().duplicates, 2);
    }

    #[test]
    fn first_encounter_order_is_kept() {
        let doc = document("<h1>Title</h1><p>First</p><p>Second</p>");

        let texts: Vec<String> = extract_segments(&doc, &page())
            .into_iter()
            .map(|s| s.text)
            .collect();

        assert_eq!(texts, vec!["Title", "First", "Second"]);
    }

    #[test]
    fn text_is_trimmed_and_keeps_line_breaks() {
        let doc = document("<p>\u{feff}  Hello <br>  World  </p>");

        let segments = extract_segments(&doc, &page());

        assert_eq!(segments[0].text, "Hello\nWorld");
        assert_eq!(segments[0].page_path, "/");
    }

    #[test]
    fn stats_count_skipped_elements() {
        let doc = document(
            r#"<p> </p><span></span><p>Keep</p><div id="languageSwitcher"><span>EN</span></div>"#,
        );
        let mut collector = SegmentCollector::default();

        let segments = collector.extract(&doc, &page());

        assert_eq!(segments.len(), 1);
        assert_eq!(
            collector.stats(),
            &CollectionStats {
                candidates: 4,
                excluded: 1,
                empty: 2,
                segments: 1,
                duplicates: 0,
            }
        );
    }

    #[test]
    fn payload_omits_elements() {
        let doc = document("<nav><a>Home</a></nav>");
        let segments = extract_segments(&doc, &page());

        let json = serde_json::to_value(segments[0].payload()).unwrap();

        assert_eq!(json["text"], "Home");
        assert_eq!(json["role"], "nav");
        assert_eq!(json["page_path"], "/");
        assert!(json.get("elements").is_none());
    }
}
