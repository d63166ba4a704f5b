// 集成测试公共模块
//
// 提供HTML构建、假远程服务等共享工具

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{json, Map, Value};

use heylingo::parsers::html::html_to_dom;
use heylingo::parsers::serialize_document;
use heylingo::translation::client::{Catalog, Language, LanguageCatalog, SegmentTranslator};
use heylingo::translation::{
    HtmlDocument, LocalizerConfig, MemoryPreferenceStore, PageContext, PageLocalizer,
    SegmentPayload, TranslationError, TranslationResult,
};

/// HTML测试辅助工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn document(html: &str) -> HtmlDocument {
        HtmlDocument::new(html_to_dom(html.as_bytes(), "utf-8").expect("in-memory parse"))
    }

    pub fn serialize(doc: &HtmlDocument) -> String {
        String::from_utf8(serialize_document(doc.dom(), "utf-8").expect("serialize"))
            .expect("utf-8 output")
    }

    pub fn page() -> PageContext {
        PageContext::new("shop.example.com", "/products")
    }

    pub fn page_url() -> url::Url {
        url::Url::parse("https://shop.example.com/products?ref=home").expect("valid url")
    }

    /// 带导航、正文、页脚的商店页面
    pub fn shop_page() -> String {
        r#"<!DOCTYPE html>
<html>
<head><title>Shop</title></head>
<body>
  <header><nav><a href="/">Home</a><a href="/cart">Cart</a></nav></header>
  <main>
    <h1>Our products</h1>
    <p>Fresh   coffee, roasted <b>daily</b>.</p>
    <button>Subscribe</button>
    <p>   </p>
  </main>
  <footer><a href="/imprint">Imprint</a></footer>
</body>
</html>"#
            .to_string()
    }
}

/// 假远程服务收到的调用
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Languages {
        domain: String,
    },
    Translate {
        domain: String,
        target_lang: String,
        segments: Vec<SegmentPayload>,
    },
}

type Responder = Rc<dyn Fn(&str, &[SegmentPayload]) -> TranslationResult<Option<Value>>>;

/// 可编程的假远程服务
#[derive(Clone)]
pub struct FakeRemote {
    catalog: TranslationResult<Catalog>,
    responder: Responder,
    delay: Option<Duration>,
    calls: Rc<RefCell<Vec<RemoteCall>>>,
}

impl FakeRemote {
    /// 原始语言为 `original`，目标语言为 `targets` 的目录；译文为 "[语言] 原文"
    pub fn new(original: Option<&str>, targets: &[(&str, &str)]) -> Self {
        Self {
            catalog: Ok(Catalog {
                original_language: original.map(str::to_string),
                target_languages: Some(
                    targets
                        .iter()
                        .map(|(code, name)| Language::new(*code, *name))
                        .collect(),
                ),
            }),
            responder: Rc::new(|lang: &str, segments: &[SegmentPayload]| {
                Ok(Some(Self::echo_translations(lang, segments)))
            }),
            delay: None,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// 英语站点，可译为法语、德语
    pub fn english_site() -> Self {
        Self::new(Some("EN"), &[("EN", "English"), ("FR", "Français"), ("DE", "Deutsch")])
    }

    /// 目录响应中缺少目标语言列表
    pub fn without_targets(mut self) -> Self {
        if let Ok(catalog) = &mut self.catalog {
            catalog.target_languages = None;
        }
        self
    }

    pub fn failing_catalog(mut self, error: TranslationError) -> Self {
        self.catalog = Err(error);
        self
    }

    pub fn translate_with(
        mut self,
        responder: impl Fn(&str, &[SegmentPayload]) -> TranslationResult<Option<Value>> + 'static,
    ) -> Self {
        self.responder = Rc::new(responder);
        self
    }

    pub fn failing_translations(self, error: TranslationError) -> Self {
        self.translate_with(move |_, _| Err(error.clone()))
    }

    /// 每次远程调用前等待
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.borrow().clone()
    }

    pub fn translate_calls(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, RemoteCall::Translate { .. }))
            .collect()
    }

    pub fn echo_translations(lang: &str, segments: &[SegmentPayload]) -> Value {
        let mut map = Map::new();
        for segment in segments {
            map.insert(
                segment.id.to_string(),
                json!({ "translated_text": format!("[{}] {}", lang, segment.text) }),
            );
        }
        Value::Object(map)
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl LanguageCatalog for FakeRemote {
    async fn fetch_languages(&self, domain: &str) -> TranslationResult<Catalog> {
        self.calls.borrow_mut().push(RemoteCall::Languages {
            domain: domain.to_string(),
        });
        self.wait().await;
        self.catalog.clone()
    }
}

impl SegmentTranslator for FakeRemote {
    async fn fetch_translations(
        &self,
        domain: &str,
        target_lang: &str,
        segments: &[SegmentPayload],
    ) -> TranslationResult<Option<Value>> {
        self.calls.borrow_mut().push(RemoteCall::Translate {
            domain: domain.to_string(),
            target_lang: target_lang.to_string(),
            segments: segments.to_vec(),
        });
        self.wait().await;
        (self.responder)(target_lang, segments)
    }
}

/// 使用内存偏好存储的本地化器
pub fn localizer(
    remote: FakeRemote,
    store: MemoryPreferenceStore,
) -> PageLocalizer<FakeRemote, MemoryPreferenceStore> {
    PageLocalizer::new(LocalizerConfig::default(), remote, store)
}
