//! 本地化流程集成测试
//!
//! 使用假远程服务与内存偏好存储驱动完整的页面本地化

use std::time::Duration;

use heylingo::translation::error::ErrorCategory;
use heylingo::translation::{
    DocumentView, LocalizerConfig, MemoryPreferenceStore, PageLocalizer, PreferenceStore,
    SkipReason, SwitcherAction, TranslationError,
};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{localizer, FakeRemote, HtmlTestHelper, RemoteCall};

fn store_with(selected: Option<&str>, original: Option<&str>) -> MemoryPreferenceStore {
    let store = MemoryPreferenceStore::new();
    if let Some(selected) = selected {
        store.set("selectedLanguage", selected).unwrap();
    }
    if let Some(original) = original {
        store.set("originalLanguage", original).unwrap();
    }
    store
}

fn html_lang(doc: &heylingo::translation::HtmlDocument) -> Option<String> {
    let html = doc.query_translatable(&["html"]).remove(0);
    doc.attribute(&html, "lang")
}

#[tokio::test]
async fn test_german_visitor_gets_translated_page() {
    let store = MemoryPreferenceStore::new();
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());
    let doc = HtmlTestHelper::document(&HtmlTestHelper::shop_page());

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), Some("de-AT"))
        .await
        .unwrap();

    assert_eq!(report.selected_language.as_deref(), Some("DE"));
    assert_eq!(report.original_language.as_deref(), Some("EN"));
    assert_eq!(report.segments_extracted, 6);
    assert_eq!(report.segments_translated, 6);
    assert!(report.switcher_mounted);
    assert!(report.catalog_error.is_none() && report.translation_error.is_none());

    assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("DE"));
    assert_eq!(store.get("originalLanguage").unwrap().as_deref(), Some("EN"));
    assert_eq!(html_lang(&doc).as_deref(), Some("DE"));

    let html = HtmlTestHelper::serialize(&doc);
    assert!(html.contains("<h1>[DE] Our products</h1>"));
    assert!(html.contains("<button>[DE] Subscribe</button>"));
}

#[tokio::test]
async fn test_remote_calls_are_sequential_and_scoped_to_site() {
    let mut localizer = localizer(FakeRemote::english_site(), store_with(Some("FR"), None));
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    let calls = localizer.remote().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        RemoteCall::Languages {
            domain: "shop.example.com".to_string()
        }
    );
    match &calls[1] {
        RemoteCall::Translate {
            domain,
            target_lang,
            segments,
        } => {
            assert_eq!(domain, "shop.example.com");
            assert_eq!(target_lang, "FR");
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].text, "Hello");
            assert_eq!(segments[0].page_path, "/products");
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_existing_choice_wins_over_browser_locale() {
    let store = store_with(Some("FR"), None);
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());
    let doc = HtmlTestHelper::document("<p>Hello</p>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), Some("de-DE"))
        .await
        .unwrap();

    assert_eq!(report.selected_language.as_deref(), Some("FR"));
    assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("FR"));
}

#[tokio::test]
async fn test_missing_locale_seeds_default() {
    let store = MemoryPreferenceStore::new();
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());
    let doc = HtmlTestHelper::document("<p>Hello</p>");

    localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("en-US"));
}

#[tokio::test]
async fn test_original_language_page_is_left_alone() {
    let mut localizer = localizer(FakeRemote::english_site(), store_with(Some("EN"), None));
    let doc = HtmlTestHelper::document(&HtmlTestHelper::shop_page());

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(report.translation_skipped, Some(SkipReason::SameAsOriginal));
    assert!(localizer.remote().translate_calls().is_empty());
    assert_eq!(html_lang(&doc).as_deref(), Some("EN"));
    assert!(report.switcher_mounted);
    assert!(HtmlTestHelper::serialize(&doc).contains("<h1>Our products</h1>"));
}

#[tokio::test]
async fn test_page_without_text_skips_translation() {
    let mut localizer = localizer(FakeRemote::english_site(), store_with(Some("FR"), None));
    let doc = HtmlTestHelper::document("<body><div><img src='a.png'></div><p> </p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(report.translation_skipped, Some(SkipReason::NoSegments));
    assert_eq!(report.collection.empty, 1);
    assert!(localizer.remote().translate_calls().is_empty());
}

#[tokio::test]
async fn test_catalog_error_leaves_preferences_and_ui_untouched() {
    let store = store_with(Some("FR"), None);
    let remote = FakeRemote::english_site()
        .failing_catalog(TranslationError::RemoteService("unknown domain".to_string()));
    let mut localizer = localizer(remote, store.clone());
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert!(report.catalog_error.is_some());
    assert!(!report.switcher_mounted);
    assert!(report.available_languages.is_empty());
    assert_eq!(store.get("originalLanguage").unwrap(), None);

    // 翻译阶段不依赖目录阶段
    assert_eq!(report.segments_translated, 1);
    assert_eq!(html_lang(&doc).as_deref(), Some("FR"));
    assert!(!HtmlTestHelper::serialize(&doc).contains("languageSwitcher"));
}

#[tokio::test]
async fn test_translation_error_applies_nothing() {
    let remote = FakeRemote::english_site()
        .failing_translations(TranslationError::RemoteService("quota exceeded".to_string()));
    let mut localizer = localizer(remote, store_with(Some("DE"), None));
    let doc = HtmlTestHelper::document(&HtmlTestHelper::shop_page());

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    let error = report.translation_error.expect("translation error");
    assert_eq!(error.category(), ErrorCategory::Service);
    assert_eq!(report.segments_translated, 0);

    let html = HtmlTestHelper::serialize(&doc);
    assert!(html.contains("<h1>Our products</h1>"));
    assert!(html.contains("languageSwitcher"));
    assert_eq!(html_lang(&doc).as_deref(), Some("DE"));
}

#[tokio::test]
async fn test_partial_translations_are_tolerated() {
    let remote = FakeRemote::english_site().translate_with(|lang, segments| {
        let mut payload = FakeRemote::echo_translations(lang, segments);
        let first = segments[0].id.to_string();
        payload.as_object_mut().unwrap().remove(&first);
        Ok(Some(payload))
    });
    let mut localizer = localizer(remote, store_with(Some("FR"), None));
    let doc = HtmlTestHelper::document(&HtmlTestHelper::shop_page());

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(report.segments_extracted, 6);
    assert_eq!(report.segments_translated, 5);
    assert!(report.translation_error.is_none());

    let html = HtmlTestHelper::serialize(&doc);
    assert!(html.contains(">Home</a>"));
    assert!(html.contains(">[FR] Cart</a>"));
}

#[tokio::test]
async fn test_url_without_host_aborts_before_any_work() {
    let store = MemoryPreferenceStore::new();
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());
    let doc = HtmlTestHelper::document("<p>Hello</p>");
    let before = HtmlTestHelper::serialize(&doc);

    let url = url::Url::parse("file:///home/user/page.html").unwrap();
    let error = localizer.localize(&doc, &url, Some("de-DE")).await.unwrap_err();

    assert!(error.is_fatal());
    assert!(localizer.remote().calls().is_empty());
    assert_eq!(store.get("selectedLanguage").unwrap(), None);
    assert_eq!(HtmlTestHelper::serialize(&doc), before);
}

#[tokio::test]
async fn test_switcher_lists_catalog_and_marks_selection() {
    let mut localizer = localizer(FakeRemote::english_site(), store_with(Some("DE"), None));
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(report.available_languages.len(), 3);
    let html = HtmlTestHelper::serialize(&doc);
    assert!(html.contains(
        "<div id=\"languageSwitcher\"><select>\
         <option value=\"EN\">English</option>\
         <option value=\"FR\">Français</option>\
         <option value=\"DE\" selected=\"\">Deutsch</option>\
         </select></div>"
    ));
}

#[tokio::test]
async fn test_selecting_a_language_takes_effect_after_reload() {
    let store = store_with(Some("DE"), None);
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());

    let first = HtmlTestHelper::document("<body><p>Hello</p></body>");
    localizer
        .localize(&first, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(localizer.select_language("FR").unwrap(), SwitcherAction::Reload);

    let reloaded = HtmlTestHelper::document("<body><p>Hello</p></body>");
    let report = localizer
        .localize(&reloaded, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(report.selected_language.as_deref(), Some("FR"));
    assert!(HtmlTestHelper::serialize(&reloaded).contains("<p>[FR] Hello</p>"));
}

#[tokio::test]
async fn test_deadline_abandons_slow_calls() {
    let config = LocalizerConfig {
        request_timeout_secs: Some(1),
        ..LocalizerConfig::default()
    };
    let remote = FakeRemote::english_site().delayed(Duration::from_secs(3));
    let mut localizer = PageLocalizer::new(config, remote, store_with(Some("FR"), None));
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(
        report.catalog_error.map(|e| e.category()),
        Some(ErrorCategory::Timeout)
    );
    assert_eq!(
        report.translation_error.map(|e| e.category()),
        Some(ErrorCategory::Timeout)
    );
    assert!(HtmlTestHelper::serialize(&doc).contains("<p>Hello</p>"));
    assert_eq!(html_lang(&doc).as_deref(), Some("FR"));
}

#[tokio::test]
async fn test_empty_stored_selection_is_reseeded() {
    let store = store_with(Some(""), Some(""));
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), Some("fr-FR"))
        .await
        .unwrap();

    assert_eq!(report.selected_language.as_deref(), Some("fr-FR"));
    assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("fr-FR"));
    assert_eq!(html_lang(&doc).as_deref(), Some("fr-FR"));

    match &localizer.remote().translate_calls()[0] {
        RemoteCall::Translate { target_lang, .. } => assert_eq!(target_lang, "fr-FR"),
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_overwrites_stale_original_language() {
    let store = store_with(Some("FR"), Some("DE"));
    let mut localizer = localizer(FakeRemote::english_site(), store.clone());
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert_eq!(store.get("originalLanguage").unwrap().as_deref(), Some("EN"));
    assert_eq!(report.original_language.as_deref(), Some("EN"));
    assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("FR"));
    assert_eq!(report.segments_translated, 1);
}

#[tokio::test]
async fn test_catalog_without_target_list_mounts_no_switcher() {
    let store = store_with(Some("FR"), None);
    let mut localizer = localizer(FakeRemote::english_site().without_targets(), store.clone());
    let doc = HtmlTestHelper::document("<body><p>Hello</p></body>");

    let report = localizer
        .localize(&doc, &HtmlTestHelper::page_url(), None)
        .await
        .unwrap();

    assert!(report.catalog_error.is_none());
    assert!(!report.switcher_mounted);
    assert!(report.available_languages.is_empty());
    assert_eq!(store.get("originalLanguage").unwrap().as_deref(), Some("EN"));
    assert_eq!(report.segments_translated, 1);
    assert!(!HtmlTestHelper::serialize(&doc).contains("languageSwitcher"));
}
