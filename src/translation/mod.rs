//! 页面本地化模块
//!
//! 识别页面中可翻译的文本片段，为每个片段计算稳定的指纹，向远程服务请求
//! 所选语言的译文并回填到页面，同时提供语言切换器。
//!
//! ## 模块组织
//!
//! - `pipeline`: 规范化、角色、结构路径、指纹、提取与回填
//! - `document`: 页面文档抽象及其 `RcDom`、内存实现
//! - `client`: 语言目录与翻译服务客户端
//! - `storage`: 语言偏好存储
//! - `switcher`: 语言切换器
//! - `core`: 本地化编排
//! - `config`: 配置管理
//! - `error`: 统一错误处理

pub mod client;
pub mod config;
pub mod context;
pub mod core;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod switcher;

pub use client::{Catalog, HttpRemoteClient, Language, LanguageCatalog, SegmentTranslator};
pub use config::{ConfigManager, LocalizerConfig};
pub use context::PageContext;
pub use self::core::{LocalizationReport, PageLocalizer, SkipReason};
pub use document::{DocumentView, HtmlDocument, MemoryDocument, NodeId, PathStep};
pub use error::{TranslationError, TranslationResult};
pub use pipeline::{
    apply_translations, extract_segments, Fingerprint, Role, Segment, SegmentCollector,
    SegmentPayload,
};
pub use storage::{LanguagePreferences, MemoryPreferenceStore, PreferenceStore, RedbPreferenceStore};
pub use switcher::{select_language, SwitcherAction, SwitcherModel};
