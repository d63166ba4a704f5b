//! 本地化核心模块
//!
//! 把片段管道、偏好存储、远程客户端和文档视图串成一次完整的页面本地化。
//!
//! ```text
//! PageLocalizer (service.rs)
//!     ├── LanguageCatalog / SegmentTranslator (client.rs)
//!     ├── LanguagePreferences (storage/preferences.rs)
//!     ├── SegmentCollector (pipeline/collector.rs)
//!     └── apply_translations (pipeline/applier.rs)
//! ```

pub mod service;

pub use service::{locale_to_language, LocalizationReport, PageLocalizer, SkipReason};
