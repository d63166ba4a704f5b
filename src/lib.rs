//! # Heylingo
//!
//! 网页本地化组件：识别页面中可翻译的文本片段，为每个片段计算稳定的指纹，
//! 向远程翻译服务请求所选语言的译文并原位替换，同时在页面上挂载语言切换器。
//!
//! ## 模块组织
//!
//! - `core` - 命令行使用的文档处理流程
//! - `env` - 环境变量
//! - `parsers` - HTML 解析与序列化
//! - `translation` - 片段识别、远程服务、偏好存储与本地化编排

pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use translation::{
    DocumentView, HttpRemoteClient, LocalizationReport, PageLocalizer, TranslationError,
    TranslationResult,
};
