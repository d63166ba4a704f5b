//! # 解析器模块
//!
//! HTML文档的解析、DOM操作与序列化。页面文本的定位与替换都建立在这里的
//! `markup5ever_rcdom` 树操作之上。

pub mod html;

// Re-export commonly used items for convenience
pub use html::{html_to_dom, html_to_dom_detect, serialize_document};
