//! 文档视图抽象
//!
//! 片段识别算法（角色分类、路径编码、指纹、去重、回填）只通过
//! [`DocumentView`] 访问页面，因此既能运行在解析后的 `RcDom`（[`HtmlDocument`]）上，
//! 也能运行在宿主自行构建的内存文档（[`MemoryDocument`]）上。

use crate::translation::switcher::SwitcherModel;

mod html;
mod memory;

pub use html::HtmlDocument;
pub use memory::{MemoryDocument, NodeId};

/// 结构路径中的一级：标签名与同名兄弟中的序号（从1开始）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub tag: String,
    pub nth_of_type: usize,
}

impl PathStep {
    pub fn new(tag: impl Into<String>, nth_of_type: usize) -> Self {
        Self {
            tag: tag.into(),
            nth_of_type,
        }
    }
}

/// 页面文档的最小访问接口
pub trait DocumentView {
    /// 元素句柄，只在单次提取/回填过程中有效
    type Handle: Clone;

    /// 按文档顺序返回标签名在 `tags` 中的所有元素
    fn query_translatable(&self, tags: &[&str]) -> Vec<Self::Handle>;

    /// 元素的可见文本
    fn text(&self, handle: &Self::Handle) -> String;

    /// 用纯文本整体替换元素内容
    fn set_text(&self, handle: &Self::Handle, text: &str);

    /// 从根元素之下到元素自身的路径，自顶向下排列；根元素本身不在其中
    fn ancestry_path(&self, handle: &Self::Handle) -> Vec<PathStep>;

    /// 小写标签名
    fn tag_name(&self, handle: &Self::Handle) -> String;

    fn attribute(&self, handle: &Self::Handle, name: &str) -> Option<String>;

    /// 元素自身或任一祖先的标签在 `tags` 中（`Element.closest` 语义）
    fn is_within(&self, handle: &Self::Handle, tags: &[&str]) -> bool;

    /// 元素自身或任一祖先的 `id` 等于 `id`
    fn is_within_id(&self, handle: &Self::Handle, id: &str) -> bool;

    /// 设置文档语言（`<html lang>`）
    fn set_document_language(&self, lang: &str);

    /// 把语言切换器挂载到页面上
    fn mount_switcher(&self, switcher: &SwitcherModel);
}
