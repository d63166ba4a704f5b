//! 结构路径编码

use crate::translation::document::{DocumentView, PathStep};

/// 路径各级之间的分隔符
pub const PATH_SEPARATOR: &str = ">";

/// 把元素的祖先链编码为 `tag:nth-of-type(k)>...` 形式
///
/// 插入或删除不同标签的兄弟不改变路径；同标签兄弟的增删会让其后的
/// 同标签元素路径整体偏移。路径只和文本一起参与指纹计算，这种脆弱性可以接受。
pub fn encode_path<D: DocumentView>(doc: &D, element: &D::Handle) -> String {
    render_steps(&doc.ancestry_path(element))
}

/// 渲染已经按自顶向下排好的路径
pub fn render_steps(steps: &[PathStep]) -> String {
    steps
        .iter()
        .map(|step| format!("{}:nth-of-type({})", step.tag, step.nth_of_type))
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}
