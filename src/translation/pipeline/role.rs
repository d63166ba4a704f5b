//! 元素语义角色分类
//!
//! 同一段文字出现在按钮、导航、页脚或正文里时应得到不同的片段，
//! 角色就是区分它们的那一维。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::translation::document::DocumentView;

/// 元素的粗粒度语义角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Button,
    Nav,
    Footer,
    Heading,
    Body,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Nav => "nav",
            Role::Footer => "footer",
            Role::Heading => "heading",
            Role::Body => "body",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const NAV_LANDMARKS: &[&str] = &["header", "nav"];
const FOOTER_LANDMARKS: &[&str] = &["footer"];

/// 计算元素角色
///
/// 按顺序匹配，先命中者生效：
/// 1. `button`，或 `role="button"` 的 `a` → [`Role::Button`]
/// 2. 位于 `header`/`nav` 内 → [`Role::Nav`]
/// 3. 位于 `footer` 内 → [`Role::Footer`]
/// 4. `h1`–`h6` → [`Role::Heading`]
/// 5. 其余 → [`Role::Body`]
///
/// 因此页头里的按钮仍是 `Button`：交互属性优先于所处位置。
pub fn classify_role<D: DocumentView>(doc: &D, element: &D::Handle) -> Role {
    let tag = doc.tag_name(element);

    let is_button_like = tag == "button"
        || (tag == "a" && doc.attribute(element, "role").as_deref() == Some("button"));

    if is_button_like {
        Role::Button
    } else if doc.is_within(element, NAV_LANDMARKS) {
        Role::Nav
    } else if doc.is_within(element, FOOTER_LANDMARKS) {
        Role::Footer
    } else if is_heading_tag(&tag) {
        Role::Heading
    } else {
        Role::Body
    }
}

fn is_heading_tag(tag: &str) -> bool {
    matches!(tag.as_bytes(), [b'h', b'1'..=b'6'])
}
