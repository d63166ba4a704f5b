//! `RcDom` 上的文档视图

use markup5ever_rcdom::{Handle, RcDom};

use crate::parsers::html::{
    append_child, create_element_with_attrs, find_elements, get_child_node_by_name,
    get_node_attr, get_node_name, get_parent_element, get_text_content, set_node_attr,
    set_text_content,
};
use crate::translation::switcher::SwitcherModel;

use super::{DocumentView, PathStep};

/// 基于 html5ever `RcDom` 的文档
pub struct HtmlDocument {
    dom: RcDom,
}

impl HtmlDocument {
    pub fn new(dom: RcDom) -> Self {
        Self { dom }
    }

    pub fn dom(&self) -> &RcDom {
        &self.dom
    }

    pub fn into_dom(self) -> RcDom {
        self.dom
    }

    fn html_element(&self) -> Option<Handle> {
        get_child_node_by_name(&self.dom.document, "html")
    }

    fn body_element(&self) -> Option<Handle> {
        self.html_element()
            .and_then(|html| get_child_node_by_name(&html, "body"))
    }

    /// 沿父元素链向上查找满足条件的元素（包含自身）
    fn closest(&self, handle: &Handle, predicate: impl Fn(&Handle) -> bool) -> bool {
        let mut current = Some(handle.clone());
        while let Some(node) = current {
            if predicate(&node) {
                return true;
            }
            current = get_parent_element(&node);
        }
        false
    }
}

impl DocumentView for HtmlDocument {
    type Handle = Handle;

    fn query_translatable(&self, tags: &[&str]) -> Vec<Handle> {
        find_elements(&self.dom.document, tags)
    }

    fn text(&self, handle: &Handle) -> String {
        get_text_content(handle)
    }

    fn set_text(&self, handle: &Handle, text: &str) {
        set_text_content(handle, text);
    }

    fn ancestry_path(&self, handle: &Handle) -> Vec<PathStep> {
        let mut steps = Vec::new();
        let mut current = handle.clone();

        while let Some(parent) = get_parent_element(&current) {
            let tag = self.tag_name(&current);
            let mut nth_of_type = 1;

            for sibling in parent.children.borrow().iter() {
                if std::rc::Rc::ptr_eq(sibling, &current) {
                    break;
                }
                if get_node_name(sibling).is_some_and(|name| name.eq_ignore_ascii_case(&tag)) {
                    nth_of_type += 1;
                }
            }

            steps.push(PathStep::new(tag, nth_of_type));
            current = parent;
        }

        steps.reverse();
        steps
    }

    fn tag_name(&self, handle: &Handle) -> String {
        get_node_name(handle)
            .map(|name| name.to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, handle: &Handle, name: &str) -> Option<String> {
        get_node_attr(handle, name)
    }

    fn is_within(&self, handle: &Handle, tags: &[&str]) -> bool {
        self.closest(handle, |node| {
            get_node_name(node)
                .is_some_and(|name| tags.iter().any(|tag| name.eq_ignore_ascii_case(tag)))
        })
    }

    fn is_within_id(&self, handle: &Handle, id: &str) -> bool {
        self.closest(handle, |node| {
            get_node_attr(node, "id").is_some_and(|value| value == id)
        })
    }

    fn set_document_language(&self, lang: &str) {
        if let Some(html) = self.html_element() {
            set_node_attr(&html, "lang", Some(lang.to_string()));
        }
    }

    fn mount_switcher(&self, switcher: &SwitcherModel) {
        let Some(body) = self.body_element() else {
            tracing::warn!("页面缺少 body，无法挂载语言切换器");
            return;
        };

        let container = create_element_with_attrs(&self.dom, "div", &[("id", switcher.id.as_str())]);
        let select = create_element_with_attrs(&self.dom, "select", &[]);

        for option in &switcher.options {
            let mut attrs = vec![("value", option.code.as_str())];
            if switcher.is_selected(&option.code) {
                attrs.push(("selected", ""));
            }
            let node = create_element_with_attrs(&self.dom, "option", &attrs);
            set_text_content(&node, &option.name);
            append_child(&select, node);
        }

        append_child(&container, select);
        append_child(&body, container);
    }
}
