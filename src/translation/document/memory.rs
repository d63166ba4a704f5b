//! 内存文档
//!
//! 一棵或多棵由宿主直接构建的元素树。每棵树的根相当于没有父元素的
//! `html`，结构路径从根之下开始计算；多个根可以表示彼此独立挂载的组件实例。

use std::cell::RefCell;

use crate::translation::switcher::SwitcherModel;

use super::{DocumentView, PathStep};

/// 内存文档中的元素句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Child>,
    parent: Option<NodeId>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<MemoryNode>,
    roots: Vec<NodeId>,
}

impl Tree {
    fn node(&self, id: NodeId) -> &MemoryNode {
        &self.nodes[id.0]
    }

    fn push(&mut self, tag: &str, attrs: &[(&str, &str)], parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children: Vec::new(),
            parent,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(Child::Element(id)),
            None => self.roots.push(id),
        }
        id
    }

    fn walk(&self, id: NodeId, visit: &mut impl FnMut(NodeId)) {
        visit(id);
        for child in &self.node(id).children {
            if let Child::Element(child) = child {
                self.walk(*child, visit);
            }
        }
    }

    fn push_text(&self, id: NodeId, out: &mut String) {
        for child in &self.node(id).children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(child) => self.push_text(*child, out),
            }
        }
    }

    fn closest(&self, id: NodeId, predicate: impl Fn(&MemoryNode) -> bool) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if predicate(node) {
                return true;
            }
            current = node.parent;
        }
        false
    }
}

/// 由宿主构建的内存文档
#[derive(Debug, Default)]
pub struct MemoryDocument {
    tree: RefCell<Tree>,
    language: RefCell<Option<String>>,
    switcher: RefCell<Option<SwitcherModel>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新建一棵树的根元素
    pub fn add_root(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().push(tag, &[], None)
    }

    pub fn append_element(&self, parent: NodeId, tag: &str) -> NodeId {
        self.append_element_with_attrs(parent, tag, &[])
    }

    pub fn append_element_with_attrs(
        &self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        self.tree.borrow_mut().push(tag, attrs, Some(parent))
    }

    pub fn append_text(&self, parent: NodeId, text: &str) {
        self.tree.borrow_mut().nodes[parent.0]
            .children
            .push(Child::Text(text.to_string()));
    }

    /// 追加一个只包含文本的子元素
    pub fn append_text_element(&self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let id = self.append_element(parent, tag);
        self.append_text(id, text);
        id
    }

    /// 最近一次设置的文档语言
    pub fn language(&self) -> Option<String> {
        self.language.borrow().clone()
    }

    /// 已挂载的语言切换器
    pub fn switcher(&self) -> Option<SwitcherModel> {
        self.switcher.borrow().clone()
    }

    /// 元素子节点数量（文本与元素都计入）
    pub fn child_count(&self, id: NodeId) -> usize {
        self.tree.borrow().node(id).children.len()
    }
}

impl DocumentView for MemoryDocument {
    type Handle = NodeId;

    fn query_translatable(&self, tags: &[&str]) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut found = Vec::new();
        for root in &tree.roots {
            tree.walk(*root, &mut |id| {
                if tags.iter().any(|tag| tree.node(id).tag.eq_ignore_ascii_case(tag)) {
                    found.push(id);
                }
            });
        }
        found
    }

    fn text(&self, handle: &NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().push_text(*handle, &mut out);
        out
    }

    fn set_text(&self, handle: &NodeId, text: &str) {
        let mut tree = self.tree.borrow_mut();
        let old = std::mem::take(&mut tree.nodes[handle.0].children);
        for child in old {
            if let Child::Element(child) = child {
                tree.nodes[child.0].parent = None;
            }
        }
        tree.nodes[handle.0].children.push(Child::Text(text.to_string()));
    }

    fn ancestry_path(&self, handle: &NodeId) -> Vec<PathStep> {
        let tree = self.tree.borrow();
        let mut steps = Vec::new();
        let mut current = *handle;

        while let Some(parent) = tree.node(current).parent {
            let tag = &tree.node(current).tag;
            let nth_of_type = 1 + tree
                .node(parent)
                .children
                .iter()
                .filter_map(|child| match child {
                    Child::Element(id) => Some(*id),
                    Child::Text(_) => None,
                })
                .take_while(|id| *id != current)
                .filter(|id| &tree.node(*id).tag == tag)
                .count();

            steps.push(PathStep::new(tag.clone(), nth_of_type));
            current = parent;
        }

        steps.reverse();
        steps
    }

    fn tag_name(&self, handle: &NodeId) -> String {
        self.tree.borrow().node(*handle).tag.clone()
    }

    fn attribute(&self, handle: &NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(*handle)
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn is_within(&self, handle: &NodeId, tags: &[&str]) -> bool {
        self.tree
            .borrow()
            .closest(*handle, |node| tags.iter().any(|tag| node.tag.eq_ignore_ascii_case(tag)))
    }

    fn is_within_id(&self, handle: &NodeId, id: &str) -> bool {
        self.tree.borrow().closest(*handle, |node| {
            node.attrs.iter().any(|(key, value)| key == "id" && value == id)
        })
    }

    fn set_document_language(&self, lang: &str) {
        *self.language.borrow_mut() = Some(lang.to_string());
    }

    fn mount_switcher(&self, switcher: &SwitcherModel) {
        let root = self
            .tree
            .borrow_mut()
            .push("div", &[("id", switcher.id.as_str())], None);
        let select = self.append_element(root, "select");
        for option in &switcher.options {
            let mut attrs = vec![("value", option.code.as_str())];
            if switcher.is_selected(&option.code) {
                attrs.push(("selected", ""));
            }
            let node = self.append_element_with_attrs(select, "option", &attrs);
            self.append_text(node, &option.name);
        }
        *self.switcher.borrow_mut() = Some(switcher.clone());
    }
}
