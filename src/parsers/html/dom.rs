use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

/// 渲染可见文本时跳过的元素
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> io::Result<RcDom> {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => {
            let (string, _, _) = encoding.decode(data);
            string.into_owned()
        }
        None => String::from_utf8_lossy(data).into_owned(),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
}

/// 按文档顺序查找所有标签名在列表中的元素
pub fn find_elements(node: &Handle, tag_names: &[&str]) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_elements(node, tag_names, &mut found);
    found
}

fn collect_elements(node: &Handle, tag_names: &[&str], found: &mut Vec<Handle>) {
    if let Some(name) = get_node_name(node) {
        if tag_names.iter().any(|tag| name.eq_ignore_ascii_case(tag)) {
            found.push(node.clone());
        }
    }

    for child in node.children.borrow().iter() {
        collect_elements(child, tag_names, found);
    }
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取父节点
///
/// `parent` 是 `Cell`，读取时先取出再放回，避免把节点从树上摘下来。
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// 获取父元素（父节点是 Document 时返回 `None`）
pub fn get_parent_element(child: &Handle) -> Option<Handle> {
    get_parent_node(child).filter(|parent| matches!(parent.data, NodeData::Element { .. }))
}

/// 设置节点属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// 收集元素的可见文本
///
/// 近似浏览器的 `innerText`：拼接后代文本节点并按 `white-space: normal`
/// 折叠空白，`br` 视为换行，脚本、样式等不可见元素的内容被忽略。
pub fn get_text_content(node: &Handle) -> String {
    let mut text = String::new();
    push_text_content(node, &mut text);
    text
}

/// CSS 可折叠空白（不含 `&nbsp;`）
fn is_collapsible_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn push_collapsed(chunk: &str, text: &mut String) {
    for c in chunk.chars() {
        if is_collapsible_space(c) {
            if !text.is_empty() && !text.ends_with([' ', '\n']) {
                text.push(' ');
            }
        } else {
            text.push(c);
        }
    }
}

fn push_text_content(node: &Handle, text: &mut String) {
    match &node.data {
        NodeData::Text { contents } => push_collapsed(&contents.borrow(), text),
        NodeData::Element { name, .. } => {
            let tag = name.local.as_ref();
            if tag == "br" {
                let line_end = text.trim_end_matches(' ').len();
                text.truncate(line_end);
                text.push('\n');
                return;
            }
            if INVISIBLE_ELEMENTS.contains(&tag) {
                return;
            }
            for child in node.children.borrow().iter() {
                push_text_content(child, text);
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                push_text_content(child, text);
            }
        }
    }
}

/// 用单个文本节点整体替换元素的全部子节点
pub fn set_text_content(node: &Handle, text: &str) {
    let old_children: Vec<Handle> = node.children.borrow_mut().drain(..).collect();
    for child in old_children {
        child.parent.set(None);
    }

    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    });
    append_child(node, text_node);
}

/// 追加子节点并维护父指针
pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// 创建带属性的新元素
pub fn create_element_with_attrs(dom: &RcDom, tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: format_tendril!("{}", value),
        })
        .collect();

    create_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from(tag)),
        attributes,
    )
}

/// 从 `<meta charset>` 或 `<meta http-equiv="content-type">` 读取声明的字符集
pub fn get_charset(document: &Handle) -> Option<String> {
    for meta in find_elements(document, &["meta"]) {
        if let Some(charset) = get_node_attr(&meta, "charset") {
            return Some(charset.trim().to_string());
        }

        let is_content_type = get_node_attr(&meta, "http-equiv")
            .is_some_and(|value| value.eq_ignore_ascii_case("content-type"));
        if !is_content_type {
            continue;
        }

        if let Some(content) = get_node_attr(&meta, "content") {
            let charset = content.split(';').skip(1).find_map(|param| {
                let (name, value) = param.trim().split_once('=')?;
                name.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| value.trim().trim_matches('"').to_string())
            });
            if charset.is_some() {
                return charset;
            }
        }
    }

    None
}

/// 按声明的字符集重新解析
///
/// 返回DOM与最终采用的编码名；声明缺失或无法识别时保留 `fallback_encoding`。
pub fn html_to_dom_detect(data: &[u8], fallback_encoding: &str) -> io::Result<(RcDom, String)> {
    let dom = html_to_dom(data, fallback_encoding)?;

    let declared = get_charset(&dom.document)
        .filter(|charset| !charset.is_empty())
        .and_then(|charset| Encoding::for_label_no_replacement(charset.as_bytes()));

    match declared {
        Some(encoding) if !encoding.name().eq_ignore_ascii_case(fallback_encoding) => {
            let name = encoding.name().to_string();
            Ok((html_to_dom(data, &name)?, name))
        }
        _ => Ok((dom, fallback_encoding.to_string())),
    }
}
