//! 文本规范化
//!
//! 把任意空白序列折叠为单个空格并去掉首尾空白，供比较与指纹计算使用。

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{FEFF}]+").expect("whitespace pattern is valid"));

/// 空白判定，字节序标记（U+FEFF）也算作空白
fn is_text_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// 去掉首尾空白
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(is_text_whitespace)
}

/// 规范化文本中的空白
pub fn normalize_text(text: &str) -> String {
    trim_text(&WHITESPACE_RUN.replace_all(text, " ")).to_string()
}
