//! 片段指纹
//!
//! 指纹由 `(域名, 页面路径, 角色, 结构路径, 规范化小写文本)` 唯一决定，
//! 远端把它当作跨会话的缓存键，所以必须是纯函数：不依赖随机数，也不依赖时间。
//! 32位哈希会碰撞，碰撞的两段文本会被合并成一个片段，这是已知的近似。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::translation::context::PageContext;
use crate::translation::document::DocumentView;

use super::normalizer::normalize_text;
use super::path::encode_path;
use super::role::{classify_role, Role};

/// 指纹各组成部分之间的分隔符
pub const FIELD_SEPARATOR: &str = "|";

/// 片段指纹（十六进制字符串）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 31 乘子多项式哈希，逐个 UTF-16 码元累加并折叠到有符号32位
///
/// 结果取绝对值后以小写十六进制输出；空串为 `"0"`。
pub fn hash_string(input: &str) -> String {
    if input.is_empty() {
        return "0".to_string();
    }

    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });

    format!("{:x}", hash.unsigned_abs())
}

/// 由已经算好的各部分组合出指纹
pub fn fingerprint_from_parts(
    page: &PageContext,
    role: Role,
    structural_path: &str,
    raw_text: &str,
) -> Fingerprint {
    let normalized = normalize_text(raw_text).to_lowercase();
    let base = [
        page.domain.as_str(),
        page.page_path.as_str(),
        role.as_str(),
        structural_path,
        normalized.as_str(),
    ]
    .join(FIELD_SEPARATOR);

    Fingerprint(hash_string(&base))
}

/// 计算元素的片段指纹
pub fn build_segment_id<D: DocumentView>(
    doc: &D,
    page: &PageContext,
    element: &D::Handle,
    raw_text: &str,
) -> Fingerprint {
    let role = classify_role(doc, element);
    let path = encode_path(doc, element);
    fingerprint_from_parts(page, role, &path, raw_text)
}
