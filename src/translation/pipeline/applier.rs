//! 译文回填

use serde_json::Value;

use crate::translation::document::DocumentView;

use super::collector::Segment;

/// 译文对象中的文本字段
pub const TRANSLATED_TEXT_FIELD: &str = "translated_text";

/// 把译文写回页面
///
/// `translations` 缺失或不是 JSON 对象时什么也不做。某个片段查不到译文、
/// 或译文缺少非空的 `translated_text` 时，只跳过该片段，其余片段照常回填。
/// 命中的片段中每个元素的内容被整体替换为译文，原有子结构丢弃。
///
/// 返回实际回填的片段数。
pub fn apply_translations<D: DocumentView>(
    doc: &D,
    translations: Option<&Value>,
    segments: &[Segment<D::Handle>],
) -> usize {
    let Some(Value::Object(by_id)) = translations else {
        return 0;
    };

    let mut applied = 0;
    for segment in segments {
        let translated = by_id
            .get(segment.id.as_str())
            .and_then(|entry| entry.get(TRANSLATED_TEXT_FIELD))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty());

        let Some(translated) = translated else {
            continue;
        };

        for element in &segment.elements {
            doc.set_text(element, translated);
        }
        applied += 1;
    }

    tracing::debug!("已回填 {}/{} 个片段", applied, segments.len());
    applied
}
