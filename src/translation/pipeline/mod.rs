//! 片段处理管道
//!
//! 从页面到译文回填的全部纯逻辑：
//! - **normalizer**: 空白规范化
//! - **role**: 元素语义角色
//! - **path**: 结构路径编码
//! - **fingerprint**: 片段指纹
//! - **collector**: 片段提取与去重
//! - **applier**: 译文回填

pub mod applier;
pub mod collector;
pub mod fingerprint;
pub mod normalizer;
pub mod path;
pub mod role;

pub use applier::apply_translations;
pub use collector::{
    extract_segments, CollectionStats, CollectorConfig, Segment, SegmentCollector, SegmentPayload,
};
pub use fingerprint::{build_segment_id, fingerprint_from_parts, hash_string, Fingerprint};
pub use normalizer::{normalize_text, trim_text};
pub use path::encode_path;
pub use role::{classify_role, Role};
