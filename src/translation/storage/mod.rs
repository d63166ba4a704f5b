//! 存储模块
//!
//! 提供语言偏好的内存与持久化存储。

pub mod preferences;

pub use preferences::{
    LanguagePreferences, MemoryPreferenceStore, PreferenceStore, RedbPreferenceStore,
};
