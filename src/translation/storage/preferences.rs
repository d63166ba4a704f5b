//! 语言偏好存储
//!
//! 只保存两个键：用户选择的目标语言和站点原始语言。存储以 trait 注入，
//! 浏览器宿主可接入自己的键值存储，命令行工具使用 redb 持久化到磁盘。

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use redb::{Database, TableDefinition, TableError};

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 字符串键值存储
pub trait PreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> TranslationResult<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        (**self).set(key, value)
    }
}

/// 进程内存储
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定的键值对初始化
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| TranslationError::StorageError(format!("读取偏好失败: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| TranslationError::StorageError(format!("写入偏好失败: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

const PREFERENCES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("preferences");

/// 基于 redb 的持久化存储
pub struct RedbPreferenceStore {
    db: Database,
}

impl RedbPreferenceStore {
    /// 打开（不存在时创建）偏好数据库
    pub fn open(path: impl AsRef<Path>) -> TranslationResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)?;
        tracing::debug!("已打开偏好数据库: {}", path.display());
        Ok(Self { db })
    }
}

impl PreferenceStore for RedbPreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(PREFERENCES_TABLE) {
            Ok(table) => table,
            // 从未写入过
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(table.get(key)?.map(|value| value.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PREFERENCES_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// 两个语言偏好键的类型化访问
pub struct LanguagePreferences<S> {
    store: S,
}

impl<S: PreferenceStore> LanguagePreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 当前选择的语言，空字符串视为未选择
    pub fn selected(&self) -> TranslationResult<Option<String>> {
        self.get_code(constants::SELECTED_LANGUAGE_KEY)
    }

    pub fn set_selected(&self, code: &str) -> TranslationResult<()> {
        self.store.set(constants::SELECTED_LANGUAGE_KEY, code)
    }

    pub fn original(&self) -> TranslationResult<Option<String>> {
        self.get_code(constants::ORIGINAL_LANGUAGE_KEY)
    }

    pub fn set_original(&self, code: &str) -> TranslationResult<()> {
        self.store.set(constants::ORIGINAL_LANGUAGE_KEY, code)
    }

    fn get_code(&self, key: &str) -> TranslationResult<Option<String>> {
        Ok(self.store.get(key)?.filter(|code| !code.is_empty()))
    }

    /// 仅在尚未选择语言时写入，返回最终生效的选择
    pub fn seed_selected(&self, code: &str) -> TranslationResult<String> {
        match self.selected()? {
            Some(existing) => Ok(existing),
            None => {
                self.set_selected(code)?;
                Ok(code.to_string())
            }
        }
    }
}
