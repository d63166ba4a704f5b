//! 语言切换器
//!
//! 切换器的呈现由 [`DocumentView::mount_switcher`](crate::translation::document::DocumentView::mount_switcher)
//! 负责，这里只保存它显示什么，以及用户选择后要做什么。

use crate::translation::client::Language;
use crate::translation::error::TranslationResult;
use crate::translation::storage::{LanguagePreferences, PreferenceStore};

/// 切换器内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherModel {
    /// 根元素 id
    pub id: String,
    /// 按目录顺序排列的目标语言
    pub options: Vec<Language>,
    /// 当前选中的语言代码
    pub selected: Option<String>,
}

impl SwitcherModel {
    pub fn new(id: impl Into<String>, options: Vec<Language>, selected: Option<String>) -> Self {
        Self {
            id: id.into(),
            options,
            selected,
        }
    }

    /// 选中语言是否在选项中
    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.as_deref() == Some(code)
    }
}

/// 选择语言后宿主需要执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherAction {
    /// 重新加载页面，新的选择在下一次本地化时生效
    Reload,
}

/// 持久化用户的语言选择
pub fn select_language<S: PreferenceStore>(
    prefs: &LanguagePreferences<S>,
    code: &str,
) -> TranslationResult<SwitcherAction> {
    prefs.set_selected(code)?;
    tracing::info!("已选择语言 {}，等待页面重新加载", code);
    Ok(SwitcherAction::Reload)
}
