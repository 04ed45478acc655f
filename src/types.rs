#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Tree,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    None,
    Quit,
    CloseTab(usize),
    Delete { path: String, is_dir: bool },
}

#[derive(Debug, Clone)]
pub(crate) enum PromptMode {
    NewFile { parent: String },
    NewFolder { parent: String },
    Rename { target: String, is_dir: bool },
}

/// `cursor` is a byte offset into `value`, always on a char boundary.
#[derive(Debug, Clone)]
pub(crate) struct PromptState {
    pub(crate) title: String,
    pub(crate) value: String,
    pub(crate) cursor: usize,
    pub(crate) mode: PromptMode,
}

impl PromptState {
    pub(crate) fn new(title: impl Into<String>, mode: PromptMode) -> Self {
        Self {
            title: title.into(),
            value: String::new(),
            cursor: 0,
            mode,
        }
    }

    pub(crate) fn with_value(title: impl Into<String>, value: impl Into<String>, mode: PromptMode) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self {
            title: title.into(),
            value,
            cursor,
            mode,
        }
    }
}
