use ratatui_textarea::TextArea;

/// An open editor buffer. Sync state lives in the workspace; the tab only
/// owns the widget and the path it edits.
pub(crate) struct Tab {
    pub(crate) path: String,
    pub(crate) editor: TextArea<'static>,
}
