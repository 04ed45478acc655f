use std::collections::HashSet;

use arboard::Clipboard;
use ratatui::layout::Rect;

use crate::nav::FlatEntry;
use crate::store::Workspace;
use crate::tab::Tab;
use crate::tree::TreeNode;
use crate::types::{Focus, PendingAction, PromptState};

mod core;
mod editor;
mod explorer;
mod input;

pub(crate) struct App {
    pub(crate) workspace: Workspace,
    pub(crate) project: String,
    pub(crate) tree: Vec<TreeNode>,
    pub(crate) rows: Vec<FlatEntry>,
    pub(crate) expanded: HashSet<String>,
    pub(crate) selected: usize,
    pub(crate) focus: Focus,
    pub(crate) tabs: Vec<Tab>,
    pub(crate) active_tab: usize,
    pub(crate) status: String,
    pub(crate) pending: PendingAction,
    pub(crate) prompt: Option<PromptState>,
    pub(crate) quit: bool,
    pub(crate) files_pane_width: u16,
    pub(crate) tree_scroll: usize,
    pub(crate) tree_rect: Rect,
    pub(crate) editor_rect: Rect,
    pub(crate) clipboard: Option<Clipboard>,
}
