use super::App;
use std::collections::HashSet;

use arboard::Clipboard;
use ratatui::layout::Rect;

use crate::nav::flatten;
use crate::persistence::{PersistedState, load_persisted_state, save_persisted_state};
use crate::store::Workspace;
use crate::tab::Tab;
use crate::tree::build_tree;
use crate::types::{Focus, PendingAction};

impl App {
    pub(crate) const MIN_FILES_PANE_WIDTH: u16 = 18;

    pub(crate) fn new(workspace: Workspace, project: String) -> Self {
        let mut app = Self {
            workspace,
            project,
            tree: Vec::new(),
            rows: Vec::new(),
            expanded: HashSet::new(),
            selected: 0,
            focus: Focus::Tree,
            tabs: Vec::new(),
            active_tab: 0,
            status: String::new(),
            pending: PendingAction::None,
            prompt: None,
            quit: false,
            files_pane_width: 32,
            tree_scroll: 0,
            tree_rect: Rect::default(),
            editor_rect: Rect::default(),
            clipboard: Clipboard::new().ok(),
        };
        app.restore_persisted_state();
        app.rebuild_tree();
        app.status = format!(
            "Project: {} ({} files)",
            app.project,
            app.workspace.files.len()
        );
        app
    }

    /// Re-derive the tree and visible rows from the workspace, keeping the
    /// selection on the same path when it still exists.
    pub(crate) fn rebuild_tree(&mut self) {
        let selected_path = self.rows.get(self.selected).map(|r| r.path.clone());
        self.tree = build_tree(self.workspace.paths());
        self.rows = flatten(&self.tree, &self.expanded);
        self.selected = selected_path
            .and_then(|p| self.rows.iter().position(|r| r.path == p))
            .unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
    }

    pub(crate) fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_tab)
    }

    pub(crate) fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        self.tabs.get_mut(self.active_tab)
    }

    pub(crate) fn open_path(&self) -> Option<&str> {
        self.active_tab().map(|t| t.path.as_str())
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.open_path().is_some_and(|p| self.workspace.is_dirty(p))
    }

    pub(crate) fn any_tab_dirty(&self) -> bool {
        self.tabs.iter().any(|t| self.workspace.is_dirty(&t.path))
    }

    pub(crate) fn switch_to_tab(&mut self, idx: usize) {
        if idx < self.tabs.len() {
            self.active_tab = idx;
            self.focus = Focus::Editor;
        }
    }

    /// Move the explorer selection onto `path`, expanding ancestors so the
    /// row is actually visible.
    pub(crate) fn select_path(&mut self, path: &str) {
        let mut prefix = String::new();
        for segment in path.split('/') {
            if !prefix.is_empty() {
                self.expanded.insert(prefix.clone());
                prefix.push('/');
            }
            prefix.push_str(segment);
        }
        self.rebuild_tree();
        if let Some(idx) = self.rows.iter().position(|r| r.path == path) {
            self.selected = idx;
        }
    }

    /// Re-list the remote namespace on demand. Unsaved buffers keep their
    /// content; tabs whose path vanished remotely are closed.
    pub(crate) fn refresh_from_remote(&mut self) {
        match self.workspace.refresh() {
            Ok(count) => {
                let gone: Vec<usize> = self
                    .tabs
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| !self.workspace.contains(&t.path))
                    .map(|(idx, _)| idx)
                    .rev()
                    .collect();
                for idx in gone {
                    self.close_tab_at(idx);
                }
                self.rebuild_tree();
                self.set_status(format!("Refreshed: {count} files"));
            }
            Err(err) => self.set_status(format!("Refresh failed: {err}")),
        }
    }

    pub(crate) fn restore_persisted_state(&mut self) {
        let Some(saved) = load_persisted_state() else {
            return;
        };
        if let Some(width) = saved.files_pane_width {
            self.files_pane_width = width.max(Self::MIN_FILES_PANE_WIDTH);
        }
    }

    pub(crate) fn persist_state(&mut self, server_url: &str) {
        let state = PersistedState {
            files_pane_width: Some(self.files_pane_width),
            server_url: Some(server_url.to_string()),
            project: Some(self.project.clone()),
        };
        if save_persisted_state(&state).is_err() {
            self.set_status("Failed to persist app state");
        }
    }
}
