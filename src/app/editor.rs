use super::App;

use ratatui::style::{Modifier, Style};
use ratatui_textarea::TextArea;

use crate::tab::Tab;
use crate::types::{Focus, PendingAction};
use crate::util::{lines_to_text, pending_hint, text_to_lines};

impl App {
    pub(crate) fn open_file(&mut self, path: &str) {
        // Already open: just switch to its tab.
        if let Some(idx) = self.tabs.iter().position(|t| t.path == path) {
            self.switch_to_tab(idx);
            self.set_status(format!("Switched to {path}"));
            return;
        }
        let Some(content) = self.workspace.content(path) else {
            self.set_status(format!("No such file: {path}"));
            return;
        };
        let mut ta = TextArea::from(text_to_lines(content));
        ta.set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));
        self.tabs.push(Tab {
            path: path.to_string(),
            editor: ta,
        });
        self.active_tab = self.tabs.len() - 1;
        self.focus = Focus::Editor;
        self.set_status(format!("Opened {path}"));
    }

    /// Mirror the live buffer into the workspace after every editor input,
    /// so sync state is always derived from actual content.
    pub(crate) fn on_editor_content_changed(&mut self) {
        let Some(tab) = self.active_tab() else {
            return;
        };
        let path = tab.path.clone();
        let text = lines_to_text(tab.editor.lines());
        self.workspace.set_content(&path, &text);
    }

    pub(crate) fn save_active_file(&mut self) {
        let Some(path) = self.open_path().map(ToString::to_string) else {
            self.set_status("No file open");
            return;
        };
        match self.workspace.save(&path) {
            Ok(()) => self.set_status(format!("Saved {path}")),
            Err(err) => self.set_status(format!("Save failed: {err}")),
        }
    }

    pub(crate) fn close_tab_at(&mut self, idx: usize) {
        if idx >= self.tabs.len() {
            return;
        }
        self.tabs.remove(idx);
        if self.active_tab >= idx && self.active_tab > 0 {
            self.active_tab -= 1;
        }
        if self.tabs.is_empty() {
            self.focus = Focus::Tree;
        }
    }

    /// Close the active tab, detouring through a confirmation when the
    /// buffer holds unsaved edits.
    pub(crate) fn request_close_active(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        if self.is_dirty() {
            self.pending = PendingAction::CloseTab(self.active_tab);
            self.set_status(pending_hint(&self.pending));
        } else {
            self.close_tab_at(self.active_tab);
        }
    }

    /// Drop unsaved edits in the tab at `idx` and close it.
    pub(crate) fn discard_and_close_tab(&mut self, idx: usize) {
        if let Some(tab) = self.tabs.get(idx) {
            let path = tab.path.clone();
            self.workspace.discard(&path);
        }
        self.close_tab_at(idx);
    }

    pub(crate) fn copy_selection_to_clipboard(&mut self) {
        let Some(tab) = self.active_tab_mut() else {
            return;
        };
        if tab.editor.selection_range().is_none() {
            self.set_status("No selection to copy");
            return;
        }
        tab.editor.copy();
        let copied = tab.editor.yank_text();
        if copied.is_empty() {
            self.set_status("No selection to copy");
        } else if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(copied) {
                Ok(()) => self.set_status("Copied"),
                Err(_) => self.set_status("Copied (internal clipboard only)"),
            }
        } else {
            self.set_status("Copied (internal clipboard only)");
        }
    }

    pub(crate) fn cut_selection_to_clipboard(&mut self) {
        let Some(tab) = self.active_tab_mut() else {
            return;
        };
        if tab.editor.selection_range().is_none() {
            self.set_status("No selection to cut");
            return;
        }
        let modified = tab.editor.cut();
        let cut = tab.editor.yank_text();
        if modified {
            self.on_editor_content_changed();
        }
        if cut.is_empty() {
            self.set_status("No selection to cut");
        } else if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(cut) {
                Ok(()) => self.set_status("Cut"),
                Err(_) => self.set_status("Cut (internal clipboard only)"),
            }
        } else {
            self.set_status("Cut (internal clipboard only)");
        }
    }

    pub(crate) fn paste_from_clipboard(&mut self) {
        let mut from_system = false;
        if let Some(clipboard) = self.clipboard.as_mut()
            && let Ok(text) = clipboard.get_text()
            && !text.is_empty()
        {
            if let Some(tab) = self.active_tab_mut() {
                tab.editor.set_yank_text(text);
            }
            from_system = true;
        }
        if self.active_tab_mut().is_some_and(|t| t.editor.paste()) {
            self.on_editor_content_changed();
            if from_system {
                self.set_status("Pasted");
            } else {
                self.set_status("Pasted (internal clipboard)");
            }
        } else {
            self.set_status("Clipboard empty");
        }
    }
}
