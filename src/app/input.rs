use super::App;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui_textarea::Input;

use crate::types::{Focus, PendingAction};
use crate::util::pending_hint;

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if self.handle_pending_key(key) {
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q' | 'Q')) => {
                self.request_quit();
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s' | 'S')) => {
                self.save_active_file();
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('r' | 'R')) => {
                self.refresh_from_remote();
                return;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.focus = match self.focus {
                    Focus::Tree if !self.tabs.is_empty() => Focus::Editor,
                    Focus::Tree => Focus::Tree,
                    Focus::Editor => Focus::Tree,
                };
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Tree => self.handle_tree_key(key),
            Focus::Editor => self.handle_editor_key(key),
        }
    }

    pub(crate) fn request_quit(&mut self) {
        if self.any_tab_dirty() {
            self.pending = PendingAction::Quit;
            self.set_status(pending_hint(&self.pending));
        } else {
            self.quit = true;
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                self.move_selection(-1);
            }
            (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                self.move_selection(1);
            }
            (_, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => self.tree_ascend(),
            (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => self.tree_descend(),
            (_, KeyCode::Enter) => self.tree_activate_selected(),
            (KeyModifiers::NONE, KeyCode::Char('n')) => self.open_new_file_prompt(),
            (KeyModifiers::SHIFT, KeyCode::Char('N' | 'n')) => self.open_new_folder_prompt(),
            (KeyModifiers::NONE, KeyCode::Char('r')) | (_, KeyCode::F(2)) => {
                self.open_rename_prompt();
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) | (_, KeyCode::Delete) => {
                self.request_delete_selected();
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('w' | 'W')) => {
                self.request_close_active();
            }
            (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C')) => {
                self.copy_selection_to_clipboard();
            }
            (KeyModifiers::CONTROL, KeyCode::Char('x' | 'X')) => {
                self.cut_selection_to_clipboard();
            }
            (KeyModifiers::CONTROL, KeyCode::Char('v' | 'V')) => {
                self.paste_from_clipboard();
            }
            _ => {
                let modified = self
                    .active_tab_mut()
                    .is_some_and(|t| t.editor.input(Input::from(key)));
                if modified {
                    self.on_editor_content_changed();
                }
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.prompt = None;
                self.set_status("Canceled");
            }
            (_, KeyCode::Enter) => {
                let value = prompt.value.trim().to_string();
                if value.is_empty() {
                    self.set_status("Name cannot be empty");
                    return;
                }
                let mode = prompt.mode.clone();
                self.prompt = None;
                self.apply_prompt(mode, value);
            }
            // The cursor is a byte offset; every move steps a whole char.
            (_, KeyCode::Backspace) => {
                if let Some(ch) = prompt.value[..prompt.cursor].chars().next_back() {
                    prompt.cursor -= ch.len_utf8();
                    prompt.value.remove(prompt.cursor);
                }
            }
            (_, KeyCode::Delete) => {
                if prompt.cursor < prompt.value.len() {
                    prompt.value.remove(prompt.cursor);
                }
            }
            (_, KeyCode::Left) => {
                if let Some(ch) = prompt.value[..prompt.cursor].chars().next_back() {
                    prompt.cursor -= ch.len_utf8();
                }
            }
            (_, KeyCode::Right) => {
                if let Some(ch) = prompt.value[prompt.cursor..].chars().next() {
                    prompt.cursor += ch.len_utf8();
                }
            }
            (_, KeyCode::Home) => prompt.cursor = 0,
            (_, KeyCode::End) => prompt.cursor = prompt.value.len(),
            (_, KeyCode::Char(c)) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    prompt.value.insert(prompt.cursor, c);
                    prompt.cursor += c.len_utf8();
                }
            }
            _ => {}
        }
    }

    fn handle_pending_key(&mut self, key: KeyEvent) -> bool {
        match (&self.pending, key.modifiers, key.code) {
            (PendingAction::None, _, _) => false,
            (PendingAction::Quit, KeyModifiers::NONE, KeyCode::Enter) => {
                self.pending = PendingAction::None;
                self.quit = true;
                true
            }
            (PendingAction::CloseTab(idx), KeyModifiers::NONE, KeyCode::Enter) => {
                let idx = *idx;
                self.pending = PendingAction::None;
                if let Some(path) = self.tabs.get(idx).map(|t| t.path.clone()) {
                    match self.workspace.save(&path) {
                        Ok(()) => {
                            self.close_tab_at(idx);
                            self.set_status(format!("Saved {path}"));
                        }
                        // The tab stays open; nothing was lost.
                        Err(err) => self.set_status(format!("Save failed: {err}")),
                    }
                }
                true
            }
            (PendingAction::CloseTab(idx), KeyModifiers::NONE, KeyCode::Char('d' | 'D')) => {
                let idx = *idx;
                self.pending = PendingAction::None;
                self.discard_and_close_tab(idx);
                self.set_status("Discarded");
                true
            }
            (PendingAction::Delete { .. }, KeyModifiers::NONE, KeyCode::Enter)
            | (PendingAction::Delete { .. }, KeyModifiers::NONE, KeyCode::Char('y' | 'Y')) => {
                self.confirm_pending_delete();
                true
            }
            (_, KeyModifiers::NONE, KeyCode::Esc) => {
                self.pending = PendingAction::None;
                self.set_status("Canceled");
                true
            }
            _ => {
                self.set_status(pending_hint(&self.pending));
                true
            }
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if inside(self.tree_rect, pos) {
                    self.focus = Focus::Tree;
                    // Rows render below the top border.
                    let row = usize::from(mouse.row.saturating_sub(self.tree_rect.y + 1))
                        + self.tree_scroll;
                    if row < self.rows.len() {
                        let already = self.selected == row;
                        self.selected = row;
                        if already {
                            self.tree_activate_selected();
                        }
                    }
                } else if inside(self.editor_rect, pos) && !self.tabs.is_empty() {
                    self.focus = Focus::Editor;
                }
            }
            MouseEventKind::ScrollUp if inside(self.tree_rect, pos) => self.move_selection(-1),
            MouseEventKind::ScrollDown if inside(self.tree_rect, pos) => self.move_selection(1),
            _ => {}
        }
    }
}

fn inside(rect: ratatui::layout::Rect, (x, y): (u16, u16)) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
