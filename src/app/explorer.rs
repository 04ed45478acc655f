use super::App;

use crate::nav::{Ascend, Descend, FlatEntry, ascend, descend, step_selection};
use crate::ops::StepOutcome;
use crate::types::{PendingAction, PromptMode, PromptState};
use crate::util::{file_name, is_under, join_path, parent_of, pending_hint};

impl App {
    fn sanitize_entry_name<'a>(&self, value: &'a str) -> Result<&'a str, &'static str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Name cannot be empty");
        }
        if trimmed.contains('/') {
            return Err("Name must be a single path component");
        }
        if trimmed == "." || trimmed == ".." {
            return Err("Name must be a single path component");
        }
        Ok(trimmed)
    }

    pub(crate) fn selected_row(&self) -> Option<&FlatEntry> {
        self.rows.get(self.selected)
    }

    /// Directory of the selected row: the row itself when it is a directory,
    /// otherwise its parent ("" is the project root).
    fn selected_parent(&self) -> String {
        match self.selected_row() {
            Some(row) if row.is_dir => row.path.clone(),
            Some(row) => parent_of(&row.path).unwrap_or("").to_string(),
            None => String::new(),
        }
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        self.selected = step_selection(self.rows.len(), self.selected, delta);
    }

    pub(crate) fn tree_activate_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.is_dir {
            if !self.expanded.remove(&row.path) {
                self.expanded.insert(row.path.clone());
            }
            self.rebuild_tree();
        } else {
            self.open_file(&row.path);
        }
    }

    pub(crate) fn tree_descend(&mut self) {
        match descend(&self.rows, &self.expanded, self.selected) {
            Descend::Expand(path) => {
                self.expanded.insert(path);
                self.rebuild_tree();
            }
            Descend::Select(idx) => self.selected = idx,
            Descend::Stay => {}
        }
    }

    pub(crate) fn tree_ascend(&mut self) {
        match ascend(&self.rows, &self.expanded, self.selected) {
            Ascend::Collapse(path) => {
                self.expanded.remove(&path);
                self.rebuild_tree();
            }
            Ascend::Select(idx) => self.selected = idx,
            Ascend::Stay => {}
        }
    }

    pub(crate) fn open_new_file_prompt(&mut self) {
        let parent = self.selected_parent();
        let where_ = if parent.is_empty() { "project root" } else { parent.as_str() };
        self.prompt = Some(PromptState::new(
            format!("New file in {where_}"),
            PromptMode::NewFile { parent },
        ));
    }

    pub(crate) fn open_new_folder_prompt(&mut self) {
        let parent = self.selected_parent();
        let where_ = if parent.is_empty() { "project root" } else { parent.as_str() };
        self.prompt = Some(PromptState::new(
            format!("New folder in {where_}"),
            PromptMode::NewFolder { parent },
        ));
    }

    pub(crate) fn open_rename_prompt(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        let name = file_name(&row.path).to_string();
        self.prompt = Some(PromptState::with_value(
            "Rename to",
            name,
            PromptMode::Rename {
                target: row.path,
                is_dir: row.is_dir,
            },
        ));
    }

    pub(crate) fn request_delete_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        self.pending = PendingAction::Delete {
            path: row.path,
            is_dir: row.is_dir,
        };
        self.set_status(pending_hint(&self.pending));
    }

    pub(crate) fn apply_prompt(&mut self, mode: PromptMode, value: String) {
        match mode {
            PromptMode::NewFile { parent } => {
                // Nested names are allowed here: intermediate directories
                // are free in a flat namespace. create_file validates the
                // full path segment-wise.
                let path = join_path(&parent, value.trim());
                let content = if path.ends_with(".py") { "# New file\n" } else { "" };
                match self.workspace.create_file(&path, content) {
                    Ok(()) => {
                        if !parent.is_empty() {
                            self.expanded.insert(parent);
                        }
                        self.select_path(&path);
                        self.open_file(&path);
                        self.set_status(format!("Created {path}"));
                    }
                    Err(err) => self.set_status(format!("Create failed: {err}")),
                }
            }
            PromptMode::NewFolder { parent } => {
                let name = match self.sanitize_entry_name(&value) {
                    Ok(name) => name,
                    Err(msg) => {
                        self.set_status(msg);
                        return;
                    }
                };
                // The store has no empty directories; the folder becomes real
                // with its first file, so chain straight into that prompt.
                let folder = join_path(&parent, name);
                if !parent.is_empty() {
                    self.expanded.insert(parent);
                }
                self.expanded.insert(folder.clone());
                self.prompt = Some(PromptState::new(
                    format!("New file in {folder}"),
                    PromptMode::NewFile { parent: folder },
                ));
            }
            PromptMode::Rename { target, is_dir } => {
                let name = match self.sanitize_entry_name(&value) {
                    Ok(name) => name,
                    Err(msg) => {
                        self.set_status(msg);
                        return;
                    }
                };
                let renamed = join_path(parent_of(&target).unwrap_or(""), name);
                if renamed == target {
                    self.set_status("Name unchanged");
                    return;
                }
                if is_dir {
                    self.rename_directory_entry(&target, &renamed);
                } else {
                    self.rename_file_entry(&target, &renamed);
                }
            }
        }
    }

    fn rename_file_entry(&mut self, target: &str, renamed: &str) {
        match self.workspace.rename_file(target, renamed) {
            Ok(()) => {
                self.retarget_tabs_for_rename(target, renamed);
                self.select_path(renamed);
                self.set_status(format!("Renamed to {renamed}"));
            }
            Err(err) => {
                // A failed trailing delete still committed the move; the tab
                // must follow the content.
                if self.workspace.contains(renamed) {
                    self.retarget_tabs_for_rename(target, renamed);
                    self.select_path(renamed);
                    self.set_status(format!("Renamed to {renamed}; old copy remains: {err}"));
                } else {
                    self.set_status(format!("Rename failed: {err}"));
                }
            }
        }
    }

    fn rename_directory_entry(&mut self, target: &str, renamed: &str) {
        let report = match self.workspace.rename_directory(target, renamed) {
            Ok(report) => report,
            Err(err) => {
                self.set_status(format!("Rename failed: {err}"));
                return;
            }
        };
        for outcome in &report {
            if let Some(new_path) = &outcome.new_path {
                for tab in &mut self.tabs {
                    if tab.path == outcome.path {
                        tab.path = new_path.clone();
                    }
                }
            }
        }
        self.retarget_expanded_for_rename(target, renamed);
        self.rebuild_tree();
        let failed = report.iter().filter(|o| !o.is_ok()).count();
        if failed == 0 {
            self.select_path(renamed);
            self.set_status(format!("Renamed {} files to {renamed}", report.len()));
        } else {
            self.set_status(format!(
                "Renamed {} files, {failed} failed: {}",
                report.len() - failed,
                first_error(&report)
            ));
        }
    }

    pub(crate) fn confirm_pending_delete(&mut self) {
        let PendingAction::Delete { path, is_dir } =
            std::mem::replace(&mut self.pending, PendingAction::None)
        else {
            return;
        };
        if is_dir {
            let report = self.workspace.delete_directory(&path);
            for outcome in &report {
                if outcome.is_ok() {
                    self.close_tabs_for_path(&outcome.path);
                }
            }
            let failed = report.iter().filter(|o| !o.is_ok()).count();
            if failed == 0 {
                self.expanded
                    .retain(|p| p != &path && !is_under(p, &path));
                self.set_status(format!("Deleted {} files", report.len()));
            } else {
                // Failed paths stay in the tree so the user sees exactly
                // what is left behind.
                self.set_status(format!(
                    "Deleted {} files, {failed} failed: {}",
                    report.len() - failed,
                    first_error(&report)
                ));
            }
        } else {
            self.close_tabs_for_path(&path);
            match self.workspace.delete_file(&path) {
                Ok(()) => self.set_status(format!("Deleted {path}")),
                Err(err) => self.set_status(format!("Delete failed: {err}")),
            }
        }
        self.rebuild_tree();
    }

    fn close_tabs_for_path(&mut self, path: &str) {
        while let Some(idx) = self.tabs.iter().position(|t| t.path == path) {
            self.close_tab_at(idx);
        }
    }

    fn retarget_tabs_for_rename(&mut self, from: &str, to: &str) {
        for tab in &mut self.tabs {
            if tab.path == from {
                tab.path = to.to_string();
            } else if is_under(&tab.path, from) {
                tab.path = format!("{to}{}", &tab.path[from.len()..]);
            }
        }
    }

    fn retarget_expanded_for_rename(&mut self, from: &str, to: &str) {
        let moved: Vec<(String, String)> = self
            .expanded
            .iter()
            .filter_map(|p| {
                if p == from {
                    Some((p.clone(), to.to_string()))
                } else if is_under(p, from) {
                    Some((p.clone(), format!("{to}{}", &p[from.len()..])))
                } else {
                    None
                }
            })
            .collect();
        for (old, new) in moved {
            self.expanded.remove(&old);
            self.expanded.insert(new);
        }
    }
}

fn first_error(report: &[StepOutcome]) -> String {
    report
        .iter()
        .find_map(|o| o.error.as_ref().map(ToString::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::super::core::tests::new_app;
    use crate::types::{PendingAction, PromptMode};

    #[test]
    fn activate_toggles_directory_expansion() {
        let (mut app, _) = new_app(&[("src/a.py", "a")]);
        assert_eq!(app.rows.len(), 1);
        app.tree_activate_selected();
        assert!(app.expanded.contains("src"));
        assert_eq!(app.rows.len(), 2);
        app.tree_activate_selected();
        assert!(!app.expanded.contains("src"));
        assert_eq!(app.rows.len(), 1);
    }

    #[test]
    fn activate_on_file_opens_a_tab() {
        let (mut app, _) = new_app(&[("top.py", "print(1)\n")]);
        app.tree_activate_selected();
        assert_eq!(app.tabs.len(), 1);
        assert_eq!(app.tabs[0].path, "top.py");
    }

    #[test]
    fn new_file_prompt_creates_opens_and_selects() {
        let (mut app, mock) = new_app(&[("src/a.py", "a")]);
        app.apply_prompt(
            PromptMode::NewFile {
                parent: "src".to_string(),
            },
            "b.py".to_string(),
        );
        assert!(mock.has("src/b.py"));
        assert_eq!(mock.content("src/b.py").as_deref(), Some("# New file\n"));
        assert_eq!(app.open_path(), Some("src/b.py"));
        assert_eq!(app.rows[app.selected].path, "src/b.py");
    }

    #[test]
    fn new_file_prompt_accepts_nested_names() {
        let (mut app, mock) = new_app(&[]);
        app.apply_prompt(
            PromptMode::NewFile {
                parent: String::new(),
            },
            "src/sub/a.py".to_string(),
        );
        assert!(mock.has("src/sub/a.py"));
        assert!(app.expanded.contains("src"));
        assert!(app.expanded.contains("src/sub"));
    }

    #[test]
    fn new_file_prompt_rejects_malformed_names() {
        let (mut app, mock) = new_app(&[]);
        for bad in ["..", "a//b.py", "/a.py", "  "] {
            app.apply_prompt(
                PromptMode::NewFile {
                    parent: String::new(),
                },
                bad.to_string(),
            );
            assert!(app.tabs.is_empty(), "no tab for {bad:?}");
        }
        assert_eq!(mock.calls(), vec!["list".to_string()]);
    }

    #[test]
    fn new_file_prompt_surfaces_conflict() {
        let (mut app, _) = new_app(&[("a.py", "x")]);
        app.apply_prompt(
            PromptMode::NewFile {
                parent: String::new(),
            },
            "a.py".to_string(),
        );
        assert!(app.status.starts_with("Create failed"));
        assert_eq!(app.workspace.content("a.py"), Some("x"));
    }

    #[test]
    fn new_folder_chains_into_a_new_file_prompt() {
        let (mut app, _) = new_app(&[("top.py", "t")]);
        app.apply_prompt(
            PromptMode::NewFolder {
                parent: String::new(),
            },
            "src".to_string(),
        );
        let prompt = app.prompt.as_ref().expect("chained prompt");
        assert!(matches!(
            &prompt.mode,
            PromptMode::NewFile { parent } if parent == "src"
        ));
        assert!(app.expanded.contains("src"));
    }

    #[test]
    fn rename_prompt_prefills_the_current_name() {
        let (mut app, _) = new_app(&[("src/héllo.py", "x")]);
        app.select_path("src/héllo.py");
        app.open_rename_prompt();
        let prompt = app.prompt.as_ref().expect("prompt");
        assert_eq!(prompt.value, "héllo.py");
        assert!(matches!(
            &prompt.mode,
            PromptMode::Rename { target, is_dir: false } if target == "src/héllo.py"
        ));
    }

    #[test]
    fn rename_file_retargets_open_tab_and_selection() {
        let (mut app, _) = new_app(&[("old.py", "body")]);
        app.open_file("old.py");
        app.apply_prompt(
            PromptMode::Rename {
                target: "old.py".to_string(),
                is_dir: false,
            },
            "new.py".to_string(),
        );
        assert_eq!(app.tabs[0].path, "new.py");
        assert_eq!(app.rows[app.selected].path, "new.py");
        assert!(!app.workspace.contains("old.py"));
    }

    #[test]
    fn rename_file_with_failed_trailing_delete_still_moves_the_tab() {
        let (mut app, mock) = new_app(&[("old.py", "body")]);
        app.open_file("old.py");
        mock.fail_delete("old.py");
        app.apply_prompt(
            PromptMode::Rename {
                target: "old.py".to_string(),
                is_dir: false,
            },
            "new.py".to_string(),
        );
        assert_eq!(app.tabs[0].path, "new.py");
        assert!(app.status.contains("old copy remains"));
    }

    #[test]
    fn rename_directory_retargets_descendant_tabs_and_expansion() {
        let (mut app, _) = new_app(&[("old/a.py", "a"), ("old/sub/b.py", "b")]);
        app.select_path("old/sub/b.py");
        app.open_file("old/a.py");
        app.open_file("old/sub/b.py");
        app.apply_prompt(
            PromptMode::Rename {
                target: "old".to_string(),
                is_dir: true,
            },
            "new".to_string(),
        );
        assert!(app.tabs.iter().any(|t| t.path == "new/a.py"));
        assert!(app.tabs.iter().any(|t| t.path == "new/sub/b.py"));
        assert!(app.expanded.contains("new"));
        assert!(app.expanded.contains("new/sub"));
        assert!(!app.workspace.contains("old/a.py"));
    }

    #[test]
    fn partial_directory_rename_moves_only_succeeded_tabs() {
        let (mut app, mock) = new_app(&[("old/a.py", "a"), ("old/b.py", "b")]);
        app.open_file("old/a.py");
        app.open_file("old/b.py");
        mock.fail_put("new/b.py");
        app.apply_prompt(
            PromptMode::Rename {
                target: "old".to_string(),
                is_dir: true,
            },
            "new".to_string(),
        );
        assert!(app.tabs.iter().any(|t| t.path == "new/a.py"));
        assert!(app.tabs.iter().any(|t| t.path == "old/b.py"));
        assert!(app.status.contains("1 failed"));
    }

    #[test]
    fn rename_to_same_name_is_a_noop() {
        let (mut app, mock) = new_app(&[("a.py", "x")]);
        app.apply_prompt(
            PromptMode::Rename {
                target: "a.py".to_string(),
                is_dir: false,
            },
            "a.py".to_string(),
        );
        assert_eq!(app.status, "Name unchanged");
        assert_eq!(mock.calls(), vec!["list".to_string()]);
    }

    #[test]
    fn delete_goes_through_confirmation() {
        let (mut app, mock) = new_app(&[("a.py", "x")]);
        app.request_delete_selected();
        assert!(matches!(
            &app.pending,
            PendingAction::Delete { path, is_dir: false } if path == "a.py"
        ));
        // Nothing removed until confirmed.
        assert!(app.workspace.contains("a.py"));

        app.confirm_pending_delete();
        assert!(!app.workspace.contains("a.py"));
        assert!(!mock.has("a.py"));
        assert_eq!(app.pending, PendingAction::None);
    }

    #[test]
    fn confirmed_directory_delete_closes_tabs_and_prunes_expansion() {
        let (mut app, _) = new_app(&[("src/a.py", "a"), ("src/sub/b.py", "b"), ("top.py", "t")]);
        app.select_path("src/sub/b.py");
        app.open_file("src/a.py");
        app.pending = PendingAction::Delete {
            path: "src".to_string(),
            is_dir: true,
        };
        app.confirm_pending_delete();
        assert!(app.tabs.is_empty());
        assert!(!app.expanded.contains("src"));
        assert!(app.workspace.contains("top.py"));
        assert_eq!(app.status, "Deleted 2 files");
    }

    #[test]
    fn partial_directory_delete_keeps_stragglers_visible() {
        let (mut app, mock) = new_app(&[("src/a.py", "a"), ("src/b.py", "b")]);
        app.select_path("src/a.py");
        mock.fail_delete("src/b.py");
        app.pending = PendingAction::Delete {
            path: "src".to_string(),
            is_dir: true,
        };
        app.confirm_pending_delete();
        assert!(!app.workspace.contains("src/a.py"));
        assert!(app.workspace.contains("src/b.py"));
        // The surviving file keeps its directory row in the tree.
        assert!(app.rows.iter().any(|r| r.path == "src"));
        assert!(app.status.contains("1 failed"));
    }
}
