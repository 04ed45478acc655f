use std::collections::BTreeMap;

use crate::error::{RemoteError, StoreError};
use crate::remote::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncState {
    Clean,
    Dirty,
    Saving,
}

/// One live file mirrored from the remote namespace. `baseline` is the
/// content last confirmed to match the remote; dirtiness is derived from it
/// rather than stored, so the two can never disagree.
#[derive(Debug, Clone)]
pub(crate) struct FileRecord {
    pub(crate) content: String,
    pub(crate) baseline: String,
    saving: bool,
}

impl FileRecord {
    pub(crate) fn clean(content: String) -> Self {
        Self {
            baseline: content.clone(),
            content,
            saving: false,
        }
    }

    pub(crate) fn sync_state(&self) -> SyncState {
        if self.saving {
            SyncState::Saving
        } else if self.content != self.baseline {
            SyncState::Dirty
        } else {
            SyncState::Clean
        }
    }
}

/// The authoritative in-memory mirror of a project's flat remote namespace,
/// plus the handle used to mutate the remote side. Iteration order over
/// paths is the map's sorted order, which keeps cascades deterministic.
pub(crate) struct Workspace {
    pub(crate) files: BTreeMap<String, FileRecord>,
    pub(crate) remote: Box<dyn RemoteStore>,
}

impl Workspace {
    pub(crate) fn new(remote: Box<dyn RemoteStore>) -> Self {
        Self {
            files: BTreeMap::new(),
            remote,
        }
    }

    /// Replace the table with a full remote snapshot; everything starts Clean.
    pub(crate) fn load(&mut self) -> Result<usize, StoreError> {
        let entries = self.remote.list()?;
        self.files = entries
            .into_iter()
            .map(|e| (e.path, FileRecord::clean(e.content)))
            .collect();
        Ok(self.files.len())
    }

    /// Re-list the namespace, keeping local unsaved content for paths that
    /// still exist remotely. Paths gone from the remote are dropped; the
    /// remote stays the source of truth after partial cascade failures.
    pub(crate) fn refresh(&mut self) -> Result<usize, StoreError> {
        let entries = self.remote.list()?;
        let mut next = BTreeMap::new();
        for entry in entries {
            let record = match self.files.get(&entry.path) {
                Some(old) if old.sync_state() == SyncState::Dirty => FileRecord {
                    content: old.content.clone(),
                    baseline: entry.content,
                    saving: false,
                },
                _ => FileRecord::clean(entry.content),
            };
            next.insert(entry.path, record);
        }
        self.files = next;
        Ok(self.files.len())
    }

    pub(crate) fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub(crate) fn content(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|r| r.content.as_str())
    }

    pub(crate) fn sync_state(&self, path: &str) -> Option<SyncState> {
        self.files.get(path).map(FileRecord::sync_state)
    }

    pub(crate) fn is_dirty(&self, path: &str) -> bool {
        self.files
            .get(path)
            .is_some_and(|r| r.content != r.baseline)
    }

    pub(crate) fn dirty_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|(_, r)| r.content != r.baseline)
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Record an edit. A no-op for absent paths: an edit racing a delete
    /// must not resurrect the record.
    pub(crate) fn set_content(&mut self, path: &str, text: &str) {
        if let Some(record) = self.files.get_mut(path) {
            if record.content != text {
                record.content = text.to_string();
            }
        }
    }

    /// Drop local edits, returning to the last synced content.
    pub(crate) fn discard(&mut self, path: &str) {
        if let Some(record) = self.files.get_mut(path) {
            record.content = record.baseline.clone();
        }
    }

    /// Snapshot the content to send and mark the record Saving. The save is
    /// split in two so an edit arriving mid-flight is never clobbered: only
    /// `finish_save` touches the baseline, and only with what was sent.
    pub(crate) fn begin_save(&mut self, path: &str) -> Result<String, StoreError> {
        let record = self
            .files
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        record.saving = true;
        Ok(record.content.clone())
    }

    /// Commit or abandon an in-flight save. On success the baseline becomes
    /// exactly the sent content; the live content is left alone, so a newer
    /// edit stays Dirty and a failed save loses nothing.
    pub(crate) fn finish_save(
        &mut self,
        path: &str,
        sent: &str,
        result: Result<(), RemoteError>,
    ) -> Result<(), StoreError> {
        if let Some(record) = self.files.get_mut(path) {
            record.saving = false;
            if result.is_ok() {
                record.baseline = sent.to_string();
            }
        }
        result.map_err(StoreError::from)
    }

    pub(crate) fn save(&mut self, path: &str) -> Result<(), StoreError> {
        let sent = self.begin_save(path)?;
        let result = self.remote.put(path, &sent);
        self.finish_save(path, &sent, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RemoteError, RemoteOp};
    use crate::remote::mock::MockRemote;

    fn workspace(entries: &[(&str, &str)]) -> (Workspace, std::rc::Rc<MockRemote>) {
        let mock = MockRemote::with_files(entries);
        let mut ws = Workspace::new(Box::new(mock.clone()));
        ws.load().expect("load");
        (ws, mock)
    }

    #[test]
    fn load_mirrors_remote_snapshot_clean() {
        let (ws, _) = workspace(&[("a.py", "a"), ("src/b.py", "b")]);
        assert_eq!(ws.paths().collect::<Vec<_>>(), vec!["a.py", "src/b.py"]);
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Clean));
        assert_eq!(ws.content("src/b.py"), Some("b"));
    }

    #[test]
    fn dirty_save_round_trip() {
        let (mut ws, mock) = workspace(&[("a.py", "old")]);
        ws.set_content("a.py", "new");
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Dirty));

        ws.save("a.py").expect("save");
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Clean));
        assert_eq!(mock.content("a.py").as_deref(), Some("new"));

        // Re-entering the same content keeps the record Clean.
        ws.set_content("a.py", "new");
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Clean));
    }

    #[test]
    fn set_content_on_absent_path_is_noop() {
        let (mut ws, _) = workspace(&[("a.py", "a")]);
        ws.set_content("ghost.py", "boo");
        assert!(!ws.contains("ghost.py"));
    }

    #[test]
    fn failed_save_keeps_content_and_dirty_state() {
        let (mut ws, mock) = workspace(&[("a.py", "old")]);
        mock.fail_put("a.py");
        ws.set_content("a.py", "new");

        let err = ws.save("a.py").unwrap_err();
        assert!(matches!(err, StoreError::Remote(_)));
        assert_eq!(ws.content("a.py"), Some("new"));
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Dirty));
        assert_eq!(mock.content("a.py").as_deref(), Some("old"));
    }

    #[test]
    fn edit_during_in_flight_save_stays_dirty_with_latest_content() {
        let (mut ws, _) = workspace(&[("a.py", "v1")]);
        ws.set_content("a.py", "v2");

        let sent = ws.begin_save("a.py").expect("begin");
        assert_eq!(sent, "v2");
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Saving));

        // A second edit lands while the put is outstanding.
        ws.set_content("a.py", "v3");
        ws.finish_save("a.py", &sent, Ok(())).expect("finish");

        // The save committed only the baseline; the newer edit survives.
        assert_eq!(ws.content("a.py"), Some("v3"));
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Dirty));
    }

    #[test]
    fn finish_save_tolerates_record_deleted_mid_flight() {
        let (mut ws, _) = workspace(&[("a.py", "v1")]);
        let sent = ws.begin_save("a.py").expect("begin");
        ws.files.remove("a.py");
        // Must not panic or resurrect the record.
        ws.finish_save("a.py", &sent, Ok(())).expect("finish");
        assert!(!ws.contains("a.py"));
    }

    #[test]
    fn save_of_unknown_path_is_not_found() {
        let (mut ws, _) = workspace(&[]);
        assert!(matches!(
            ws.save("ghost.py"),
            Err(StoreError::NotFound(p)) if p == "ghost.py"
        ));
    }

    #[test]
    fn finish_save_maps_remote_error() {
        let (mut ws, _) = workspace(&[("a.py", "v1")]);
        let sent = ws.begin_save("a.py").expect("begin");
        let err = ws
            .finish_save(
                "a.py",
                &sent,
                Err(RemoteError::new(RemoteOp::Put, "a.py", "boom")),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Remote(_)));
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Clean));
    }

    #[test]
    fn refresh_keeps_dirty_content_but_adopts_remote_baseline() {
        let (mut ws, mock) = workspace(&[("a.py", "v1"), ("b.py", "v1")]);
        ws.set_content("a.py", "local edit");
        // Remote moved on under both paths.
        mock.files.borrow_mut().insert("a.py".into(), "v2".into());
        mock.files.borrow_mut().insert("b.py".into(), "v2".into());
        mock.files.borrow_mut().insert("c.py".into(), "new".into());

        ws.refresh().expect("refresh");
        assert_eq!(ws.content("a.py"), Some("local edit"));
        assert_eq!(ws.sync_state("a.py"), Some(SyncState::Dirty));
        assert_eq!(ws.content("b.py"), Some("v2"));
        assert!(ws.contains("c.py"));
    }

    #[test]
    fn refresh_drops_paths_gone_from_remote() {
        let (mut ws, mock) = workspace(&[("a.py", "v1")]);
        mock.files.borrow_mut().clear();
        ws.refresh().expect("refresh");
        assert!(!ws.contains("a.py"));
    }

    #[test]
    fn dirty_paths_lists_only_edited_records() {
        let (mut ws, _) = workspace(&[("a.py", "a"), ("b.py", "b")]);
        ws.set_content("b.py", "changed");
        assert_eq!(ws.dirty_paths(), vec!["b.py".to_string()]);
        ws.discard("b.py");
        assert!(ws.dirty_paths().is_empty());
    }
}
