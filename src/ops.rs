use crate::error::{RemoteError, StoreError};
use crate::store::{FileRecord, Workspace};
use crate::util::is_under;

/// Outcome of one file-level step inside a directory cascade. `new_path` is
/// set once content has been persisted under the rename target, so a failed
/// trailing delete still reports where the data lives now.
#[derive(Debug, Clone)]
pub(crate) struct StepOutcome {
    pub(crate) path: String,
    pub(crate) new_path: Option<String>,
    pub(crate) error: Option<RemoteError>,
}

impl StepOutcome {
    fn ok(path: String, new_path: Option<String>) -> Self {
        Self {
            path,
            new_path,
            error: None,
        }
    }

    fn failed(path: String, new_path: Option<String>, error: RemoteError) -> Self {
        Self {
            path,
            new_path,
            error: Some(error),
        }
    }

    pub(crate) fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Boundary check for every path entering a structural operation: non-empty,
/// `/`-separated, no leading/trailing/double slashes, no dot segments. The
/// tree builder assumes its input already passed here.
pub(crate) fn validate_path(path: &str) -> Result<(), StoreError> {
    if path.is_empty() {
        return Err(StoreError::InvalidPath("empty path".to_string()));
    }
    for segment in path.split('/') {
        if segment.is_empty() {
            return Err(StoreError::InvalidPath(format!(
                "empty segment in '{path}'"
            )));
        }
        if segment == "." || segment == ".." {
            return Err(StoreError::InvalidPath(format!(
                "dot segment in '{path}'"
            )));
        }
    }
    Ok(())
}

impl Workspace {
    /// Everything a directory-addressed operation touches: the prefix itself
    /// (a file may share the directory's name in a flat namespace) plus all
    /// paths strictly below it, in sorted order.
    pub(crate) fn affected_paths(&self, prefix: &str) -> Vec<String> {
        self.files
            .keys()
            .filter(|p| p.as_str() == prefix || is_under(p, prefix))
            .cloned()
            .collect()
    }

    /// Persist a new file remotely, then mirror it locally. The local insert
    /// waits for remote confirmation so a failed create never shows up in
    /// the tree.
    pub(crate) fn create_file(&mut self, path: &str, content: &str) -> Result<(), StoreError> {
        validate_path(path)?;
        if self.files.contains_key(path) {
            return Err(StoreError::PathConflict(path.to_string()));
        }
        self.remote.put(path, content)?;
        self.files
            .insert(path.to_string(), FileRecord::clean(content.to_string()));
        Ok(())
    }

    /// Optimistic delete: the record goes away locally first so the UI stays
    /// responsive, and a remote failure is surfaced without re-adding it.
    /// Deleting an already-gone path is a no-op, not an error.
    pub(crate) fn delete_file(&mut self, path: &str) -> Result<(), StoreError> {
        self.files.remove(path);
        self.remote.delete(path)?;
        Ok(())
    }

    /// Rename as persist-then-delete, in that order: an interruption between
    /// the two steps leaves a recoverable duplicate, never a lost file. Once
    /// the content is confirmed under `new`, the local record moves even if
    /// the trailing delete fails; that failure is surfaced with the old path
    /// so the caller knows a remote straggler lingers.
    pub(crate) fn rename_file(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        validate_path(new)?;
        if old == new {
            return Ok(());
        }
        let Some(record) = self.files.get(old) else {
            return Err(StoreError::NotFound(old.to_string()));
        };
        if self.files.contains_key(new) {
            return Err(StoreError::PathConflict(new.to_string()));
        }
        let content = record.content.clone();
        self.remote.put(new, &content)?;
        self.files.remove(old);
        self.files.insert(new.to_string(), FileRecord::clean(content));
        self.remote.delete(old)?;
        Ok(())
    }

    /// Delete every file under a directory prefix, strictly sequentially,
    /// collecting a per-path report. One failure never aborts the remaining
    /// steps. Locally, only confirmed deletions are pruned, so the explorer
    /// keeps showing exactly the stragglers the report names.
    pub(crate) fn delete_directory(&mut self, prefix: &str) -> Vec<StepOutcome> {
        let mut report = Vec::new();
        for path in self.affected_paths(prefix) {
            match self.remote.delete(&path) {
                Ok(()) => {
                    self.files.remove(&path);
                    report.push(StepOutcome::ok(path, None));
                }
                Err(err) => report.push(StepOutcome::failed(path, None, err)),
            }
        }
        report
    }

    /// Rename a directory prefix as N independent persist-then-delete pairs,
    /// strictly sequentially. Target collisions with paths outside the
    /// affected set fail fast before any remote call; after that, each file
    /// succeeds or fails on its own and the report says which ended up
    /// where. A crash partway leaves a mixed tree the caller reconciles by
    /// re-listing.
    pub(crate) fn rename_directory(
        &mut self,
        old_prefix: &str,
        new_prefix: &str,
    ) -> Result<Vec<StepOutcome>, StoreError> {
        validate_path(new_prefix)?;
        if old_prefix == new_prefix {
            return Ok(Vec::new());
        }
        let affected = self.affected_paths(old_prefix);
        if affected.is_empty() {
            return Err(StoreError::NotFound(old_prefix.to_string()));
        }
        let targets: Vec<String> = affected
            .iter()
            .map(|path| rebase(path, old_prefix, new_prefix))
            .collect();
        for target in &targets {
            if self.files.contains_key(target) && affected.binary_search(target).is_err() {
                return Err(StoreError::PathConflict(target.clone()));
            }
        }

        let mut report = Vec::new();
        for (path, target) in affected.into_iter().zip(targets) {
            let content = match self.files.get(&path) {
                Some(record) => record.content.clone(),
                None => continue,
            };
            if let Err(err) = self.remote.put(&target, &content) {
                // Nothing moved for this file; it stays fully at the old path.
                report.push(StepOutcome::failed(path, None, err));
                continue;
            }
            self.files.remove(&path);
            self.files.insert(target.clone(), FileRecord::clean(content));
            match self.remote.delete(&path) {
                Ok(()) => report.push(StepOutcome::ok(path, Some(target))),
                Err(err) => report.push(StepOutcome::failed(path, Some(target), err)),
            }
        }
        Ok(report)
    }
}

/// Substitute a directory prefix: the prefix itself maps straight to the new
/// prefix, anything below keeps its suffix.
fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    if path == old_prefix {
        new_prefix.to_string()
    } else {
        format!("{new_prefix}/{}", &path[old_prefix.len() + 1..])
    }
}
