use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RemoteError, RemoteOp};

/// One record of the flat remote namespace: a path string and its content.
/// The remote has no directory concept; hierarchy is derived client-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct FileEntry {
    pub(crate) path: String,
    pub(crate) content: String,
}

/// The remote flat file store, keyed by path. `put` has upsert semantics;
/// `delete` of a nonexistent path reports success so retried cascade steps
/// stay harmless.
pub(crate) trait RemoteStore {
    fn list(&self) -> Result<Vec<FileEntry>, RemoteError>;
    fn put(&self, path: &str, content: &str) -> Result<(), RemoteError>;
    fn delete(&self, path: &str) -> Result<(), RemoteError>;
}

#[derive(Serialize)]
struct PutBody<'a> {
    path: &'a str,
    content: &'a str,
}

/// REST client for the project files endpoint. Calls are blocking with a
/// per-call timeout; the event loop issues them one at a time.
#[derive(Debug)]
pub(crate) struct HttpStore {
    client: reqwest::blocking::Client,
    base: Url,
    project: String,
    token: Option<String>,
}

impl HttpStore {
    pub(crate) const CALL_TIMEOUT_SECS: u64 = 15;

    pub(crate) fn new(
        server: &str,
        project: &str,
        token: Option<String>,
    ) -> Result<Self, RemoteError> {
        let base = Url::parse(server).map_err(|e| {
            RemoteError::new(RemoteOp::List, "", format!("invalid server url '{server}': {e}"))
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(Self::CALL_TIMEOUT_SECS))
            .build()
            .map_err(|e| RemoteError::new(RemoteOp::List, "", format!("http client: {e}")))?;
        Ok(Self {
            client,
            base,
            project: project.to_string(),
            token,
        })
    }

    fn files_url(&self) -> String {
        format!(
            "{}/projects/{}/files",
            self.base.as_str().trim_end_matches('/'),
            self.project
        )
    }

    fn authed(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn ensure_ok(
        resp: reqwest::blocking::Response,
        op: RemoteOp,
        path: &str,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RemoteError::new(
                op,
                path,
                "unauthorized (token invalid or expired; set REMIDE_TOKEN)",
            ));
        }
        if status.is_success() {
            return Ok(resp);
        }
        let detail = resp.text().unwrap_or_default();
        let detail = detail.trim();
        let message = if detail.is_empty() {
            format!("status {status}")
        } else {
            format!("status {status}: {detail}")
        };
        Err(RemoteError::new(op, path, message))
    }
}

impl RemoteStore for HttpStore {
    fn list(&self) -> Result<Vec<FileEntry>, RemoteError> {
        let resp = self
            .authed(self.client.get(self.files_url()))
            .send()
            .map_err(|e| RemoteError::new(RemoteOp::List, "", e.to_string()))?;
        let resp = Self::ensure_ok(resp, RemoteOp::List, "")?;
        resp.json::<Vec<FileEntry>>()
            .map_err(|e| RemoteError::new(RemoteOp::List, "", format!("decode: {e}")))
    }

    fn put(&self, path: &str, content: &str) -> Result<(), RemoteError> {
        let resp = self
            .authed(self.client.post(self.files_url()))
            .json(&PutBody { path, content })
            .send()
            .map_err(|e| RemoteError::new(RemoteOp::Put, path, e.to_string()))?;
        Self::ensure_ok(resp, RemoteOp::Put, path).map(|_| ())
    }

    fn delete(&self, path: &str) -> Result<(), RemoteError> {
        let resp = self
            .authed(self.client.delete(self.files_url()))
            .query(&[("path", path)])
            .send()
            .map_err(|e| RemoteError::new(RemoteOp::Delete, path, e.to_string()))?;
        // A path that is already gone counts as deleted.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::ensure_ok(resp, RemoteOp::Delete, path).map(|_| ())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashSet};
    use std::rc::Rc;

    use super::{FileEntry, RemoteStore};
    use crate::error::{RemoteError, RemoteOp};

    /// In-memory remote with scriptable per-path failures. Records every
    /// call in order so tests can assert on sequencing (persist before
    /// delete, strictly sequential cascades).
    #[derive(Default)]
    pub(crate) struct MockRemote {
        pub(crate) files: RefCell<BTreeMap<String, String>>,
        pub(crate) fail_puts: RefCell<HashSet<String>>,
        pub(crate) fail_deletes: RefCell<HashSet<String>>,
        pub(crate) calls: RefCell<Vec<String>>,
    }

    impl MockRemote {
        pub(crate) fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub(crate) fn with_files(entries: &[(&str, &str)]) -> Rc<Self> {
            let mock = Self::default();
            for (path, content) in entries {
                mock.files
                    .borrow_mut()
                    .insert((*path).to_string(), (*content).to_string());
            }
            Rc::new(mock)
        }

        pub(crate) fn fail_put(&self, path: &str) {
            self.fail_puts.borrow_mut().insert(path.to_string());
        }

        pub(crate) fn fail_delete(&self, path: &str) {
            self.fail_deletes.borrow_mut().insert(path.to_string());
        }

        pub(crate) fn has(&self, path: &str) -> bool {
            self.files.borrow().contains_key(path)
        }

        pub(crate) fn content(&self, path: &str) -> Option<String> {
            self.files.borrow().get(path).cloned()
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl RemoteStore for Rc<MockRemote> {
        fn list(&self) -> Result<Vec<FileEntry>, RemoteError> {
            self.calls.borrow_mut().push("list".to_string());
            Ok(self
                .files
                .borrow()
                .iter()
                .map(|(path, content)| FileEntry {
                    path: path.clone(),
                    content: content.clone(),
                })
                .collect())
        }

        fn put(&self, path: &str, content: &str) -> Result<(), RemoteError> {
            self.calls.borrow_mut().push(format!("put {path}"));
            if self.fail_puts.borrow().contains(path) {
                return Err(RemoteError::new(RemoteOp::Put, path, "injected put failure"));
            }
            self.files
                .borrow_mut()
                .insert(path.to_string(), content.to_string());
            Ok(())
        }

        fn delete(&self, path: &str) -> Result<(), RemoteError> {
            self.calls.borrow_mut().push(format!("delete {path}"));
            if self.fail_deletes.borrow().contains(path) {
                return Err(RemoteError::new(
                    RemoteOp::Delete,
                    path,
                    "injected delete failure",
                ));
            }
            // Deleting a missing path is success, mirroring the real store.
            self.files.borrow_mut().remove(path);
            Ok(())
        }
    }
}
