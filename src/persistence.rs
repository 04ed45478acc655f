use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const STATE_FILE_REL: &str = "remide/state.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct PersistedState {
    #[serde(default)]
    pub(crate) files_pane_width: Option<u16>,
    #[serde(default)]
    pub(crate) server_url: Option<String>,
    #[serde(default)]
    pub(crate) project: Option<String>,
}

pub(crate) fn state_file_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join(STATE_FILE_REL));
    }
    if let Ok(appdata) = std::env::var("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join(STATE_FILE_REL));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join(STATE_FILE_REL))
}

pub(crate) fn load_persisted_state() -> Option<PersistedState> {
    let path = state_file_path()?;
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str::<PersistedState>(&raw).ok()
}

pub(crate) fn save_persisted_state(state: &PersistedState) -> io::Result<()> {
    let Some(path) = state_file_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(state)
        .map_err(|e| io::Error::other(format!("serialize state: {e}")))?;
    fs::write(path, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_state_round_trips_and_tolerates_missing_fields() {
        let state = PersistedState {
            files_pane_width: Some(32),
            server_url: Some("http://localhost:8000/api".to_string()),
            project: Some("demo".to_string()),
        };
        let raw = serde_json::to_string(&state).expect("serialize");
        let back: PersistedState = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back.files_pane_width, Some(32));
        assert_eq!(back.project.as_deref(), Some("demo"));

        let sparse: PersistedState = serde_json::from_str("{}").expect("empty object");
        assert_eq!(sparse.files_pane_width, None);
        assert_eq!(sparse.server_url, None);
    }

    #[test]
    fn state_round_trips_through_the_config_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        save_persisted_state(&PersistedState {
            files_pane_width: Some(40),
            server_url: Some("http://localhost:8000/api".to_string()),
            project: Some("demo".to_string()),
        })
        .expect("save");
        let loaded = load_persisted_state().expect("load");
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        assert_eq!(loaded.files_pane_width, Some(40));
        assert_eq!(loaded.project.as_deref(), Some("demo"));
    }
}
