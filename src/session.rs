//! Setup session state.
//!
//! The wizard's steps share a small amount of context: which port each
//! device was found on, the captured dataset, and whether the operator
//! chose to keep existing repository checkouts. Steps take the session
//! explicitly rather than stashing anything in globals, and the session
//! is persisted as JSON so individual steps can be re-run across
//! invocations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub border_router_port: Option<String>,
    pub cli_port: Option<String>,
    /// Raw pasted dataset text, as also saved to `thread_dataset.txt`.
    pub dataset: Option<String>,
    #[serde(default)]
    pub skip_repositories: bool,
}

impl Session {
    fn state_file() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(base.join("esp-thread-setup").join("session.json"))
    }

    /// Load the persisted session, or start fresh if there is none.
    pub fn load_or_default() -> Self {
        match Self::state_file() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::default(),
        }
    }

    /// Load from a specific state file. A missing or unparseable file
    /// yields a fresh session; stale state should never block setup.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring unreadable session file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::state_file()?)
    }

    /// Save to a specific state file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let session = Session {
            border_router_port: Some("/dev/ttyUSB0".to_string()),
            cli_port: Some("/dev/ttyACM0".to_string()),
            dataset: Some("Channel: 15".to_string()),
            skip_repositories: true,
        };

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(back.border_router_port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(back.cli_port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(back.dataset.as_deref(), Some("Channel: 15"));
        assert!(back.skip_repositories);
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        // Nested path: save_to must create the parent directories.
        let path = dir.path().join("state/session.json");

        let session = Session {
            border_router_port: Some("/dev/ttyUSB0".to_string()),
            cli_port: None,
            dataset: Some("Channel: 15".to_string()),
            skip_repositories: true,
        };
        session.save_to(&path).unwrap();

        let back = Session::load_from(&path);
        assert_eq!(back.border_router_port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(back.dataset.as_deref(), Some("Channel: 15"));
        assert!(back.skip_repositories);
    }

    #[test]
    fn missing_state_file_yields_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let back = Session::load_from(&dir.path().join("nope.json"));
        assert!(back.border_router_port.is_none());
        assert!(!back.skip_repositories);
    }

    #[test]
    fn corrupt_state_file_yields_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let back = Session::load_from(&path);
        assert!(back.border_router_port.is_none());
        assert!(back.cli_port.is_none());
        assert!(back.dataset.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let back: Session = serde_json::from_str(r#"{"border_router_port":"/dev/ttyUSB1"}"#)
            .unwrap();
        assert_eq!(back.border_router_port.as_deref(), Some("/dev/ttyUSB1"));
        assert!(back.cli_port.is_none());
        assert!(!back.skip_repositories);
    }
}
