//! sdkconfig patching.
//!
//! The border router example ships with RCP auto-update enabled and the
//! web GUI disabled; both need flipping before the build. sdkconfig is a
//! flat `CONFIG_KEY=value` file, so patching is replace-or-append per key.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Settings applied to the border router build: don't let the BR reflash
/// the RCP on boot (we flash it ourselves), and turn the web GUI on.
pub const BORDER_ROUTER_SETTINGS: &[(&str, &str)] = &[
    ("CONFIG_OPENTHREAD_BR_AUTO_UPDATE_RCP", "n"),
    ("CONFIG_OPENTHREAD_BR_UPDATE_SEQUENCE", "0"),
    ("CONFIG_OPENTHREAD_BR_WEB_GUI_ENABLE", "y"),
];

/// Pick the config file to patch: `sdkconfig` if the project has been
/// configured before, otherwise `sdkconfig.defaults`.
pub fn config_file_for(project_dir: &Path) -> Result<PathBuf> {
    let sdkconfig = project_dir.join("sdkconfig");
    if sdkconfig.exists() {
        return Ok(sdkconfig);
    }
    let defaults = project_dir.join("sdkconfig.defaults");
    if defaults.exists() {
        return Ok(defaults);
    }
    bail!(
        "Neither sdkconfig nor sdkconfig.defaults found in {}",
        project_dir.display()
    )
}

/// Replace-or-append each `key=value` setting in a config file.
pub fn apply_settings(path: &Path, settings: &[(&str, &str)]) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let patched = patch_contents(&contents, settings);

    std::fs::write(path, patched)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), "sdkconfig patched");
    Ok(())
}

fn patch_contents(contents: &str, settings: &[(&str, &str)]) -> String {
    let mut found = vec![false; settings.len()];
    let mut out = String::with_capacity(contents.len() + 64);

    for line in contents.lines() {
        let mut replaced = false;
        for (i, (key, value)) in settings.iter().enumerate() {
            // Match assignments only; a key that prefixes a longer key
            // (CONFIG_FOO vs CONFIG_FOO_BAR) must not be rewritten.
            if line.starts_with(key) && line[key.len()..].starts_with('=') {
                out.push_str(&format!("{key}={value}\n"));
                found[i] = true;
                replaced = true;
                break;
            }
        }
        if !replaced {
            out.push_str(line);
            out.push('\n');
        }
    }

    for (i, (key, value)) in settings.iter().enumerate() {
        if !found[i] {
            out.push_str(&format!("{key}={value}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_assignments() {
        let input = "CONFIG_A=y\nCONFIG_OPENTHREAD_BR_AUTO_UPDATE_RCP=y\nCONFIG_B=n\n";
        let out = patch_contents(input, &[("CONFIG_OPENTHREAD_BR_AUTO_UPDATE_RCP", "n")]);
        assert_eq!(out, "CONFIG_A=y\nCONFIG_OPENTHREAD_BR_AUTO_UPDATE_RCP=n\nCONFIG_B=n\n");
    }

    #[test]
    fn appends_missing_assignments() {
        let input = "CONFIG_A=y\n";
        let out = patch_contents(input, BORDER_ROUTER_SETTINGS);
        assert!(out.starts_with("CONFIG_A=y\n"));
        assert!(out.contains("CONFIG_OPENTHREAD_BR_AUTO_UPDATE_RCP=n\n"));
        assert!(out.contains("CONFIG_OPENTHREAD_BR_UPDATE_SEQUENCE=0\n"));
        assert!(out.contains("CONFIG_OPENTHREAD_BR_WEB_GUI_ENABLE=y\n"));
    }

    #[test]
    fn does_not_touch_longer_keys_with_same_prefix() {
        let input = "CONFIG_OPENTHREAD_BR_UPDATE_SEQUENCE_MAX=9\n";
        let out = patch_contents(input, &[("CONFIG_OPENTHREAD_BR_UPDATE_SEQUENCE", "0")]);
        assert!(out.contains("CONFIG_OPENTHREAD_BR_UPDATE_SEQUENCE_MAX=9\n"));
        assert!(out.ends_with("CONFIG_OPENTHREAD_BR_UPDATE_SEQUENCE=0\n"));
    }

    #[test]
    fn patching_is_idempotent() {
        let input = "CONFIG_A=y\n";
        let once = patch_contents(input, BORDER_ROUTER_SETTINGS);
        let twice = patch_contents(&once, BORDER_ROUTER_SETTINGS);
        assert_eq!(once, twice);
    }

    #[test]
    fn apply_settings_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdkconfig");
        std::fs::write(&path, "CONFIG_OPENTHREAD_BR_WEB_GUI_ENABLE=n\n").unwrap();

        apply_settings(&path, BORDER_ROUTER_SETTINGS).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("CONFIG_OPENTHREAD_BR_WEB_GUI_ENABLE=y\n"));
        assert!(!contents.contains("CONFIG_OPENTHREAD_BR_WEB_GUI_ENABLE=n\n"));
    }

    #[test]
    fn prefers_sdkconfig_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sdkconfig.defaults"), "").unwrap();
        assert!(config_file_for(dir.path()).unwrap().ends_with("sdkconfig.defaults"));

        std::fs::write(dir.path().join("sdkconfig"), "").unwrap();
        assert!(config_file_for(dir.path()).unwrap().ends_with("sdkconfig"));

        let empty = tempfile::tempdir().unwrap();
        assert!(config_file_for(empty.path()).is_err());
    }
}
