//! ESP-IDF toolchain integration.
//!
//! All firmware work is delegated to `idf.py`: builds, flashing, and the
//! interactive serial monitor. This module locates the IDF checkout,
//! probes the tool version, and wraps the subprocess invocations. It
//! requires `export.sh` to have been sourced so `idf.py` is on PATH.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Tested ESP-IDF release line. Other versions often work but the
/// OpenThread examples move around between releases.
pub const EXPECTED_IDF_VERSION: &str = "v5.2";

#[derive(Debug, Error)]
pub enum IdfError {
    #[error(
        "ESP-IDF not found. Install ESP-IDF and set the IDF_PATH environment variable,\n\
         or pass --idf-path"
    )]
    NotFound,

    #[error("idf.py not available. Have you sourced export.sh? Run: . $IDF_PATH/export.sh")]
    ToolUnavailable,

    #[error("{description} failed (exit status {status})")]
    CommandFailed { description: String, status: i32 },
}

/// Handle to a located ESP-IDF installation.
pub struct Idf {
    path: PathBuf,
}

impl Idf {
    /// Locate the ESP-IDF checkout: explicit override, then `IDF_PATH`,
    /// then common install locations, then `idf.py` on PATH.
    pub fn locate(override_path: Option<&Path>) -> Result<Self, IdfError> {
        if let Some(p) = override_path {
            if p.exists() {
                return Ok(Self { path: p.to_path_buf() });
            }
            return Err(IdfError::NotFound);
        }

        if let Ok(env_path) = std::env::var("IDF_PATH") {
            let p = PathBuf::from(env_path);
            if p.exists() {
                return Ok(Self { path: p });
            }
        }

        for candidate in common_install_paths() {
            if candidate.exists() {
                return Ok(Self { path: candidate });
            }
        }

        if let Some(p) = idf_path_from_tool_on_path() {
            return Ok(Self { path: p });
        }

        Err(IdfError::NotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe `idf.py --version`. Fails when the tool is not on PATH,
    /// which almost always means export.sh was not sourced.
    pub async fn version(&self) -> Result<String, IdfError> {
        let output = Command::new("idf.py")
            .arg("--version")
            .output()
            .await
            .map_err(|_| IdfError::ToolUnavailable)?;

        if !output.status.success() {
            return Err(IdfError::ToolUnavailable);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run `idf.py` interactively (stdio inherited). Used for flashing and
    /// anything where the operator should see full output.
    pub async fn run(&self, cwd: &Path, args: &[&str]) -> Result<()> {
        tracing::debug!(?args, cwd = %cwd.display(), "running idf.py");
        let status = Command::new("idf.py")
            .args(args)
            .current_dir(cwd)
            .status()
            .await
            .context("Failed to launch idf.py")?;

        if !status.success() {
            return Err(IdfError::CommandFailed {
                description: format!("idf.py {}", args.join(" ")),
                status: status.code().unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }

    /// Run `idf.py` with captured output and a spinner, printing only the
    /// error tail on failure. Used for the long, chatty build steps.
    pub async fn run_quiet(&self, cwd: &Path, args: &[&str], description: &str) -> Result<()> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("static spinner template"),
        );
        pb.set_message(description.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        let output = Command::new("idf.py")
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .context("Failed to launch idf.py")?;

        pb.finish_and_clear();

        if !output.status.success() {
            eprintln!("✖ {description} failed. Error output:");
            for line in tail_lines(&String::from_utf8_lossy(&output.stderr), 20) {
                eprintln!("  {line}");
            }
            return Err(IdfError::CommandFailed {
                description: description.to_string(),
                status: output.status.code().unwrap_or(-1),
            }
            .into());
        }

        println!("✔ {description}");
        Ok(())
    }

    /// Open the interactive serial monitor on a device. Returns when the
    /// operator exits with Ctrl+].
    pub async fn monitor(&self, cwd: &Path, port: &str) -> Result<()> {
        println!("Running: idf.py -p {port} monitor   (press Ctrl+] to exit)");
        // Monitor exiting non-zero is normal; the operator closes it.
        let _ = Command::new("idf.py")
            .args(["-p", port, "monitor"])
            .current_dir(cwd)
            .status()
            .await
            .context("Failed to launch idf.py monitor")?;
        Ok(())
    }
}

fn common_install_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("esp-idf"));
        paths.push(home.join("esp/esp-idf"));
    }
    paths.push(PathBuf::from("/opt/esp/esp-idf"));
    paths.push(PathBuf::from("/usr/local/esp/esp-idf"));
    paths
}

/// idf.py lives at `$IDF_PATH/tools/idf.py`; walk PATH and work backwards.
fn idf_path_from_tool_on_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join("idf.py");
        if candidate.is_file() {
            return dir.parent().map(Path::to_path_buf);
        }
    }
    None
}

/// Whether a reported `idf.py --version` string is from the tested
/// release line.
pub fn is_compatible_version(version: &str) -> bool {
    version
        .split_whitespace()
        .any(|word| word.starts_with(EXPECTED_IDF_VERSION))
}

/// Print the tail of the idf.py build logs after a failed build.
/// `idf.py` drops timestamped stdout/stderr captures under `build/log`.
pub fn show_build_logs(build_dir: &Path) {
    let log_dir = build_dir.join("log");
    if !log_dir.exists() {
        println!("No log directory found");
        return;
    }

    println!("\n=== Last 20 lines of build logs ===");
    for prefix in ["idf_py_stderr_output", "idf_py_stdout_output"] {
        if let Some(path) = newest_log_with_prefix(&log_dir, prefix) {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                println!("{}:", path.display());
                for line in tail_lines(&contents, 20) {
                    println!("  {line}");
                }
            }
        }
    }
}

fn newest_log_with_prefix(log_dir: &Path, prefix: &str) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(log_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    candidates.sort();
    candidates.pop()
}

fn tail_lines(contents: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_compatibility() {
        assert!(is_compatible_version("ESP-IDF v5.2.4"));
        assert!(is_compatible_version("v5.2.1"));
        assert!(!is_compatible_version("ESP-IDF v5.1.2"));
        assert!(!is_compatible_version("ESP-IDF v5.3"));
        assert!(!is_compatible_version(""));
    }

    #[test]
    fn tail_keeps_last_n_lines() {
        let text = (1..=30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let tail = tail_lines(&text, 20);
        assert_eq!(tail.len(), 20);
        assert_eq!(tail.first(), Some(&"11"));
        assert_eq!(tail.last(), Some(&"30"));

        assert_eq!(tail_lines("a\nb", 20), vec!["a", "b"]);
        assert!(tail_lines("", 20).is_empty());
    }

    #[test]
    fn newest_log_picks_latest_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path();
        std::fs::write(log_dir.join("idf_py_stderr_output_100"), "old").unwrap();
        std::fs::write(log_dir.join("idf_py_stderr_output_200"), "new").unwrap();
        std::fs::write(log_dir.join("unrelated.txt"), "x").unwrap();

        let picked = newest_log_with_prefix(log_dir, "idf_py_stderr_output").unwrap();
        assert!(picked.ends_with("idf_py_stderr_output_200"));
        assert!(newest_log_with_prefix(log_dir, "idf_py_stdout_output").is_none());
    }
}
