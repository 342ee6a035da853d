//! Filesystem layout for the ESP toolchain and vendor repositories.
//!
//! Everything lives under `~/esp` by convention: the ESP-IDF checkout
//! (overridable via `IDF_PATH`) and the `esp-thread-br` repository next
//! to it. The three firmware images are example projects inside those
//! trees.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Default RCP build target. The border router carries an ESP32-H2 radio
/// coprocessor on current dev kits.
pub const DEFAULT_RCP_TARGET: &str = "esp32h2";

/// Target chip of the CLI client device.
pub const CLI_TARGET: &str = "esp32c6";

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Parent directory for vendor checkouts (`~/esp`).
pub fn esp_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join("esp"))
}

/// The `esp-thread-br` repository checkout.
pub fn thread_br_dir() -> Result<PathBuf> {
    Ok(esp_dir()?.join("esp-thread-br"))
}

/// Border router example project (build/flash working directory, and
/// where `thread_dataset.txt` is saved).
pub fn border_router_example_dir() -> Result<PathBuf> {
    Ok(thread_br_dir()?.join("examples/basic_thread_border_router"))
}

pub fn dataset_file() -> Result<PathBuf> {
    Ok(border_router_example_dir()?.join("thread_dataset.txt"))
}

pub fn parsed_dataset_file() -> Result<PathBuf> {
    Ok(border_router_example_dir()?.join("parsed_thread_dataset.txt"))
}

/// RCP example project inside the ESP-IDF tree.
pub fn rcp_example_dir(idf_path: &std::path::Path) -> PathBuf {
    idf_path.join("examples/openthread/ot_rcp")
}

/// OpenThread CLI example project inside the ESP-IDF tree.
pub fn cli_example_dir(idf_path: &std::path::Path) -> PathBuf {
    idf_path.join("examples/openthread/ot_cli")
}
