//! Prerequisite checks: ESP-IDF toolchain and existing checkouts.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;

use crate::idf::{self, Idf};
use crate::paths;

/// Verify the ESP-IDF environment and probe for existing repositories.
///
/// Returns the located IDF handle and whether repository download should
/// be skipped (operator chose to keep existing checkouts).
pub async fn check_prerequisites(idf_override: Option<&Path>) -> Result<(Idf, bool)> {
    println!("Checking prerequisites...");

    let idf = Idf::locate(idf_override)?;
    tracing::debug!(path = %idf.path().display(), "ESP-IDF located");

    let version = idf.version().await?;
    println!("Detected ESP-IDF version: {version}");
    if !idf::is_compatible_version(&version) {
        println!(
            "WARNING: this setup is tested against ESP-IDF {}; other versions may not work.",
            idf::EXPECTED_IDF_VERSION
        );
    }

    println!("✔ ESP-IDF environment is properly set up");

    let mut skip_repositories = false;
    let br_path = paths::thread_br_dir()?;
    if br_path.exists() {
        println!("\nDetected existing repositories:");
        println!("- esp-thread-br found at: {}", br_path.display());

        skip_repositories = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Skip repository setup and use existing checkouts?")
            .default(true)
            .interact()?;
        if skip_repositories {
            println!("✔ Will use existing repositories");
        } else {
            println!("Will download/update repositories...");
        }
    }

    Ok((idf, skip_repositories))
}
