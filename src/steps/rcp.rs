//! RCP (radio coprocessor) firmware build.
//!
//! The border router flashes the RCP image to its coprocessor itself, so
//! this step only builds the `ot_rcp` example; no device needs to be
//! connected.

use anyhow::{bail, Result};

use crate::idf::{self, Idf};
use crate::paths;

/// Build the RCP firmware required by the border router.
pub async fn build_rcp_firmware(idf: &Idf, target: &str) -> Result<()> {
    println!("\n=== Building RCP firmware ===");

    let rcp_dir = paths::rcp_example_dir(idf.path());
    if !rcp_dir.exists() {
        bail!(
            "RCP example directory not found at {}\n\
             Please make sure the ESP-IDF checkout includes the openthread examples.",
            rcp_dir.display()
        );
    }

    println!("Cleaning previous RCP build...");
    idf.run_quiet(&rcp_dir, &["fullclean"], "Cleaning RCP build directory")
        .await?;

    println!("Building RCP firmware for {target} (this will take a few minutes)...");
    let build = idf
        .run_quiet(
            &rcp_dir,
            &["set-target", target, "build"],
            "Building RCP firmware",
        )
        .await;

    if let Err(e) = build {
        idf::show_build_logs(&rcp_dir.join("build"));
        return Err(e);
    }

    println!("✔ RCP firmware built successfully");
    Ok(())
}

/// Drop placeholder RCP binaries into the build directory.
///
/// Last-resort fallback when the RCP build fails: the border router build
/// expects the files to exist. A placeholder is enough to get past the
/// build step when RCP auto-update is disabled, but a proper build is
/// still the right fix.
pub fn create_fallback_rcp_files(idf: &Idf) -> Result<()> {
    println!("\n=== Creating fallback RCP files ===");
    println!("It's recommended to build the RCP firmware properly; this only unblocks the BR build.");

    let rcp_dir = paths::rcp_example_dir(idf.path());
    if !rcp_dir.exists() {
        bail!("RCP example directory not found at {}", rcp_dir.display());
    }

    let build_dir = rcp_dir.join("build");
    std::fs::create_dir_all(&build_dir)?;

    for chip in ["esp32c6", "esp32s3"] {
        let bin = build_dir.join(format!("ot_rcp-{chip}.bin"));
        if !bin.exists() {
            std::fs::write(
                &bin,
                format!("Fallback RCP placeholder for {chip}. Build the real firmware with idf.py.\n"),
            )?;
            println!("Created fallback RCP file: {}", bin.display());
        }
    }

    println!("✔ Fallback RCP files created/exist");
    Ok(())
}
