//! Border router build and flash.

use anyhow::{bail, Result};

use crate::idf::Idf;
use crate::paths;
use crate::ports;
use crate::sdkconfig;
use crate::session::Session;
use crate::steps::pause;

/// Patch, build, and flash the border router firmware.
///
/// Only the border router device needs to be connected; the CLI device is
/// handled in a later step.
pub async fn setup_border_router(
    idf: &Idf,
    session: &mut Session,
    port_override: Option<&str>,
) -> Result<()> {
    println!("\n=== Setting up ESP Thread Border Router ===");
    println!("IMPORTANT: for this step, connect only the Border Router device.");
    pause("Connect your ESP Thread Border Router device and press Enter to continue...")?;

    let port = ports::resolve_port(port_override, "ESP Thread Border Router")?;
    println!("ESP Thread Border Router found at port: {port}");

    let br_dir = paths::border_router_example_dir()?;
    if !br_dir.exists() {
        bail!(
            "Border Router example directory not found at {}\n\
             Please run the repository download step first.",
            br_dir.display()
        );
    }

    // The BR must not reflash the RCP we just built, and the web GUI
    // should be reachable after setup.
    println!("Disabling RCP auto-update and enabling the Web GUI...");
    let config = sdkconfig::config_file_for(&br_dir)?;
    sdkconfig::apply_settings(&config, sdkconfig::BORDER_ROUTER_SETTINGS)?;

    println!("Cleaning previous build...");
    idf.run_quiet(&br_dir, &["fullclean"], "Cleaning Border Router build directory")
        .await?;

    println!("Building Border Router firmware (this will take a while)...");
    idf.run_quiet(&br_dir, &["build"], "Building Border Router firmware")
        .await?;

    println!("Flashing Border Router firmware...");
    idf.run(&br_dir, &["-p", &port, "flash"]).await?;

    println!("✔ Border Router firmware flashed successfully");

    session.border_router_port = Some(port);
    session.save()?;
    Ok(())
}
