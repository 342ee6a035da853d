//! CLI client device flash (ESP32-C6 running the OpenThread CLI example).

use anyhow::{bail, Result};

use crate::idf::{self, Idf};
use crate::paths;
use crate::ports;
use crate::session::Session;
use crate::steps::pause;

/// Build and flash the OpenThread CLI example onto the client device.
pub async fn flash_cli_device(
    idf: &Idf,
    session: &mut Session,
    port_override: Option<&str>,
) -> Result<()> {
    println!("\n=== Setting up CLI ({}) ===", paths::CLI_TARGET);
    println!("IMPORTANT: for this step, connect only the CLI device.");
    println!("The Border Router device will be needed again in later steps.");
    pause("Connect your ESP32-C6 (CLI) device and press Enter to continue...")?;

    let port = ports::resolve_port(port_override, "ESP32-C6 CLI")?;
    println!("ESP32-C6 device found at port: {port}");

    let cli_dir = paths::cli_example_dir(idf.path());
    if !cli_dir.exists() {
        bail!(
            "CLI example directory not found at {}\n\
             Please make sure the ESP-IDF checkout is complete with examples.",
            cli_dir.display()
        );
    }

    println!("Cleaning previous CLI build...");
    idf.run_quiet(&cli_dir, &["fullclean"], "Cleaning CLI build directory")
        .await?;

    println!("Building and flashing the OpenThread CLI example...");
    // Port before set-target: idf.py applies -p to the flash step.
    let flash = idf
        .run(
            &cli_dir,
            &["-p", &port, "set-target", paths::CLI_TARGET, "flash"],
        )
        .await;

    if let Err(e) = flash {
        idf::show_build_logs(&cli_dir.join("build"));
        return Err(e);
    }

    println!("✔ OpenThread CLI ({}) flashed successfully", paths::CLI_TARGET);

    session.cli_port = Some(port);
    session.save()?;
    Ok(())
}
