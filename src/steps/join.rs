//! Configure the CLI device to join the Thread network.
//!
//! The wizard cannot type into the device console for the operator, so
//! this step prints the exact command sequences (three alternative
//! reentry methods), opens the monitor, and asks whether the join
//! succeeded.

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::dataset::ParsedDataset;
use crate::idf::Idf;
use crate::paths;
use crate::ports;
use crate::session::Session;
use crate::steps::pause;

/// Load dataset text from the session, falling back to the saved file.
fn load_dataset_text(session: &Session) -> Result<String> {
    if let Some(text) = &session.dataset {
        return Ok(text.clone());
    }
    let path = paths::dataset_file()?;
    if path.exists() {
        println!("Loaded dataset from file.");
        return Ok(std::fs::read_to_string(path)?);
    }
    bail!("No dataset available. Please run the 'dataset' step first.")
}

pub async fn configure_cli(
    idf: &Idf,
    session: &mut Session,
    port_override: Option<&str>,
) -> Result<()> {
    println!("\n=== Configuring OpenThread CLI to Join Network ===");
    println!("\n⚠ IMPORTANT: both devices should still be connected to your computer.");

    let cli_port = match (port_override, &session.cli_port) {
        (Some(p), _) => {
            session.cli_port = Some(p.to_string());
            p.to_string()
        }
        (None, Some(p)) if ports::check_port(Some(p.as_str())) => p.clone(),
        _ => {
            println!("CLI device not found at previous port. Detecting it again.");
            let port = ports::find_device_port("ESP32-C6 CLI")?;
            session.cli_port = Some(port.clone());
            port
        }
    };

    let cli_dir = paths::cli_example_dir(idf.path());
    let params = ParsedDataset::parse(&load_dataset_text(session)?);

    loop {
        print_instructions(&params);
        pause("\nPress Enter to open the CLI console...")?;

        idf.monitor(&cli_dir, &cli_port).await?;

        let joined = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Did the CLI successfully join the Thread network?")
            .interact()?;
        if joined {
            break;
        }

        print_troubleshooting();
        let retry = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Try configuring the CLI again?")
            .default(true)
            .interact()?;
        if !retry {
            bail!("CLI configuration aborted");
        }
    }

    println!("✔ OpenThread CLI configured successfully");
    session.save()?;
    Ok(())
}

fn print_instructions(params: &ParsedDataset) {
    println!("\n=== CLI Console Instructions ===");
    println!("After the console opens, we'll try THREE different methods to set the dataset.");
    println!("If one method fails, try the next one.");

    println!("\nMETHOD 1: set each parameter individually");
    println!("Run these commands one by one:");
    for cmd in params.cli_commands() {
        println!("   {cmd}");
    }
    println!("   dataset commit active");

    println!("\nMETHOD 2: multi-line dataset input");
    println!("Run this command:");
    println!("   dataset set active -");
    println!("Then paste each line exactly as shown, pressing Enter after each:");
    for line in params.reentry_lines() {
        println!("   {line}");
    }
    println!("   (press Enter on an empty line to finish)");

    println!("\nMETHOD 3: hex TLV string");
    println!("On the Border Router console, run:");
    println!("   dataset tlvs active");
    println!("Copy the hex string output, then on the CLI console run:");
    println!("   dataset set active <paste-hex-string-here>");

    println!("\nAfter setting the dataset with ANY method, run:");
    println!("   ifconfig up");
    println!("   thread start");
    println!("\nYou should see messages indicating the device is joining the network.");
    println!("Press Ctrl+] to exit the console when done");
}

fn print_troubleshooting() {
    println!("\nTroubleshooting tips:");
    println!("1. Make sure both devices are powered on and properly connected");
    println!("2. Try resetting both devices and running the commands again");
    println!("3. Try the hex TLV method (METHOD 3) if the others fail");
    println!("4. Check that the Border Router is functioning properly");
}
