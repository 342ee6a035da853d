//! Thread network dataset creation.
//!
//! The dataset is created on the border router's own console: the wizard
//! opens the serial monitor, the operator runs the `dataset` commands and
//! pastes the output back, and the paste is parsed into structured fields
//! and saved for the join step.

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::dataset::RawDataset;
use crate::idf::Idf;
use crate::paths;
use crate::ports;
use crate::session::Session;
use crate::steps::{pause, read_pasted_block};

/// Generate a network name with a short numeric suffix from the clock.
fn generate_network_name() -> String {
    let suffix = chrono::Utc::now().timestamp() % 10000;
    format!("ESP-Thread-{suffix}")
}

/// Walk the operator through creating a dataset on the border router and
/// capture the pasted console output.
pub async fn create_dataset(
    idf: &Idf,
    session: &mut Session,
    port_override: Option<&str>,
) -> Result<()> {
    println!("\n=== Creating Thread Network Dataset ===");
    println!("\n⚠ IMPORTANT: for this step, connect BOTH devices to your computer:");
    println!("1. The ESP Thread Border Router");
    println!("2. The ESP32-C6 CLI device");
    pause("\nConfirm that BOTH devices are connected and press Enter to continue...")?;

    // An explicit --port wins; otherwise re-detect the BR port if the
    // saved one is gone (devices get re-plugged between steps).
    let br_port = match (port_override, &session.border_router_port) {
        (Some(p), _) => {
            session.border_router_port = Some(p.to_string());
            p.to_string()
        }
        (None, Some(p)) if ports::check_port(Some(p.as_str())) => p.clone(),
        _ => {
            println!("Border Router port not found or not set. Detecting it now.");
            let port = ports::find_device_port("ESP Thread Border Router")?;
            println!("Border Router found at port: {port}");
            session.border_router_port = Some(port.clone());
            port
        }
    };

    let br_dir = paths::border_router_example_dir()?;
    if !br_dir.exists() {
        bail!(
            "Border Router example directory not found at {}\n\
             Please run the repository download step first.",
            br_dir.display()
        );
    }

    // Stale dataset files confuse reruns.
    let dataset_path = paths::dataset_file()?;
    if dataset_path.exists() {
        std::fs::remove_file(&dataset_path)?;
        tracing::debug!(path = %dataset_path.display(), "deleted existing dataset file");
    }

    let network_name = generate_network_name();
    println!("Creating Thread network: {network_name}");

    println!("\n=== Border Router Console Instructions ===");
    println!("After the console opens, run these commands:");
    println!("1. dataset init new");
    println!("2. dataset networkname {network_name}");
    println!("3. dataset commit active");
    println!("4. dataset");
    println!("5. Copy the entire dataset output (from 'Active Timestamp:' to the end)");
    println!("\nPress Ctrl+] to exit the console when done");
    pause("\nPress Enter to open the Border Router console...")?;

    idf.monitor(&br_dir, &br_port).await?;

    let raw = loop {
        println!("\n=== Thread Network Dataset ===");
        println!("Paste the ENTIRE dataset output below.");
        println!("It should start with 'Active Timestamp:' and include all network parameters.");
        println!("Press Enter on an empty line to finish input.\n");

        let raw = RawDataset::from_lines(read_pasted_block()?);

        // Validity policy lives here, not in the parser: a usable paste
        // carries the Active Timestamp marker.
        if raw.is_empty() || !raw.has_active_timestamp() {
            println!("\n✖ Invalid dataset. The output should start with 'Active Timestamp:'.");
            println!("Make sure you copied the entire output of the 'dataset' command.");
            let retry = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Try entering the dataset again?")
                .default(true)
                .interact()?;
            if retry {
                continue;
            }
            bail!("Dataset entry aborted");
        }
        break raw;
    };

    std::fs::write(&dataset_path, raw.text())?;
    println!("✔ Thread network dataset saved to {}", dataset_path.display());

    let parsed = raw.parse();

    println!("\n=== Parsed Dataset Parameters ===");
    for (name, value) in parsed.fields() {
        println!("{name}: {value}");
    }

    let parsed_path = paths::parsed_dataset_file()?;
    std::fs::write(&parsed_path, parsed.to_file_contents())?;
    println!("✔ Parsed dataset parameters saved to {}", parsed_path.display());

    session.dataset = Some(raw.text());
    session.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_name_has_short_numeric_suffix() {
        let name = generate_network_name();
        let suffix = name.strip_prefix("ESP-Thread-").unwrap();
        let n: i64 = suffix.parse().unwrap();
        assert!((0..10000).contains(&n));
    }
}
