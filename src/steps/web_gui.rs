//! Border router web GUI verification.
//!
//! The BR firmware serves a small configuration UI once it has joined
//! Wi-Fi. The device prints its IP on the console; the operator relays it
//! and the wizard probes the page.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use std::time::Duration;

use crate::idf::Idf;
use crate::paths;
use crate::ports;
use crate::session::Session;
use crate::steps::pause;

pub async fn setup_web_gui(
    idf: &Idf,
    session: &mut Session,
    port_override: Option<&str>,
) -> Result<()> {
    println!("\n=== Setting up Web GUI ===");
    println!("The Border Router provides a web interface for configuration and monitoring.");

    println!("\n=== Wi-Fi Configuration ===");
    println!("Join the Border Router to your Wi-Fi from its console (`wifi connect -s <ssid> -p <password>`),");
    println!("or use the credentials baked into the firmware configuration.");

    let br_port = match (port_override, &session.border_router_port) {
        (Some(p), _) => {
            session.border_router_port = Some(p.to_string());
            p.to_string()
        }
        (None, Some(p)) if ports::check_port(Some(p.as_str())) => p.clone(),
        _ => {
            let port: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Border Router port is not set. Enter it (e.g. /dev/ttyUSB0)")
                .interact_text()?;
            session.border_router_port = Some(port.clone());
            port
        }
    };

    println!("\n=== Web GUI IP Address Fetch Instructions ===");
    println!("1. The monitor will open on the Border Router.");
    println!("2. Look for a line containing 'IP Address:' in the output.");
    println!("3. Copy the IP address and exit the monitor with Ctrl+].");
    pause("\nPress Enter to open the Border Router monitor...")?;

    let br_dir = paths::border_router_example_dir()?;
    idf.monitor(&br_dir, &br_port).await?;

    let ip_address: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter the IP address shown in the monitor")
        .interact_text()?;

    let url = format!("http://{ip_address}");
    println!("\nYou can access the Web GUI at {url}");
    println!("Use the web interface to:");
    println!("1. Monitor the Thread network status");
    println!("2. Configure network settings");
    println!("3. View connected devices");

    println!("\nVerifying basic web GUI access...");
    match probe(&url).await {
        Ok(()) => println!("✔ Web GUI is accessible!"),
        Err(e) => {
            tracing::debug!(error = %e, "web GUI probe failed");
            println!(
                "✖ Web GUI not reachable at {url}. Double-check the IP address and make sure\n\
                 the Border Router is connected to your network."
            );
        }
    }

    session.save()?;
    Ok(())
}

async fn probe(url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent("esp-thread-setup")
        .timeout(Duration::from_secs(5))
        .build()?;
    client.get(url).send().await?.error_for_status()?;
    Ok(())
}
