//! Serial port detection for ESP dev boards.
//!
//! The kit's two devices both enumerate as USB-UART bridges (or ESP32
//! native USB), so detection is heuristic: filter the port list by known
//! bridge vendors and let the operator pick when it's ambiguous.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serialport::{SerialPortInfo, SerialPortType, UsbPortInfo};
use std::path::Path;

/// USB vendor IDs of bridges found on ESP dev boards.
const ESPRESSIF_VID: u16 = 0x303a; // ESP32-S3/C6/H2 native USB
const CP210X_VID: u16 = 0x10c4;
const CH340_VID: u16 = 0x1a86;
const FTDI_VID: u16 = 0x0403;

/// Whether a USB port looks like an ESP dev board.
pub fn is_esp_usb(info: &UsbPortInfo) -> bool {
    match info.vid {
        ESPRESSIF_VID | CH340_VID | FTDI_VID => true,
        CP210X_VID => info.pid == 0xea60,
        _ => {
            // Fall back to the product string for oddball bridges.
            let product = info.product.as_deref().unwrap_or("");
            product.contains("CP210") || product.contains("CH340") || product.contains("FTDI")
        }
    }
}

fn describe(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(info) => {
            let product = info.product.as_deref().unwrap_or("USB serial");
            format!(
                "{} ({}, VID:{:04x} PID:{:04x})",
                port.port_name, product, info.vid, info.pid
            )
        }
        _ => port.port_name.clone(),
    }
}

fn esp_like_ports(ports: &[SerialPortInfo]) -> Vec<&SerialPortInfo> {
    ports
        .iter()
        .filter(|p| match &p.port_type {
            SerialPortType::UsbPort(info) => is_esp_usb(info),
            _ => false,
        })
        .collect()
}

/// Use an explicitly supplied port when given, otherwise detect.
pub fn resolve_port(explicit: Option<&str>, device_label: &str) -> Result<String> {
    if let Some(p) = explicit {
        return Ok(p.to_string());
    }
    find_device_port(device_label)
}

/// Find the serial port for a named device role, prompting the operator
/// when detection is ambiguous or comes up empty.
pub fn find_device_port(device_label: &str) -> Result<String> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;

    if ports.is_empty() {
        return manual_entry(device_label);
    }

    let candidates = esp_like_ports(&ports);

    match candidates.len() {
        0 => {
            println!("No ESP32-like devices found. Available ports:");
            let items: Vec<String> = ports.iter().map(describe).collect();
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Select port for {device_label}"))
                .items(&items)
                .default(0)
                .interact()?;
            Ok(ports[choice].port_name.clone())
        }
        1 => {
            let port = candidates[0].port_name.clone();
            tracing::debug!(port = %port, "single ESP-like device found");
            Ok(port)
        }
        _ => {
            println!("Multiple ESP32-like devices found.");
            let items: Vec<String> = candidates.iter().map(|p| describe(p)).collect();
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Select port for {device_label}"))
                .items(&items)
                .default(0)
                .interact()?;
            Ok(candidates[choice].port_name.clone())
        }
    }
}

fn manual_entry(device_label: &str) -> Result<String> {
    let port: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "No serial ports found. Enter port for {device_label} (e.g. /dev/ttyUSB0)"
        ))
        .interact_text()?;
    Ok(port)
}

/// Whether a previously detected port is still present.
pub fn check_port(port: Option<&str>) -> bool {
    match port {
        Some(p) if !p.is_empty() => Path::new(p).exists(),
        _ => false,
    }
}

/// List available serial ports.
pub fn list_ports() -> Result<()> {
    println!("Available serial ports:\n");

    let ports = serialport::available_ports()?;

    if ports.is_empty() {
        println!("  No serial ports found");
        return Ok(());
    }

    for port in &ports {
        let esp = matches!(&port.port_type,
            SerialPortType::UsbPort(info) if is_esp_usb(info));
        let marker = if esp { " [ESP?]" } else { "" };
        println!("  {}{}", describe(port), marker);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb(vid: u16, pid: u16, product: Option<&str>) -> UsbPortInfo {
        UsbPortInfo {
            vid,
            pid,
            serial_number: None,
            manufacturer: None,
            product: product.map(String::from),
        }
    }

    #[test]
    fn recognizes_known_bridge_vendors() {
        assert!(is_esp_usb(&usb(0x303a, 0x1001, None))); // ESP32 native USB
        assert!(is_esp_usb(&usb(0x10c4, 0xea60, None))); // CP2102
        assert!(is_esp_usb(&usb(0x1a86, 0x7523, None))); // CH340
        assert!(is_esp_usb(&usb(0x0403, 0x6001, None))); // FTDI
    }

    #[test]
    fn rejects_unrelated_usb_devices() {
        assert!(!is_esp_usb(&usb(0x046d, 0xc077, Some("USB Mouse"))));
        // CP210x vendor but not the UART bridge product.
        assert!(!is_esp_usb(&usb(0x10c4, 0x0001, None)));
    }

    #[test]
    fn product_string_fallback() {
        assert!(is_esp_usb(&usb(0xffff, 0x0001, Some("CP2102N USB to UART"))));
        assert!(is_esp_usb(&usb(0xffff, 0x0001, Some("CH340 serial"))));
        assert!(!is_esp_usb(&usb(0xffff, 0x0001, Some("Arduino Uno"))));
    }

    #[test]
    fn explicit_port_skips_detection() {
        // A supplied port is taken as-is; no enumeration or prompting.
        let port = resolve_port(Some("/dev/ttyUSB7"), "Border Router").unwrap();
        assert_eq!(port, "/dev/ttyUSB7");
    }

    #[test]
    fn check_port_handles_missing_and_empty() {
        assert!(!check_port(None));
        assert!(!check_port(Some("")));
        assert!(!check_port(Some("/dev/definitely-not-a-port")));
    }

    #[test]
    fn list_ports_does_not_panic_without_devices() {
        let _ = list_ports();
    }
}
