//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "esp-thread-setup")]
#[command(author, version, about = "ESP Thread Border Router setup wizard", long_about = None)]
pub struct Cli {
    /// Serial port of the device a step targets (skips auto-detection)
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Path to the ESP-IDF checkout (defaults to $IDF_PATH or common
    /// install locations)
    #[arg(long, global = true)]
    pub idf_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the complete setup process (all steps in order)
    Setup,

    /// Check the ESP-IDF environment and existing checkouts
    Prereqs,

    /// Download/update the vendor repositories
    Repos {
        /// Keep existing checkouts without asking
        #[arg(long)]
        skip_existing: bool,
    },

    /// Build the RCP (radio coprocessor) firmware
    Rcp {
        /// RCP target chip
        #[arg(short, long, default_value = "esp32h2")]
        target: String,
    },

    /// Build and flash the Border Router firmware
    BorderRouter,

    /// Build and flash the OpenThread CLI firmware (ESP32-C6)
    CliDevice,

    /// Create the Thread network dataset on the Border Router
    Dataset,

    /// Configure the CLI device to join the Thread network
    Join,

    /// Verify the Border Router web GUI
    WebGui,

    /// List available serial ports
    Ports,

    /// Parse a saved dataset dump and print the extracted fields
    Parse {
        /// Dataset file (console paste); reads stdin when omitted
        file: Option<PathBuf>,
    },
}
