//! esp-thread-setup - Interactive setup wizard for the ESP Thread Border
//! Router development kit.
//!
//! Walks an operator through downloading the vendor SDK, building and
//! flashing the three firmware images (RCP coprocessor, border router,
//! CLI client) via `idf.py`, creating a Thread network dataset from
//! pasted console output, and joining the CLI device to the network.

mod cli;
mod dataset;
mod idf;
mod paths;
mod ports;
mod repos;
mod sdkconfig;
mod session;
mod steps;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use dataset::ParsedDataset;
use idf::Idf;
use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let idf_override = cli.idf_path.as_deref();
    let port = cli.port.as_deref();
    let mut session = Session::load_or_default();

    match cli.command {
        Commands::Setup => {
            steps::setup::run_all(idf_override, &mut session, port).await?;
        }
        Commands::Prereqs => {
            let (_, skip) = steps::prereqs::check_prerequisites(idf_override).await?;
            session.skip_repositories = skip;
            session.save()?;
        }
        Commands::Repos { skip_existing } => {
            repos::download_repositories(skip_existing || session.skip_repositories).await?;
        }
        Commands::Rcp { target } => {
            let idf = Idf::locate(idf_override)?;
            steps::rcp::build_rcp_firmware(&idf, &target).await?;
        }
        Commands::BorderRouter => {
            let idf = Idf::locate(idf_override)?;
            steps::border_router::setup_border_router(&idf, &mut session, port).await?;
        }
        Commands::CliDevice => {
            let idf = Idf::locate(idf_override)?;
            steps::cli_device::flash_cli_device(&idf, &mut session, port).await?;
        }
        Commands::Dataset => {
            let idf = Idf::locate(idf_override)?;
            steps::dataset::create_dataset(&idf, &mut session, port).await?;
        }
        Commands::Join => {
            let idf = Idf::locate(idf_override)?;
            steps::join::configure_cli(&idf, &mut session, port).await?;
        }
        Commands::WebGui => {
            let idf = Idf::locate(idf_override)?;
            steps::web_gui::setup_web_gui(&idf, &mut session, port).await?;
        }
        Commands::Ports => {
            ports::list_ports()?;
        }
        Commands::Parse { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    use std::io::Read;
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let parsed = ParsedDataset::parse(&text);
            for (name, value) in parsed.fields() {
                println!("{name}: {value}");
            }
        }
    }

    Ok(())
}
