use anyhow::Result;
use cashdesk_core::{BillingSession, InMemoryCatalog, SessionSettings};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    signal::unix::{SignalKind, signal},
};
use tracing::{info, warn};

mod config;
mod events;
mod handlers;
mod utils;

use crate::{
    config::Settings,
    events::operator_command::OperatorCommand,
    handlers::operator_command::{Flow, handle_operator_command},
    utils::terminal_sink::TerminalSink,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Args {
    #[arg(long, help = "(Optional) Sets the configuration file path.", required = false)]
    pub config: Option<String>,

    #[arg(
        long,
        help = "(Optional) Loads the product catalog from a JSON file.",
        required = false
    )]
    pub catalog: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut settings = Settings::load(&args.config)?;
    if let Some(path) = args.catalog {
        settings.catalog_path = Some(path);
    }

    info!("Starting terminal {}", settings.terminal_name);

    let catalog = match &settings.catalog_path {
        Some(path) => InMemoryCatalog::from_path(path)?,
        None => {
            info!("No catalog file configured, using sample products");
            InMemoryCatalog::with_samples()
        }
    };

    let mut terminal = BillingSession::new(
        catalog,
        TerminalSink::stdout(settings.currency_symbol.clone()),
        SessionSettings {
            invoice_prefix: settings.invoice_prefix.clone(),
        },
    );
    terminal.sink_mut().print_line("Type `help` for commands.")?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed. Shutting down...");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match line.parse::<OperatorCommand>() {
                    Ok(command) => command,
                    Err(e) => {
                        terminal.sink_mut().print_line(&e.to_string())?;
                        continue;
                    }
                };

                match handle_operator_command(&mut terminal, command, &settings.currency_symbol) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => {
                        info!("Operator quit. Shutting down...");
                        break;
                    }
                    Err(e) => warn!("Command failed: {e}"),
                }
            },
            _ = sigterm.recv() => {
                info!("Received SIGTERM. Shutting down...");
                break;
            },
            _ = sigint.recv() => {
                info!("Received SIGINT. Shutting down...");
                break;
            }
        }
    }

    if !terminal.cart().is_empty() {
        warn!(
            "Terminal closed with {} unpaid lines in the bill",
            terminal.cart().items().len()
        );
    }

    Ok(())
}
