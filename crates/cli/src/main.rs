// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use labwired_uart_config::TransmitterConfig;
use labwired_uart_core::{ports, CancelToken, TransmitError, Transmitter};

const EXIT_OK: u8 = 0;
const EXIT_PORT_OPEN: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "LabWired UART test transmitter",
    long_about = "Opens a serial port and sends \"serial message test. time=<unix time>\\r\\n\" \
                  once per interval until interrupted with Ctrl-C."
)]
struct Cli {
    /// Serial port identifier (e.g. /dev/ttyUSB0, COM6)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate, must match the receiver
    #[arg(short, long)]
    baud: Option<u32>,

    /// Driver read timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Delay between opening the port and the first message
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Delay between messages
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop after this many messages instead of running until interrupted
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Transmitter config (YAML). Command-line values take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List serial ports visible on this host.
    ListPorts,
}

impl Cli {
    fn resolve_config(&self) -> Result<TransmitterConfig> {
        let mut config = match &self.config {
            Some(path) => TransmitterConfig::from_file(path)?,
            None => TransmitterConfig::default(),
        };

        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.settle_ms = settle_ms;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        if self.count.is_some() {
            config.max_messages = self.count;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries only the transmission echo
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::ListPorts) => run_list_ports(),
        None => run_transmit(&cli),
    }
}

fn run_transmit(cli: &Cli) -> ExitCode {
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    let installed = ctrlc::set_handler(move || handler_token.cancel());
    if let Err(e) = installed.map_err(TransmitError::Signal) {
        error!("{}", e);
        return ExitCode::from(exit_code_for(&e));
    }

    let transmitter = match Transmitter::open(&config) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(exit_code_for(&e));
        }
    };

    let stdout = io::stdout();
    let mut console = stdout.lock();
    match transmitter.run(&cancel, &mut console) {
        Ok(summary) => {
            info!(
                "Sent {} message(s) on {}",
                summary.messages_sent, config.port
            );
            ExitCode::from(EXIT_OK)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run_list_ports() -> ExitCode {
    let listing = match ports::list_ports() {
        Ok(listing) => listing,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(exit_code_for(&e));
        }
    };

    if listing.is_empty() {
        info!("No serial ports found");
        return ExitCode::from(EXIT_OK);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for port in &listing {
        if let Err(e) = writeln!(out, "{}\t{}", port.name, port.description) {
            error!("Console output failed: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    }
    ExitCode::from(EXIT_OK)
}

fn exit_code_for(err: &TransmitError) -> u8 {
    match err {
        TransmitError::PortOpen { .. } => EXIT_PORT_OPEN,
        TransmitError::Write { .. }
        | TransmitError::Console(_)
        | TransmitError::Enumerate(_)
        | TransmitError::Signal(_) => EXIT_RUNTIME_ERROR,
    }
}
