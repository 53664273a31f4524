// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod cancel;
pub mod message;
pub mod ports;
pub mod transmitter;

pub use cancel::CancelToken;
pub use message::{Message, ParseMessageError};
pub use transmitter::{RunSummary, StopReason, Transmitter};

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    #[error("Cannot open serial port {port}: {source}")]
    PortOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("Write to serial port {port} failed: {source}")]
    Write {
        port: String,
        #[source]
        source: io::Error,
    },
    #[error("Console output failed: {0}")]
    Console(#[source] io::Error),
    #[error("Failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),
    #[error("Failed to install Ctrl-C handler: {0}")]
    Signal(#[source] ctrlc::Error),
}

pub type TxResult<T> = Result<T, TransmitError>;
