// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::io::Write;
use std::time::Duration;

use labwired_uart_config::TransmitterConfig;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::{CancelToken, Message, TransmitError, TxResult};

/// Label in front of every console echo line.
pub const CONSOLE_PREFIX: &str = "send message. ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub messages_sent: u64,
    pub stop_reason: StopReason,
}

/// Owns the port for its whole lifetime. There is no explicit close: the
/// port is closed when the `port` field is dropped along with the transmitter.
pub struct Transmitter<P: Write> {
    port: P,
    port_name: String,
    settle: Duration,
    interval: Duration,
    max_messages: Option<u64>,
}

impl Transmitter<Box<dyn SerialPort>> {
    /// Opens `config.port` as 8N1 without flow control.
    pub fn open(config: &TransmitterConfig) -> TxResult<Self> {
        info!(
            "Opening serial port {} at {} baud",
            config.port, config.baud_rate
        );
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(config.timeout())
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .open()
            .map_err(|source| TransmitError::PortOpen {
                port: config.port.clone(),
                source,
            })?;
        Ok(Self::with_port(port, config))
    }
}

impl<P: Write> Transmitter<P> {
    pub fn with_port(port: P, config: &TransmitterConfig) -> Self {
        Self {
            port,
            port_name: config.port.clone(),
            settle: config.settle(),
            interval: config.interval(),
            max_messages: config.max_messages,
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Waits for the link to stabilise before the first write.
    /// Returns `true` if cancelled while waiting.
    pub fn settle(&self, cancel: &CancelToken) -> bool {
        if self.settle.is_zero() {
            return cancel.is_cancelled();
        }
        debug!("Settling for {:?}", self.settle);
        cancel.wait_timeout(self.settle)
    }

    /// Writes one message to the port, then echoes it to `console`.
    pub fn send<C: Write>(&mut self, message: &Message, console: &mut C) -> TxResult<()> {
        let wire = message.to_wire();
        self.port
            .write_all(wire.as_bytes())
            .and_then(|_| self.port.flush())
            .map_err(|source| TransmitError::Write {
                port: self.port_name.clone(),
                source,
            })?;
        debug!("Wrote {} bytes to {}", wire.len(), self.port_name);

        writeln!(console, "{}{}", CONSOLE_PREFIX, message)
            .and_then(|_| console.flush())
            .map_err(TransmitError::Console)
    }

    /// Sends one message per interval until cancelled or the message limit
    /// is reached. The first failed write ends the loop with an error.
    pub fn run_loop<C: Write>(
        &mut self,
        cancel: &CancelToken,
        console: &mut C,
    ) -> TxResult<RunSummary> {
        let mut sent = 0u64;
        loop {
            if cancel.is_cancelled() {
                return Ok(self.summary(sent, StopReason::Cancelled));
            }
            if self.max_messages.is_some_and(|max| sent >= max) {
                return Ok(self.summary(sent, StopReason::LimitReached));
            }

            self.send(&Message::now(), console)?;
            sent += 1;

            if self.max_messages.is_some_and(|max| sent >= max) {
                return Ok(self.summary(sent, StopReason::LimitReached));
            }
            if cancel.wait_timeout(self.interval) {
                return Ok(self.summary(sent, StopReason::Cancelled));
            }
        }
    }

    /// Settles, runs the loop, and releases the port on every exit path.
    pub fn run<C: Write>(mut self, cancel: &CancelToken, console: &mut C) -> TxResult<RunSummary> {
        if self.settle(cancel) {
            return Ok(self.summary(0, StopReason::Cancelled));
        }
        info!(
            "Transmitting on {} every {:?}",
            self.port_name, self.interval
        );
        self.run_loop(cancel, console)
    }

    fn summary(&self, messages_sent: u64, stop_reason: StopReason) -> RunSummary {
        info!(
            "Stopped ({:?}) after {} message(s) on {}",
            stop_reason, messages_sent, self.port_name
        );
        RunSummary {
            messages_sent,
            stop_reason,
        }
    }
}

impl<P: Write> Drop for Transmitter<P> {
    fn drop(&mut self) {
        debug!("Closing serial port {}", self.port_name);
    }
}
