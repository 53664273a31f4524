// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SCHEMA_VERSION: &str = "1.0";

/// Must match the receiver side of the link.
pub const DEFAULT_BAUD_RATE: u32 = 230_400;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_SETTLE_MS: u64 = 1000;
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM6";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE_MS
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported schema_version '{0}'. Supported versions: '1.0'")]
    UnsupportedSchema(String),
    #[error("Port identifier cannot be empty")]
    EmptyPort,
    #[error("Baud rate must be greater than zero")]
    ZeroBaudRate,
    #[error("Send interval must be greater than zero")]
    ZeroInterval,
    #[error("Port timeout must be greater than zero")]
    ZeroTimeout,
}

/// Serial link settings of the transmitter.
///
/// Fixed at startup; the transmitter only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransmitterConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Driver timeout. Nothing is read, but writes wait on it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Stop after this many messages. Unbounded when absent.
    #[serde(default)]
    pub max_messages: Option<u64>,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            port: default_port(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            interval_ms: DEFAULT_INTERVAL_MS,
            max_messages: None,
        }
    }
}

impl TransmitterConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            ..Self::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("Failed to open transmitter config at {:?}", path))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse transmitter config YAML")?;
        config.validate()?;
        tracing::debug!("Loaded transmitter config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchema(self.schema_version.clone()));
        }
        if self.port.trim().is_empty() {
            return Err(ConfigError::EmptyPort);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        // serialport polls for writability with this timeout
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
