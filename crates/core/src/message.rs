// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

pub const MESSAGE_PREFIX: &str = "serial message test. time=";
pub const TERMINATOR: &str = "\r\n";

/// One timestamped test line.
///
/// `Display` renders the text without the line terminator; [`Message::to_wire`]
/// appends CRLF for transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message {
    timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseMessageError {
    #[error("line does not start with the test message prefix")]
    MissingPrefix,
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

impl Message {
    pub fn now() -> Self {
        Self::at(SystemTime::now())
    }

    /// Times before the epoch clamp to zero.
    pub fn at(time: SystemTime) -> Self {
        let timestamp = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self { timestamp }
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn to_wire(&self) -> String {
        format!("{}{}", self, TERMINATOR)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole seconds keep a fractional digit so the field always reads as a float.
        if self.timestamp.fract() == 0.0 {
            write!(f, "{}{:.1}", MESSAGE_PREFIX, self.timestamp)
        } else {
            write!(f, "{}{}", MESSAGE_PREFIX, self.timestamp)
        }
    }
}

impl FromStr for Message {
    type Err = ParseMessageError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.strip_suffix(TERMINATOR).unwrap_or(line);
        let value = line
            .strip_prefix(MESSAGE_PREFIX)
            .ok_or(ParseMessageError::MissingPrefix)?;
        let timestamp: f64 = value
            .parse()
            .map_err(|_| ParseMessageError::InvalidTimestamp(value.to_string()))?;
        if !timestamp.is_finite() || timestamp < 0.0 {
            return Err(ParseMessageError::InvalidTimestamp(value.to_string()));
        }
        Ok(Self { timestamp })
    }
}
