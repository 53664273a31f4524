// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serialport::{SerialPortInfo, SerialPortType};

use crate::{TransmitError, TxResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortListing {
    pub name: String,
    pub description: String,
}

pub fn list_ports() -> TxResult<Vec<PortListing>> {
    let mut ports: Vec<PortListing> = serialport::available_ports()
        .map_err(TransmitError::Enumerate)?
        .iter()
        .map(|info| PortListing {
            name: info.port_name.clone(),
            description: describe(info),
        })
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ports)
}

pub fn describe(info: &SerialPortInfo) -> String {
    match info.port_type {
        SerialPortType::UsbPort(ref usb) => describe_usb(
            usb.vid,
            usb.pid,
            usb.manufacturer.as_deref(),
            usb.product.as_deref(),
        ),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}

fn describe_usb(vid: u16, pid: u16, manufacturer: Option<&str>, product: Option<&str>) -> String {
    let mut out = format!("USB {:04x}:{:04x}", vid, pid);
    let names: Vec<&str> = [manufacturer, product].into_iter().flatten().collect();
    if !names.is_empty() {
        out.push_str(&format!(" ({})", names.join(" ")));
    }
    out
}
