// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::io::Write;
use std::process::Command;

const MISSING_PORT: &str = "/dev/labwired-uart-tx-missing";

#[test]
fn test_unopenable_port_exits_with_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_labwired-uart-tx"))
        .args(["--port", MISSING_PORT, "--settle-ms", "0"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(MISSING_PORT),
        "diagnostic should name the port. Stderr: {}",
        stderr
    );

    // The loop never started, so nothing was echoed.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("send message."), "Stdout: {}", stdout);
}

#[test]
fn test_invalid_baud_is_config_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_labwired-uart-tx"))
        .args(["--port", MISSING_PORT, "--baud", "0"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Baud rate"), "Stderr: {}", stderr);
}

#[test]
fn test_bad_config_file_is_config_error() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "port: \"{}\"\nstop_bits: 2", MISSING_PORT).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_labwired-uart-tx"))
        .arg("--config")
        .arg(f.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_file_port_is_used() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        f,
        "schema_version: \"1.0\"\nport: \"{}\"\nbaud_rate: 230400",
        MISSING_PORT
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_labwired-uart-tx"))
        .arg("--config")
        .arg(f.path())
        .output()
        .expect("Failed to execute command");

    // Valid config, port absent: fails at open, not at config.
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(MISSING_PORT), "Stderr: {}", stderr);
}

#[test]
fn test_help_lists_options() {
    let output = Command::new(env!("CARGO_BIN_EXE_labwired-uart-tx"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--port"));
    assert!(stdout.contains("--baud"));
    assert!(stdout.contains("list-ports"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_cleanly() {
    use serialport::{SerialPort, TTYPort};
    use std::io::{BufRead, BufReader, Read};
    use std::process::Stdio;

    let (_master, slave) = TTYPort::pair().expect("Unable to create pseudo-terminal pair");
    let name = slave.name().expect("pty slave has no name");

    let mut child = Command::new(env!("CARGO_BIN_EXE_labwired-uart-tx"))
        .args(["--port", &name, "--settle-ms", "0", "--interval-ms", "10000"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to execute command");

    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut first = String::new();
    stdout.read_line(&mut first).unwrap();
    assert!(
        first.starts_with("send message. serial message test. time="),
        "Stdout: {:?}",
        first
    );

    // The echo line is printed after the handler is installed.
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGINT) };
    assert_eq!(rc, 0);

    let status = child.wait().unwrap();
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();

    assert_eq!(status.code(), Some(0));
    assert!(!rest.contains("send message."), "Stdout: {:?}", rest);
}
