//! RS-485 temperature/humidity sensor poller CLI
//!
//! Sends the sensor's fixed read-registers request at a configurable
//! interval, validates each 9-byte response against its CRC16, and
//! prints one decoded reading per cycle:
//!
//! ```text
//! 1: humidity 50.0%RH, temperature 20.0C
//! ```
//!
//! The CLI leverages the `th_sensor_lib` crate for the wire format and
//! the poll-cycle driver.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};
use log::*;
use std::fmt::Write as _;
use std::{panic, thread};
use th_sensor_lib::{client::Poller, error::Error, protocol as proto, serial};

mod commandline;

fn logging_init(loglevel: LevelFilter) -> LoggerHandle {
    let log_handle = Logger::try_with_env_or_str(loglevel.as_str())
        .expect("Cannot init logging")
        .start()
        .expect("Cannot start logging");

    panic::set_hook(Box::new(|panic_info| {
        let (filename, line, column) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line(), loc.column()))
            .unwrap_or(("<unknown_file>", 0, 0));

        let cause_str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "<unknown_panic_cause>"
        };

        error!(
            target: "panic",
            "Thread '{}' panicked at '{}': {}:{} - Cause: {}",
            std::thread::current().name().unwrap_or("<unnamed>"),
            filename,
            line,
            column,
            cause_str
        );
    }));
    log_handle
}

/// Renders bytes the way the historical raw tool did: `0x01 0x03 ...`.
fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write!(out, "{byte:#04x}").expect("write to String cannot fail");
    }
    out
}

fn main() -> Result<()> {
    let args = commandline::parse_args();

    let _log_handle = logging_init(args.verbose.log_level_filter());

    let baud_rate = proto::BaudRate::from_u32(args.baud_rate).unwrap_or_else(|| {
        let fallback = proto::BaudRate::default();
        warn!(
            "Unsupported baud rate {}, falling back to {fallback}",
            args.baud_rate
        );
        fallback
    });

    let path = args.device_path();
    info!("Opening {path} ({baud_rate} baud, 8N1)...");
    let port = serial::open(&path, &serial::SerialOptions::with_baud_rate(baud_rate))
        .with_context(|| format!("Cannot open serial device {path}"))?;

    let mut poller = Poller::new(port).with_response_delay(args.response_delay);
    let poll_interval = args.poll_interval();
    info!(
        "Polling every {poll_interval:?} (response delay {:?}, on-error: {:?}, raw: {})",
        args.response_delay, args.on_error, args.raw
    );

    loop {
        let outcome: Result<(), Error> = if args.raw {
            poller.exchange_raw().map(|exchange| {
                if !exchange.sent.is_empty() {
                    println!("send data: {}", format_hex(&exchange.sent));
                }
                if !exchange.received.is_empty() {
                    println!("recv data: {}", format_hex(&exchange.received));
                }
            })
        } else {
            poller
                .poll_once()
                .map(|reading| println!("{}: {reading}", reading.sequence))
        };

        if let Err(err) = outcome {
            match args.on_error {
                commandline::OnError::Fail => {
                    return Err(err).with_context(|| format!("Poll cycle failed on {path}"));
                }
                commandline::OnError::Skip => warn!("Poll cycle failed, skipping: {err}"),
            }
        }
        thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hex_matches_raw_dump_style() {
        assert_eq!(
            format_hex(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x02, 0xC4, 0x0B]),
            "0x01 0x03 0x00 0x00 0x00 0x02 0xc4 0x0b"
        );
        assert_eq!(format_hex(&[]), "");
    }
}
