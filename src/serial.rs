//! Serial channel configuration.
//!
//! One configuration path shared by every entry point: an explicit
//! [`SerialOptions`] struct applied to a blocking port handle. The
//! default matches the sensor's electrical contract: 8 data bits, no
//! parity, one stop bit, and a zero read timeout so a read returns
//! immediately with whatever bytes the driver has buffered (the
//! VMIN=0/VTIME=0 poll-style contract the cycle logic relies on).

use crate::error::Error;
use crate::protocol::BaudRate;
use std::time::Duration;

/// Serial line parameters for the sensor link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerialOptions {
    pub baud_rate: BaudRate,
    pub data_bits: tokio_serial::DataBits,
    pub parity: tokio_serial::Parity,
    pub stop_bits: tokio_serial::StopBits,
    /// Read timeout; zero means return immediately with available bytes.
    pub timeout: Duration,
}

impl Default for SerialOptions {
    fn default() -> Self {
        Self {
            baud_rate: BaudRate::default(),
            data_bits: tokio_serial::DataBits::Eight,
            parity: tokio_serial::Parity::None,
            stop_bits: tokio_serial::StopBits::One,
            timeout: Duration::ZERO,
        }
    }
}

impl SerialOptions {
    /// 8N1 at the given rate with a zero read timeout.
    pub fn with_baud_rate(baud_rate: BaudRate) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// Opens and configures the serial device at `path`.
///
/// Open failures map to [`Error::ChannelOpen`], post-open attribute
/// failures to [`Error::ChannelConfig`].
pub fn open(path: &str, options: &SerialOptions) -> Result<Box<dyn tokio_serial::SerialPort>, Error> {
    let mut port = tokio_serial::new(path, options.baud_rate as u32)
        .data_bits(options.data_bits)
        .parity(options.parity)
        .stop_bits(options.stop_bits)
        .flow_control(tokio_serial::FlowControl::None)
        .open()
        .map_err(|source| Error::ChannelOpen {
            path: path.to_owned(),
            source,
        })?;

    port.set_timeout(options.timeout)
        .map_err(|source| Error::ChannelConfig {
            path: path.to_owned(),
            source,
        })?;

    Ok(port)
}
