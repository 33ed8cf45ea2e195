//! Protocol and polling support for an RS-485 temperature/humidity sensor.
//!
//! The sensor answers a single fixed Modbus-RTU-style request with a
//! 9-byte frame carrying humidity and temperature as signed fixed-point
//! registers (×10), protected by a Modbus CRC16. This crate provides:
//!
//! - [`crc`]: the table-free CRC16/CRC5 checksum pair.
//! - [`protocol`]: the bit-exact wire format: request construction,
//!   response validation and decoding, [`protocol::Reading`].
//! - [`client`]: a synchronous [`client::Poller`] that drives one
//!   send/delay/receive/validate/decode cycle over any `Read + Write`
//!   channel.
//! - [`serial`] (feature `serial`): opening and configuring the real
//!   serial port.
//!
//! ## Quick start
//!
//! ```no_run
//! use th_sensor_lib::{client::Poller, protocol::BaudRate, serial};
//!
//! fn main() -> Result<(), th_sensor_lib::error::Error> {
//!     let port = serial::open(
//!         "/dev/ttyUSB0",
//!         &serial::SerialOptions::with_baud_rate(BaudRate::B4800),
//!     )?;
//!     let mut poller = Poller::new(port);
//!     let reading = poller.poll_once()?;
//!     println!("{reading}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod crc;
pub mod error;
pub mod protocol;

#[cfg_attr(docsrs, doc(cfg(feature = "serial")))]
#[cfg(feature = "serial")]
pub mod serial;
