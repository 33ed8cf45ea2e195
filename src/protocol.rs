//! Wire format of the RS-485 temperature/humidity sensor.
//!
//! The sensor speaks a Modbus-RTU-style fixed-frame protocol: one
//! constant 8-byte read request, one 9-byte response carrying two
//! big-endian signed fixed-point registers (×10) and a trailing CRC16
//! transmitted low byte first. This module owns the byte layout; the
//! actual channel I/O lives in [`crate::client`].

use crate::crc::crc16;
use crate::error::Error;

/// The sensor's fixed RS-485 bus address.
pub const SENSOR_ADDRESS: u8 = 0x01;
/// Modbus "read holding registers" function code.
pub const FUNCTION_READ_REGISTERS: u8 = 0x03;
/// First register of the humidity/temperature pair.
pub const REGISTER_START: u16 = 0x0000;
/// Number of registers read per cycle.
pub const REGISTER_COUNT: u16 = 0x0002;

/// Length of the request frame in bytes.
pub const REQUEST_LEN: usize = 8;
/// Length of the response frame in bytes.
pub const RESPONSE_LEN: usize = 9;
/// Expected value of the response byte-count field (two registers).
pub const RESPONSE_PAYLOAD_LEN: u8 = 4;

// Response layout: addr | func | count | humidity BE | temperature BE | CRC LE
const HUMIDITY_OFFSET: usize = 3;
const TEMPERATURE_OFFSET: usize = 5;
const RESPONSE_CRC_OFFSET: usize = 7;

/// The constant request frame sent every poll cycle, CRC included.
pub const REQUEST_FRAME: [u8; REQUEST_LEN] = [0x01, 0x03, 0x00, 0x00, 0x00, 0x02, 0xC4, 0x0B];

/// Builds a read-registers request frame with its CRC appended.
///
/// [`REQUEST_FRAME`] is this function evaluated at the sensor's fixed
/// parameters; it exists so the constant is verifiable and so bench
/// tools can address other units on the bus.
pub fn build_request(address: u8, start: u16, count: u16) -> [u8; REQUEST_LEN] {
    let mut frame = [0u8; REQUEST_LEN];
    frame[0] = address;
    frame[1] = FUNCTION_READ_REGISTERS;
    frame[2..4].copy_from_slice(&start.to_be_bytes());
    frame[4..6].copy_from_slice(&count.to_be_bytes());
    let crc = crc16(&frame[..6]);
    frame[6..8].copy_from_slice(&crc.to_le_bytes());
    frame
}

/// Validates a response frame and decodes its two registers.
///
/// The CRC16 over the first 7 bytes must equal the trailing field
/// (transmitted low byte first); on mismatch the frame is rejected with
/// [`Error::CrcMismatch`] and nothing is decoded. Both registers are
/// big-endian signed fixed-point values scaled by 10.
///
/// Returns `(humidity, temperature)` as `%RH` and `°C` with one decimal
/// place of resolution.
pub fn decode_response(frame: &[u8; RESPONSE_LEN]) -> Result<(f32, f32), Error> {
    let computed = crc16(&frame[..RESPONSE_CRC_OFFSET]);
    let received = u16::from_le_bytes([frame[RESPONSE_CRC_OFFSET], frame[RESPONSE_CRC_OFFSET + 1]]);
    if computed != received {
        return Err(Error::CrcMismatch { computed, received });
    }
    let humidity = i16::from_be_bytes([frame[HUMIDITY_OFFSET], frame[HUMIDITY_OFFSET + 1]]);
    let temperature = i16::from_be_bytes([frame[TEMPERATURE_OFFSET], frame[TEMPERATURE_OFFSET + 1]]);
    Ok((f32::from(humidity) / 10.0, f32::from(temperature) / 10.0))
}

/// Encodes a response frame from raw register values, CRC included.
///
/// Test-side counterpart of [`decode_response`].
#[cfg(test)]
pub(crate) fn encode_response(humidity_raw: i16, temperature_raw: i16) -> [u8; RESPONSE_LEN] {
    let mut frame = [0u8; RESPONSE_LEN];
    frame[0] = SENSOR_ADDRESS;
    frame[1] = FUNCTION_READ_REGISTERS;
    frame[2] = RESPONSE_PAYLOAD_LEN;
    frame[HUMIDITY_OFFSET..HUMIDITY_OFFSET + 2].copy_from_slice(&humidity_raw.to_be_bytes());
    frame[TEMPERATURE_OFFSET..TEMPERATURE_OFFSET + 2]
        .copy_from_slice(&temperature_raw.to_be_bytes());
    let crc = crc16(&frame[..RESPONSE_CRC_OFFSET]);
    frame[RESPONSE_CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());
    frame
}

/// One decoded humidity/temperature pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Monotonically incrementing counter of successful cycles, display only.
    pub sequence: u32,
    /// Relative humidity in %RH, one decimal place.
    pub humidity: f32,
    /// Temperature in °C, one decimal place.
    pub temperature: f32,
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "humidity {:.1}%RH, temperature {:.1}C",
            self.humidity, self.temperature
        )
    }
}

/// Baud rates the sensor's serial side supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum BaudRate {
    B2400 = 2400,
    B4800 = 4800,
    #[default]
    B9600 = 9600,
    B115200 = 115_200,
    B460800 = 460_800,
    B921600 = 921_600,
}

impl BaudRate {
    /// Returns the matching rate, or `None` if `value` is unsupported.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            2400 => Some(BaudRate::B2400),
            4800 => Some(BaudRate::B4800),
            9600 => Some(BaudRate::B9600),
            115_200 => Some(BaudRate::B115200),
            460_800 => Some(BaudRate::B460800),
            921_600 => Some(BaudRate::B921600),
            _ => None,
        }
    }
}

impl std::fmt::Display for BaudRate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", *self as u32)
    }
}
