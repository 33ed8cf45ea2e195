//! Synchronous poll-cycle driver.
//!
//! [`Poller`] owns the channel exclusively and runs one request/response
//! cycle per [`Poller::poll_once`] call. The channel only needs to be a
//! byte-oriented duplex stream (`Read + Write`) configured for
//! poll-style reads that return immediately with whatever bytes are
//! available; tests substitute an in-memory mock for the serial port.

use crate::error::Error;
use crate::protocol as proto;
use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

/// Default delay between sending the request and reading the response.
///
/// The 9-byte answer takes about 20 ms on the wire at 4800 baud; 100 ms
/// leaves headroom for the transceiver to turn the bus around.
pub const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_millis(100);

/// Bytes exchanged by one raw (unvalidated) cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExchange {
    /// Request bytes the channel accepted.
    pub sent: Vec<u8>,
    /// Response bytes available after the response delay.
    pub received: Vec<u8>,
}

/// Drives poll cycles against a sensor reachable through `channel`.
pub struct Poller<C> {
    channel: C,
    response_delay: Duration,
    sequence: u32,
}

impl<C: Read + Write> Poller<C> {
    /// Creates a poller with the default response delay.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            response_delay: DEFAULT_RESPONSE_DELAY,
            sequence: 0,
        }
    }

    /// Overrides the delay between request and response.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    /// Runs one send/delay/receive/validate/decode cycle.
    ///
    /// A short write fails the cycle before any read is attempted; a
    /// short read fails it before CRC validation. No partial frame is
    /// carried over to the next cycle. The sequence counter advances
    /// only on success.
    pub fn poll_once(&mut self) -> Result<proto::Reading, Error> {
        let written = self.channel.write(&proto::REQUEST_FRAME)?;
        if written != proto::REQUEST_LEN {
            return Err(Error::WriteShort {
                written,
                expected: proto::REQUEST_LEN,
            });
        }
        self.channel.flush()?;

        thread::sleep(self.response_delay);

        let mut frame = [0u8; proto::RESPONSE_LEN];
        let read = self.channel.read(&mut frame)?;
        if read != proto::RESPONSE_LEN {
            return Err(Error::ReadShort {
                read,
                expected: proto::RESPONSE_LEN,
            });
        }

        let (humidity, temperature) = proto::decode_response(&frame)?;
        self.sequence += 1;
        Ok(proto::Reading {
            sequence: self.sequence,
            humidity,
            temperature,
        })
    }

    /// Runs one cycle without length or CRC validation.
    ///
    /// Writes the request, waits the response delay, and reports
    /// whatever bytes went out and came back. Short writes and short or
    /// empty reads are returned as-is rather than failing the cycle;
    /// only channel I/O errors abort. Used by the raw dump mode for
    /// bus-level diagnosis. Does not advance the sequence counter.
    pub fn exchange_raw(&mut self) -> Result<RawExchange, Error> {
        let written = self.channel.write(&proto::REQUEST_FRAME)?;
        self.channel.flush()?;

        thread::sleep(self.response_delay);

        let mut frame = [0u8; proto::RESPONSE_LEN];
        let read = self.channel.read(&mut frame)?;
        Ok(RawExchange {
            sent: proto::REQUEST_FRAME[..written].to_vec(),
            received: frame[..read].to_vec(),
        })
    }

    /// Number of successful cycles so far.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Consumes the poller and returns the channel.
    pub fn into_inner(self) -> C {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Scriptable duplex channel standing in for the serial port.
    struct MockChannel {
        /// Bytes handed out by the next read.
        response: Vec<u8>,
        /// Write return value override; `None` accepts everything.
        accept: Option<usize>,
        written: Vec<u8>,
        reads: usize,
    }

    impl MockChannel {
        fn replying(response: &[u8]) -> Self {
            Self {
                response: response.to_vec(),
                accept: None,
                written: Vec::new(),
                reads: 0,
            }
        }
    }

    impl Read for MockChannel {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.reads += 1;
            let n = self.response.len().min(buf.len());
            buf[..n].copy_from_slice(&self.response[..n]);
            Ok(n)
        }
    }

    impl Write for MockChannel {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = self.accept.unwrap_or(buf.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn poller(channel: MockChannel) -> Poller<MockChannel> {
        Poller::new(channel).with_response_delay(Duration::ZERO)
    }

    #[test]
    fn successful_cycle_decodes_and_counts() {
        let frame = proto::encode_response(500, 200);
        let mut poller = poller(MockChannel::replying(&frame));

        let reading = poller.poll_once().unwrap();
        assert_eq!(reading.sequence, 1);
        assert_eq!(reading.humidity, 50.0);
        assert_eq!(reading.temperature, 20.0);

        let reading = poller.poll_once().unwrap();
        assert_eq!(reading.sequence, 2);

        let channel = poller.into_inner();
        assert_eq!(channel.written.len(), 2 * proto::REQUEST_LEN);
        assert_eq!(channel.written[..8], proto::REQUEST_FRAME);
    }

    #[test]
    fn short_write_fails_without_reading() {
        let frame = proto::encode_response(500, 200);
        let mut channel = MockChannel::replying(&frame);
        channel.accept = Some(5);
        let mut poller = poller(channel);

        assert_matches!(
            poller.poll_once(),
            Err(Error::WriteShort {
                written: 5,
                expected: 8
            })
        );
        assert_eq!(poller.sequence(), 0);
        assert_eq!(poller.into_inner().reads, 0);
    }

    #[test]
    fn short_read_fails_before_validation() {
        // Only 4 of 9 response bytes available.
        let frame = proto::encode_response(500, 200);
        let mut poller = poller(MockChannel::replying(&frame[..4]));

        assert_matches!(
            poller.poll_once(),
            Err(Error::ReadShort {
                read: 4,
                expected: 9
            })
        );
        assert_eq!(poller.sequence(), 0);
    }

    #[test]
    fn empty_read_fails() {
        let mut poller = poller(MockChannel::replying(&[]));
        assert_matches!(poller.poll_once(), Err(Error::ReadShort { read: 0, .. }));
    }

    #[test]
    fn corrupted_response_is_rejected() {
        let mut frame = proto::encode_response(500, 200);
        frame[3] ^= 0x01;
        let mut poller = poller(MockChannel::replying(&frame));

        assert_matches!(poller.poll_once(), Err(Error::CrcMismatch { .. }));
        assert_eq!(poller.sequence(), 0);
    }

    #[test]
    fn raw_exchange_skips_validation() {
        let mut frame = proto::encode_response(500, 200);
        // Corrupt a register byte; raw mode must still hand the frame over.
        frame[3] ^= 0x01;
        let mut poller = poller(MockChannel::replying(&frame));

        let exchange = poller.exchange_raw().unwrap();
        assert_eq!(exchange.sent, proto::REQUEST_FRAME);
        assert_eq!(exchange.received, frame);
        assert_eq!(poller.sequence(), 0);
    }

    #[test]
    fn raw_exchange_tolerates_short_reads_and_writes() {
        let mut channel = MockChannel::replying(&[0x01, 0x03]);
        channel.accept = Some(5);
        let mut poller = poller(channel);

        let exchange = poller.exchange_raw().unwrap();
        assert_eq!(exchange.sent, proto::REQUEST_FRAME[..5]);
        assert_eq!(exchange.received, [0x01, 0x03]);
    }

    #[test]
    fn raw_exchange_with_silent_bus_is_empty() {
        let mut poller = poller(MockChannel::replying(&[]));
        let exchange = poller.exchange_raw().unwrap();
        assert_eq!(exchange.sent, proto::REQUEST_FRAME);
        assert!(exchange.received.is_empty());
    }

    #[test]
    fn negative_reading_survives_the_cycle() {
        let frame = proto::encode_response(412, -33);
        let mut poller = poller(MockChannel::replying(&frame));
        let reading = poller.poll_once().unwrap();
        assert_eq!(reading.humidity, 41.2);
        assert_eq!(reading.temperature, -3.3);
        assert_eq!(reading.to_string(), "humidity 41.2%RH, temperature -3.3C");
    }
}
