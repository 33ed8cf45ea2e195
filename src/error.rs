//! Error taxonomy for sensor communication.
//!
//! Every variant is fatal under the default fail-fast policy of the
//! polling binary; callers embedding [`crate::client::Poller`] may treat
//! them as per-cycle failures instead.

/// Represents all possible errors that can occur while talking to the sensor.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The serial device could not be opened.
    #[cfg(feature = "serial")]
    #[error("cannot open serial device {path}: {source}")]
    ChannelOpen {
        path: String,
        source: tokio_serial::Error,
    },

    /// The serial device was opened but an attribute could not be applied.
    #[cfg(feature = "serial")]
    #[error("cannot configure serial device {path}: {source}")]
    ChannelConfig {
        path: String,
        source: tokio_serial::Error,
    },

    /// The channel accepted fewer bytes than the full request frame.
    #[error("short write: channel accepted {written} of {expected} request bytes")]
    WriteShort { written: usize, expected: usize },

    /// Fewer bytes than a full response frame were available.
    #[error("short read: {read} of {expected} response bytes available")]
    ReadShort { read: usize, expected: usize },

    /// The response frame's trailing CRC did not match the computed one.
    #[error("CRC mismatch: computed {computed:#06x}, frame carries {received:#06x}")]
    CrcMismatch { computed: u16, received: u16 },

    /// An I/O error reported by the channel itself.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
