use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::time::Duration;

/// Policy applied when a poll cycle fails.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum OnError {
    /// Print a diagnostic and terminate (reference behavior).
    Fail,
    /// Log a warning and continue with the next cycle.
    Skip,
}

const fn about_text() -> &'static str {
    "Poll an RS-485 temperature/humidity sensor and print decoded readings."
}

#[derive(Parser, Debug)]
#[command(name = "thpoll", author, version, about = about_text(), long_about = None)]
pub struct CliArgs {
    /// Configure verbosity of logging output.
    /// -v for info, -vv for debug, -vvv for trace. Default is off.
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Serial device, e.g. "ttyUSB0" or "ttyO2".
    /// Names are resolved under /dev; absolute paths are used as-is.
    #[arg(verbatim_doc_comment)]
    pub port: String,

    /// Baud rate for serial communication.
    /// Supported values: 2400, 4800, 9600, 115200, 460800, 921600.
    /// Unsupported values fall back to 9600 with a warning.
    #[arg(verbatim_doc_comment)]
    pub baud_rate: u32,

    /// Poll interval between cycles, in milliseconds.
    pub poll_interval_ms: u64,

    /// Delay between sending the request and reading the response.
    /// Examples: "100ms", "250ms".
    #[arg(long, default_value = "100ms", value_parser = humantime::parse_duration, verbatim_doc_comment)]
    pub response_delay: Duration,

    /// What to do when a poll cycle fails (short write/read, CRC mismatch).
    #[arg(long, value_enum, default_value_t = OnError::Fail)]
    pub on_error: OnError,

    /// Dump the raw bytes sent and received each cycle as hex instead of
    /// decoding readings. No length or CRC validation is applied; short
    /// and empty responses are printed as-is. Useful for bus diagnosis.
    #[arg(long, verbatim_doc_comment)]
    pub raw: bool,
}

/// Parses the command line, exiting on failure.
///
/// Missing or surplus positional arguments print the usage text and
/// exit 0, matching the historical tools; other parse failures keep
/// clap's non-zero exit code.
pub fn parse_args() -> CliArgs {
    CliArgs::try_parse().unwrap_or_else(|err| {
        err.print().expect("Cannot print usage");
        std::process::exit(usage_exit_code(&err));
    })
}

fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::UnknownArgument => 0,
        _ => err.exit_code(),
    }
}

impl CliArgs {
    /// Full device path, mirroring the `/dev/%s` convention.
    pub fn device_path(&self) -> String {
        if self.port.starts_with('/') {
            self.port.clone()
        } else {
            format!("/dev/{}", self.port)
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
