use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use dmrlink_dmr::Lcss;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod connect;
pub mod decode;
pub mod emb;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in to a master and print the frames it relays.
    Connect(ConnectArgs),
    /// Decode a hex-encoded DMRD frame.
    Decode(DecodeArgs),
    /// Decode or encode an embedded signalling (EMB) codeword.
    Emb(EmbArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Connect(args) => connect::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Emb(args) => emb::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Master address (host:port).
    #[arg(long, env = "DMRLINK_MASTER")]
    pub master: String,
    /// Local repeater ID.
    #[arg(long, env = "DMRLINK_ID")]
    pub id: u32,
    /// Shared secret. Prefix with 0x for a hex key.
    #[arg(long, env = "DMRLINK_AUTH_KEY", default_value = "", hide_env_values = true)]
    pub auth_key: String,
    /// Local bind address.
    #[arg(long, env = "DMRLINK_LOCAL", default_value = "0.0.0.0:62030")]
    pub local: String,
    /// Repeater callsign reported to the master.
    #[arg(long, env = "DMRLINK_CALLSIGN", default_value = "")]
    pub callsign: String,
    /// Receive frequency in Hz.
    #[arg(long, default_value = "0")]
    pub rx_freq: u32,
    /// Transmit frequency in Hz.
    #[arg(long, default_value = "0")]
    pub tx_freq: u32,
    /// Transmit power in dBm.
    #[arg(long, default_value = "1")]
    pub tx_power: u8,
    /// Color code (1-15).
    #[arg(long, default_value = "1")]
    pub color_code: u8,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub latitude: f64,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub longitude: f64,
    /// Antenna height in meters.
    #[arg(long, default_value = "0")]
    pub height: u16,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub url: String,
    /// Keepalive interval (e.g. 60s, 500ms).
    #[arg(long, default_value = "60s")]
    pub keepalive: String,
    /// Give up if not logged in within this time (e.g. 30s).
    #[arg(long, default_value = "30s")]
    pub login_timeout: String,
    /// End the session after this many unanswered pings.
    #[arg(long)]
    pub max_outstanding_pings: Option<u32>,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// 53-byte frame as hex (whitespace ignored). Reads stdin when omitted.
    pub hex: Option<String>,
}

#[derive(Args, Debug)]
pub struct EmbArgs {
    /// 16-bit codeword as hex (0x11E2) or as 16 binary digits.
    #[arg(required_unless_present = "encode")]
    pub codeword: Option<String>,
    /// Encode --color-code and --lcss instead of decoding.
    #[arg(long, conflicts_with = "codeword")]
    pub encode: bool,
    /// Color code to encode (0-15).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..16))]
    pub color_code: Option<u8>,
    /// LCSS to encode.
    #[arg(long)]
    pub lcss: Option<LcssArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LcssArg {
    Single,
    First,
    Last,
    Continuation,
}

impl From<LcssArg> for Lcss {
    fn from(arg: LcssArg) -> Self {
        match arg {
            LcssArg::Single => Lcss::Single,
            LcssArg::First => Lcss::First,
            LcssArg::Last => Lcss::Last,
            LcssArg::Continuation => Lcss::Continuation,
        }
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `150ms`, `2s` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
