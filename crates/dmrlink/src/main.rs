mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "dmrlink", version, about = "DMR Home Brew repeater link")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connect_subcommand() {
        let cli = Cli::try_parse_from([
            "dmrlink",
            "connect",
            "--master",
            "127.0.0.1:62031",
            "--id",
            "204342",
            "--count",
            "5",
        ])
        .expect("connect args should parse");

        let Command::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        assert_eq!(args.id, 204_342);
        assert_eq!(args.count, Some(5));
        assert_eq!(args.keepalive, "60s");
    }

    #[test]
    fn rejects_codeword_with_encode() {
        let err = Cli::try_parse_from(["dmrlink", "emb", "0x11E2", "--encode"])
            .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn emb_requires_codeword_or_encode() {
        let err = Cli::try_parse_from(["dmrlink", "emb"]).expect_err("codeword is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_out_of_range_color_code() {
        let err = Cli::try_parse_from([
            "dmrlink",
            "emb",
            "--encode",
            "--color-code",
            "16",
            "--lcss",
            "single",
        ])
        .expect_err("color code above 15 should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["dmrlink", "decode", "444d5244", "--format", "json"])
            .expect("decode args should parse");
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Command::Decode(_)));
    }
}
