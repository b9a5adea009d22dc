mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "fdl", version, about = "PROFIBUS FDL telegram tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "FDL_LOG_LEVEL",
        global = true
    )]
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
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["fdl", "decode", "10 02 03 49 4E 16"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn parses_encode_with_sd_alias() {
        let cli = Cli::try_parse_from([
            "fdl", "encode", "--kind", "sd2", "--da", "0x01", "--sa", "2", "--fc", "0x40",
            "--data", "aabb",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.kind, cmd::FrameKind::VariableData);
                assert_eq!(args.da, Some(1));
                assert_eq!(args.fc, Some(0x40));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_address() {
        let err = Cli::try_parse_from(["fdl", "encode", "--kind", "token", "--da", "300"])
            .expect_err("300 does not fit a byte");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_read_subcommand() {
        let cli = Cli::try_parse_from(["fdl", "read", "--resync", "--count", "3"])
            .expect("read args should parse");
        assert!(matches!(cli.command, Command::Read(_)));
    }
}
