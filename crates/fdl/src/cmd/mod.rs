use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod encode;
pub mod read;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one telegram given as hex.
    Decode(DecodeArgs),
    /// Build a telegram and print its wire bytes.
    Encode(EncodeArgs),
    /// Read a binary telegram stream and print each telegram.
    Read(ReadArgs),
    /// Compute the mod-256 frame check sequence of hex bytes.
    Checksum(ChecksumArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Read(args) => read::run(args, format),
        Command::Checksum(args) => checksum::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Telegram bytes as hex (e.g. "10 02 03 49 4E 16").
    pub hex: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FrameKind {
    /// Single-character acknowledgement (SC, 0xE5).
    #[value(alias = "sc")]
    Ack,
    /// Token telegram (SD4, 0xDC).
    #[value(alias = "sd4")]
    Token,
    /// Fixed length without data unit (SD1, 0x10).
    #[value(alias = "sd1")]
    FixedNoData,
    /// Fixed length with 8 byte data unit (SD3, 0xA2).
    #[value(alias = "sd3")]
    FixedData,
    /// Variable length (SD2, 0x68).
    #[value(alias = "sd2")]
    VariableData,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Telegram shape.
    #[arg(long, short = 'k')]
    pub kind: FrameKind,
    /// Destination address byte (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    pub da: Option<u8>,
    /// Source address byte (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    pub sa: Option<u8>,
    /// Frame-control byte (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    pub fc: Option<u8>,
    /// Data unit as hex.
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Read from this file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Skip bytes that cannot start a telegram instead of stopping.
    #[arg(long)]
    pub resync: bool,
    /// Exit after N telegrams.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Bytes as hex.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse hex bytes, tolerating whitespace, `:`/`,`/`-` separators and `0x` prefixes.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input
        .split(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | '-'))
        .map(|part| {
            part.strip_prefix("0x")
                .or_else(|| part.strip_prefix("0X"))
                .unwrap_or(part)
        })
        .collect();
    hex::decode(&cleaned).map_err(|err| CliError::usage(format!("invalid hex input: {err}")))
}

/// Parse a single byte as decimal or `0x`-prefixed hex.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|err| format!("invalid byte value {input:?}: {err}"))
}
