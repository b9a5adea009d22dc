use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fdl_telegram::control::{address_value, has_sap};
use fdl_telegram::{delimiter_name, encode, Frame, FrameControl, TelegramError};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct AddressOutput {
    raw: u8,
    address: u8,
    sap: bool,
}

impl AddressOutput {
    fn new(raw: u8) -> Self {
        Self {
            raw,
            address: address_value(raw),
            sap: has_sap(raw),
        }
    }
}

#[derive(Serialize)]
struct ControlOutput {
    raw: u8,
    request: bool,
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fcb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fcv: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    station_status: Option<u8>,
}

impl ControlOutput {
    fn new(raw: u8) -> Self {
        let fc = FrameControl(raw);
        Self {
            raw,
            request: fc.is_request(),
            name: fc.name(),
            fcb: fc.is_request().then_some(fc.fcb()),
            fcv: fc.is_request().then_some(fc.fcv()),
            station_status: fc.station_status(),
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    kind: &'static str,
    start_delimiter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<AddressOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<AddressOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    control: Option<ControlOutput>,
    data_unit: String,
    size: usize,
    wire: String,
}

impl FrameOutput {
    fn new(frame: &Frame) -> Self {
        let wire = encode(frame);
        Self {
            kind: frame.kind_name(),
            start_delimiter: format!("0x{:02X}", frame.start_delimiter()),
            destination: frame.destination().map(AddressOutput::new),
            source: frame.source().map(AddressOutput::new),
            control: frame.control().map(ControlOutput::new),
            data_unit: hex::encode(frame.data_unit()),
            size: wire.len(),
            wire: hex::encode(&wire),
        }
    }
}

#[derive(Serialize)]
struct ErrorOutput<'a> {
    error: &'a str,
    message: String,
}

#[derive(Serialize)]
struct ChecksumOutput {
    checksum: String,
    value: u8,
    len: usize,
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput::new(frame);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let out = FrameOutput::new(frame);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SD", "DA", "SA", "FC", "DU", "SIZE"])
                .add_row(vec![
                    delimiter_name(frame.start_delimiter()).to_string(),
                    opt_byte(frame.destination()),
                    opt_byte(frame.source()),
                    out.control
                        .as_ref()
                        .map(|fc| format!("0x{:02X} {}", fc.raw, fc.name))
                        .unwrap_or_else(|| "-".to_string()),
                    data_preview(frame.data_unit()),
                    out.size.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} ({}) da={} sa={} fc={} du=[{}]",
                frame.kind_name(),
                delimiter_name(frame.start_delimiter()),
                opt_byte(frame.destination()),
                opt_byte(frame.source()),
                opt_byte(frame.control()),
                data_preview(frame.data_unit())
            );
        }
        OutputFormat::Raw => {
            print_raw(&encode(frame));
        }
    }
}

pub fn print_wire(wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "wire": hex::encode(wire), "size": wire.len() });
            println!("{out}");
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", spaced_hex(wire)),
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_checksum(data: &[u8], value: u8, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ChecksumOutput {
                checksum: format!("0x{value:02X}"),
                value,
                len: data.len(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Raw => print_raw(&[value]),
        OutputFormat::Table | OutputFormat::Pretty => println!("0x{value:02X}"),
    }
}

/// Counts from one `read` pass over a stream.
#[derive(Debug, Serialize)]
pub struct ReadSummary {
    pub telegrams: usize,
    pub invalid: usize,
}

pub fn print_summary(summary: &ReadSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "summary": summary });
            println!("{out}");
        }
        OutputFormat::Table | OutputFormat::Pretty => println!(
            "{} telegrams, {} invalid",
            summary.telegrams, summary.invalid
        ),
        OutputFormat::Raw => {}
    }
}

/// Report a telegram that failed validation without ending the output stream.
pub fn print_invalid(err: &TelegramError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ErrorOutput {
                error: err.kind(),
                message: err.to_string(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("invalid telegram: {err}"),
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn opt_byte(byte: Option<u8>) -> String {
    byte.map(|b| format!("0x{b:02X}"))
        .unwrap_or_else(|| "-".to_string())
}

fn data_preview(data: &[u8]) -> String {
    const PREVIEW_BYTES: usize = 16;
    if data.len() <= PREVIEW_BYTES {
        spaced_hex(data)
    } else {
        format!(
            "{} .. ({} bytes)",
            spaced_hex(&data[..PREVIEW_BYTES]),
            data.len()
        )
    }
}

fn spaced_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
