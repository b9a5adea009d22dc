use fdl_telegram::{encode, Frame};

use crate::cmd::{parse_hex, EncodeArgs, FrameKind};
use crate::exit::{telegram_error, CliError, CliResult, SUCCESS};
use crate::output::{print_wire, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = build_frame(&args)?;
    print_wire(&encode(&frame), format);
    Ok(SUCCESS)
}

fn build_frame(args: &EncodeArgs) -> CliResult<Frame> {
    let data = args.data.as_deref().map(parse_hex).transpose()?;
    if data.is_some() && !matches!(args.kind, FrameKind::FixedData | FrameKind::VariableData) {
        return Err(CliError::usage(format!(
            "--data is not allowed for {:?} telegrams",
            args.kind
        )));
    }

    let frame = match args.kind {
        FrameKind::Ack => Frame::short_ack(),
        FrameKind::Token => Frame::token(required(args.da, "--da")?, required(args.sa, "--sa")?),
        FrameKind::FixedNoData => Frame::fixed_no_data(
            required(args.da, "--da")?,
            required(args.sa, "--sa")?,
            required(args.fc, "--fc")?,
        ),
        FrameKind::FixedData => Frame::fixed_data(
            required(args.da, "--da")?,
            required(args.sa, "--sa")?,
            required(args.fc, "--fc")?,
            &data.unwrap_or_default(),
        )
        .map_err(|err| telegram_error("encode failed", err))?,
        FrameKind::VariableData => Frame::variable_data(
            required(args.da, "--da")?,
            required(args.sa, "--sa")?,
            required(args.fc, "--fc")?,
            data.unwrap_or_default(),
        )
        .map_err(|err| telegram_error("encode failed", err))?,
    };
    Ok(frame)
}

fn required(value: Option<u8>, flag: &str) -> CliResult<u8> {
    value.ok_or_else(|| CliError::usage(format!("{flag} is required for this telegram kind")))
}
