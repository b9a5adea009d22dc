use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{telegram_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    tracing::debug!(len = bytes.len(), "decoding telegram");
    let frame =
        fdl_telegram::decode(&bytes).map_err(|err| telegram_error("decode failed", err))?;
    print_frame(&frame, format);
    Ok(SUCCESS)
}
