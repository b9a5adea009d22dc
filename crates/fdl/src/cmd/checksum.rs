use crate::cmd::{parse_hex, ChecksumArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_checksum, OutputFormat};

pub fn run(args: ChecksumArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    print_checksum(&bytes, fdl_telegram::checksum(&bytes), format);
    Ok(SUCCESS)
}
