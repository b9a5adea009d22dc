use std::fs::File;
use std::io::Read;

use fdl_telegram::{TelegramConfig, TelegramError, TelegramReader};

use crate::cmd::ReadArgs;
use crate::exit::{io_error, telegram_error, CliResult, SUCCESS};
use crate::output::{print_frame, print_invalid, print_summary, OutputFormat, ReadSummary};

pub fn run(args: ReadArgs, format: OutputFormat) -> CliResult<i32> {
    let source: Box<dyn Read> = match &args.file {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(std::io::stdin().lock()),
    };
    let config = TelegramConfig {
        resync_on_garbage: args.resync,
    };
    let summary = read_stream(TelegramReader::with_config(source, config), args.count, format)?;
    print_summary(&summary, format);
    Ok(SUCCESS)
}

fn read_stream<R: Read>(
    mut reader: TelegramReader<R>,
    count: Option<usize>,
    format: OutputFormat,
) -> CliResult<ReadSummary> {
    let mut printed = 0usize;
    let mut invalid = 0usize;

    loop {
        if count.is_some_and(|count| printed >= count) {
            break;
        }
        match reader.read_frame() {
            Ok(frame) => {
                print_frame(&frame, format);
                printed = printed.saturating_add(1);
            }
            Err(TelegramError::ConnectionClosed) => {
                if !reader.pending().is_empty() {
                    tracing::warn!(
                        pending = reader.pending().len(),
                        "stream ended inside a telegram"
                    );
                }
                break;
            }
            Err(err) if err.is_framing_loss() => {
                return Err(telegram_error("lost telegram framing (try --resync)", err));
            }
            Err(err) if err.is_validation() => {
                tracing::warn!(error = %err, kind = err.kind(), "invalid telegram");
                print_invalid(&err, format);
                invalid = invalid.saturating_add(1);
            }
            Err(err) => return Err(telegram_error("read failed", err)),
        }
    }

    tracing::info!(telegrams = printed, invalid, "stream done");
    Ok(ReadSummary {
        telegrams: printed,
        invalid,
    })
}
