use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Crates whose events follow `--log-level` / `FDL_LOG_LEVEL`.
const FDL_TARGETS: [&str; 2] = ["fdl_telegram", "fdl"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Codec and CLI events at `level`; anything else never below warn.
pub fn log_targets(level: LogLevel) -> Targets {
    let level = level.as_filter();
    FDL_TARGETS
        .iter()
        .fold(Targets::new(), |targets, target| {
            targets.with_target(*target, level)
        })
        .with_default(level.min(LevelFilter::WARN))
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = log_targets(level);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(filter))
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn level_governs_codec_events() {
        let targets = log_targets(LogLevel::Debug);
        assert!(targets.would_enable("fdl_telegram::reader", &Level::DEBUG));
        assert!(!targets.would_enable("fdl_telegram::reader", &Level::TRACE));
        assert!(targets.would_enable("fdl::cmd::read", &Level::INFO));
    }

    #[test]
    fn other_crates_stay_at_warn() {
        let targets = log_targets(LogLevel::Trace);
        assert!(!targets.would_enable("mio::poll", &Level::DEBUG));
        assert!(targets.would_enable("mio::poll", &Level::WARN));

        let quiet = log_targets(LogLevel::Error);
        assert!(!quiet.would_enable("mio::poll", &Level::WARN));
        assert!(!quiet.would_enable("fdl_telegram::reader", &Level::WARN));
    }
}
