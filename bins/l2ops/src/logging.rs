//! Tracing subscriber setup.
//!
//! Verbosity comes from repeated `-v` flags and `RUST_LOG` overrides it. Logs
//! go to stderr so reports on stdout stay machine readable.
use clap::{ArgAction, Args, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use std::io;
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Timestamp, level, target, spans and fields.
    #[default]
    Full,
    /// Level, target and fields on a single short line.
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging flags shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct LoggingArgs {
    /// Increase logging verbosity
    ///
    /// `-v` logs INFO, `-vv` DEBUG and `-vvv` TRACE. WARN otherwise.
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
    /// Log output format
    #[arg(
        long = "log-format",
        value_enum,
        default_value_t = LogFormat::Full,
        global = true
    )]
    pub format: LogFormat,
}

impl LoggingArgs {
    /// Maximum level enabled by the verbosity flags.
    pub const fn level_filter(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Installs the global tracing subscriber.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::builder()
            .with_default_directive(self.level_filter().into())
            .from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(build_layer(self.format))
            .try_init()
            .map_err(|err| eyre!("failed to initialize tracing subscriber: {err}"))
    }
}

fn build_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    let base = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    match format {
        LogFormat::Full => Box::new(base),
        LogFormat::Compact => Box::new(base.compact()),
        LogFormat::Json => Box::new(base.json()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        logging: LoggingArgs,
    }

    #[rstest]
    #[case(&[], LevelFilter::WARN)]
    #[case(&["-v"], LevelFilter::INFO)]
    #[case(&["-vv"], LevelFilter::DEBUG)]
    #[case(&["-vvvv"], LevelFilter::TRACE)]
    fn verbosity(#[case] flags: &[&str], #[case] expected: LevelFilter) {
        let cli = Cli::parse_from(std::iter::once("l2ops").chain(flags.iter().copied()));
        assert_eq!(cli.logging.level_filter(), expected);
    }

    #[test]
    fn log_format() {
        let cli = Cli::parse_from(["l2ops", "--log-format", "json"]);
        assert_eq!(cli.logging.format, LogFormat::Json);
        assert_eq!(Cli::parse_from(["l2ops"]).logging.format, LogFormat::Full);
        assert!(Cli::try_parse_from(["l2ops", "--log-format", "pretty"]).is_err());
    }
}
