//! Log setup for `memo-send`.
//!
//! Logs always go to stderr. Stdout is reserved for what the user asked for
//! (the node's reply, a dry-run summary, key details), so output can be
//! piped into `jq` without filtering.
//!
//! Verbosity comes from `-v` flags unless `RUST_LOG` is set, in which case
//! the environment wins outright.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Filter directives for a `-v` count.
///
/// At zero only this client's own crates log at `info`. Each `-v` opens up
/// one more level; dependencies stay at `warn` until `-vvv`.
pub fn filter_for(verbosity: u8) -> String {
    let (ours, deps) = match verbosity {
        0 => ("info", "warn"),
        1 => ("debug", "warn"),
        2 => ("trace", "warn"),
        _ => ("trace", "debug"),
    };
    format!("{deps},memo_cli={ours},memo_protocol={ours}")
}

/// Installs the global subscriber. Targets and source locations are shown
/// from `-v` up.
pub fn init_logging(verbosity: u8, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_for(verbosity)))?;

    let pretty = (format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity > 0)
            .with_file(verbosity > 0)
            .with_line_number(verbosity > 0)
    });
    let json = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()?;

    tracing::debug!(?format, verbosity, "logging ready");
    Ok(())
}
