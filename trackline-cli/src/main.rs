//! Trackline CLI - Command-line interface
//!
//! Announces to an HTTP tracker and prints the peers it returns.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use trackline_core::TracklineError;
use trackline_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "trackline")]
#[command(about = "BitTorrent tracker peer discovery")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: CliLogLevel,

    /// Also write a full debug log into this directory
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    if let Err(e) = commands::handle_command(cli.command).await {
        tracing::debug!("Command failed: {:?}", e);
        anyhow::bail!(failure_message(&e));
    }

    Ok(())
}

fn failure_message(error: &TracklineError) -> String {
    if error.is_user_error() {
        format!("{}\nRun 'trackline --help' for usage.", error.user_message())
    } else {
        error.user_message()
    }
}

#[cfg(test)]
mod tests {
    use trackline_core::TrackerError;
    use trackline_core::torrent::TransportFailure;

    use super::*;

    #[test]
    fn test_failure_message_hints_usage_for_user_errors() {
        let error = TracklineError::Configuration {
            reason: "bad info hash".to_string(),
        };
        assert_eq!(
            failure_message(&error),
            "Invalid input: bad info hash\nRun 'trackline --help' for usage."
        );

        let error = TracklineError::from(TrackerError::Transport {
            url: "http://tracker.example.com/announce".to_string(),
            failure: TransportFailure::Connection,
        });
        assert_eq!(
            failure_message(&error),
            "Could not reach tracker: http://tracker.example.com/announce"
        );
    }
}
