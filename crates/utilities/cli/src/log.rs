//! Logging flags and tracing subscriber setup.

use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, util::SubscriberInitExt};

use crate::CliResult;

/// Logging arguments.
#[derive(Parser, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level (0-2). Directives in `RUST_LOG` take precedence.
    #[arg(long = "verbosity", short = 'v', global = true, action = ArgAction::Count)]
    pub v: u8,
}

impl LogArgs {
    /// Returns the default level for the verbosity.
    pub const fn level(&self) -> Level {
        match self.v {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Installs the global subscriber for these arguments.
    pub fn init_tracing_subscriber(&self) -> CliResult<()> {
        init_tracing_subscriber(self.v, None::<EnvFilter>)
    }
}

/// Installs a global fmt subscriber.
///
/// Without an explicit filter, the level follows `verbosity_level` and `RUST_LOG` directives
/// are layered on top.
pub fn init_tracing_subscriber(
    verbosity_level: u8,
    env_filter: Option<impl Into<EnvFilter>>,
) -> CliResult<()> {
    let level = LogArgs { v: verbosity_level }.level();
    let filter = env_filter.map(Into::into).unwrap_or_else(|| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(level).into())
            .from_env_lossy()
    });

    tracing_subscriber::fmt().with_env_filter(filter).finish().try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.log.level(), Level::INFO);

        let cli = TestCli::parse_from(["test", "-v"]);
        assert_eq!(cli.log.level(), Level::DEBUG);

        let cli = TestCli::parse_from(["test", "-vvv"]);
        assert_eq!(cli.log.v, 3);
        assert_eq!(cli.log.level(), Level::TRACE);
    }
}
