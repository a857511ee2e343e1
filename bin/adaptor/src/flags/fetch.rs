//! Retry tuning flags.

use anyhow::{Result, ensure};
use clap::Args;
use std::time::Duration;
use theta_eth_rpc::FetchConfig;

/// Tuning of the retries absorbing the native chain's finalization delay.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchArgs {
    /// Total attempts for a block fetch, the first one included.
    #[arg(
        long = "fetch.max-attempts",
        env = "FETCH_MAX_ATTEMPTS",
        default_value_t = FetchConfig::DEFAULT_MAX_ATTEMPTS
    )]
    pub max_attempts: usize,

    /// Wait between two attempts, in milliseconds.
    #[arg(long = "fetch.block-interval", env = "FETCH_BLOCK_INTERVAL_MS", default_value_t = 6000)]
    pub block_interval_ms: u64,
}

impl FetchArgs {
    /// Validates the flags into a [`FetchConfig`].
    pub fn fetch_config(&self) -> Result<FetchConfig> {
        ensure!(self.max_attempts >= 1, "--fetch.max-attempts must be at least 1");
        Ok(FetchConfig {
            max_attempts: self.max_attempts,
            block_interval: Duration::from_millis(self.block_interval_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        fetch: FetchArgs,
    }

    #[test]
    fn test_defaults_match_the_fetcher() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.fetch.fetch_config().unwrap(), FetchConfig::default());
    }

    #[rstest]
    #[case::single_attempt(&["test", "--fetch.max-attempts", "1"], 1, 6000)]
    #[case::fast_chain(&["test", "--fetch.block-interval", "1000"], 5, 1000)]
    fn test_overrides(#[case] args: &[&str], #[case] attempts: usize, #[case] interval_ms: u64) {
        let config = TestCli::parse_from(args).fetch.fetch_config().unwrap();
        assert_eq!(config.max_attempts, attempts);
        assert_eq!(config.block_interval, Duration::from_millis(interval_ms));
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let cli = TestCli::parse_from(["test", "--fetch.max-attempts", "0"]);
        assert!(cli.fetch.fetch_config().is_err());
    }
}
