//! Prometheus metrics flags.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};

use crate::{CliResult, init_prometheus_server};

/// Configuration for the Prometheus metrics exporter.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(
        id = "metrics_enabled",
        long = "metrics.enabled",
        global = true,
        default_value_t = false,
        env = "METRICS_ENABLED"
    )]
    pub enabled: bool,

    /// The address the metrics server binds to.
    #[arg(
        long = "metrics.addr",
        global = true,
        default_value = "0.0.0.0",
        env = "METRICS_ADDR"
    )]
    pub addr: IpAddr,

    /// The port the metrics server binds to.
    #[arg(long = "metrics.port", global = true, default_value = "9001", env = "METRICS_PORT")]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9001 }
    }
}

impl MetricsArgs {
    /// Starts the exporter if enabled.
    pub fn init_metrics(&self) -> CliResult<()> {
        if self.enabled {
            init_prometheus_server(self.addr, self.port)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        metrics: MetricsArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.metrics, MetricsArgs::default());
    }

    #[test]
    fn test_flags() {
        let cli = TestCli::parse_from([
            "test",
            "--metrics.enabled",
            "--metrics.addr",
            "127.0.0.1",
            "--metrics.port",
            "9100",
        ]);
        assert!(cli.metrics.enabled);
        assert_eq!(cli.metrics.addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(cli.metrics.port, 9100);
    }
}
