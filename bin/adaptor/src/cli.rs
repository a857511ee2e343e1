//! Contains the adaptor CLI.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use theta_cli::cli_styles;
use theta_eth_rpc::{EthRpc, Metrics};
use theta_native::ThetaClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::flags::{FetchArgs, GlobalArgs, RpcArgs};

/// Serves the Ethereum JSON-RPC API from a Theta node.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Endpoint arguments.
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// Fetch retry arguments.
    #[command(flatten)]
    pub fetch: FetchArgs,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.global.log_args.init_tracing_subscriber()?;
        Self::tokio_runtime()?.block_on(self.start())
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }

    /// Starts the server and serves until ctrl-c is pressed.
    pub async fn start(self) -> Result<()> {
        let config = self.fetch.fetch_config()?;
        self.global.metrics.init_metrics()?;
        Metrics::init();

        info!(
            target: "adaptor",
            theta_rpc = %self.rpc.theta_rpc,
            max_attempts = config.max_attempts,
            block_interval = ?config.block_interval,
            "Starting Theta ETH RPC adaptor"
        );

        let client = Arc::new(ThetaClient::new_http(self.rpc.theta_rpc.clone()));
        let cancellation = CancellationToken::new();
        let handle =
            EthRpc::new(client, config, cancellation.clone()).launch(self.rpc.socket()).await?;

        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                info!(target: "adaptor", "Received ctrl-c, shutting down");
            }
            _ = handle.clone().stopped() => {
                warn!(target: "adaptor", "RPC server stopped unexpectedly");
            }
        }

        cancellation.cancel();
        if handle.stop().is_ok() {
            handle.stopped().await;
        }
        Ok(())
    }
}
