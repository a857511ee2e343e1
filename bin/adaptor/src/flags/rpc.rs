//! Endpoint flags.

use clap::Args;
use std::net::{IpAddr, SocketAddr};
use url::Url;

/// Where to read the native chain from, and where to serve the Ethereum API.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RpcArgs {
    /// Native RPC endpoint of the Theta node.
    #[arg(
        long = "theta-rpc",
        env = "THETA_RPC_ENDPOINT",
        default_value = "http://127.0.0.1:16888/rpc"
    )]
    pub theta_rpc: Url,

    /// IP address the Ethereum JSON-RPC server listens on.
    #[arg(long = "rpc.addr", env = "RPC_ADDR", default_value = "127.0.0.1")]
    pub rpc_address: IpAddr,

    /// Port the Ethereum JSON-RPC server listens on.
    #[arg(long = "rpc.port", env = "RPC_PORT", default_value_t = 18888)]
    pub rpc_port: u16,
}

impl RpcArgs {
    /// Returns the socket the server binds to.
    pub const fn socket(&self) -> SocketAddr {
        SocketAddr::new(self.rpc_address, self.rpc_port)
    }
}
