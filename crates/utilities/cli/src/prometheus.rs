//! Utilities for spinning up a prometheus metrics server.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

use crate::CliResult;

/// Installs the global Prometheus recorder and serves it over HTTP on the given address.
///
/// Must be called from within a tokio runtime.
pub fn init_prometheus_server(addr: IpAddr, metrics_port: u16) -> CliResult<()> {
    let socket = SocketAddr::new(addr, metrics_port);
    PrometheusBuilder::new().with_http_listener(socket).install()?;

    info!(target: "prometheus", "Serving metrics at: http://{}", socket);
    Ok(())
}
