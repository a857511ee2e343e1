//! The [`EthApiServer`] implementation.

use alloy_primitives::B256;
use async_trait::async_trait;
use jsonrpsee::{core::RpcResult, server::ServerHandle};
use std::{net::SocketAddr, sync::Arc};
use theta_native::{NativeClient, NativeClientError};
use tokio_util::sync::CancellationToken;

use crate::{
    EthApiServer, EthRpcError, FetchConfig, FetchTarget, FinalizedFetcher, GetLogsArgs, LogMatcher,
    LogRecord, Metrics, TransactionRecord, TransactionTranslator, normalize_topics,
};

/// Serves the Ethereum methods from a [`NativeClient`].
///
/// Calls share nothing but the client. The cancellation token is handed to every retrying
/// fetch, cancelling it aborts in-flight `eth_getLogs` calls.
#[derive(Debug)]
pub struct EthRpc<C: ?Sized> {
    client: Arc<C>,
    config: FetchConfig,
    cancellation: CancellationToken,
}

impl<C> EthRpc<C>
where
    C: NativeClient + ?Sized + 'static,
{
    /// Creates the handler set.
    pub const fn new(client: Arc<C>, config: FetchConfig, cancellation: CancellationToken) -> Self {
        Self { client, config, cancellation }
    }

    /// Resolves an `eth_getLogs` filter.
    pub async fn logs(&self, filter: GetLogsArgs) -> Result<Vec<LogRecord>, EthRpcError> {
        let topics = normalize_topics(filter.topics.as_deref().unwrap_or_default())?;
        let target = FetchTarget::for_filter(&*self.client, &filter).await?;
        let blocks = FinalizedFetcher::new(&*self.client, self.config, &self.cancellation)
            .fetch(target)
            .await?;

        let logs = LogMatcher::new(filter.address, topics).collect(&blocks);
        debug!(target: "eth_rpc", %target, blocks = blocks.len(), logs = logs.len(), "Collected logs");
        Ok(logs)
    }

    /// Resolves an `eth_getTransactionByHash` lookup.
    pub async fn transaction(&self, hash: B256) -> Result<TransactionRecord, EthRpcError> {
        let result = self.client.transaction(hash).await.map_err(|err| match err {
            NativeClientError::NotFound(kind) => EthRpcError::NotFound(kind.to_string()),
            err => err.into(),
        })?;
        let record = TransactionTranslator::new(&*self.client).translate(&result).await?;
        debug!(
            target: "eth_rpc",
            %hash,
            kind = ?result.tx.as_ref().map(|tx| tx.kind()),
            index = ?record.transaction_index,
            "Translated transaction"
        );
        Ok(record)
    }

    /// Starts a JSON-RPC server on `socket` serving the handlers.
    pub async fn launch(self, socket: SocketAddr) -> std::io::Result<ServerHandle> {
        let server = jsonrpsee::server::ServerBuilder::default().build(socket).await?;
        info!(target: "eth_rpc", addr = %server.local_addr()?, "Serving Ethereum JSON-RPC");
        Ok(server.start(self.into_rpc()))
    }
}

#[async_trait]
impl<C> EthApiServer for EthRpc<C>
where
    C: NativeClient + ?Sized + 'static,
{
    async fn get_logs(&self, filter: GetLogsArgs) -> RpcResult<Vec<LogRecord>> {
        metrics::counter!(Metrics::CALLS_TOTAL, "method" => "eth_getLogs").increment(1);
        info!(target: "eth_rpc", ?filter, "eth_getLogs");

        Ok(self.logs(filter).await.inspect_err(|err| {
            warn!(target: "eth_rpc", %err, "eth_getLogs failed");
        })?)
    }

    async fn get_transaction_by_hash(&self, hash: B256) -> RpcResult<TransactionRecord> {
        metrics::counter!(Metrics::CALLS_TOTAL, "method" => "eth_getTransactionByHash")
            .increment(1);
        info!(target: "eth_rpc", %hash, "eth_getTransactionByHash");

        Ok(self.transaction(hash).await.inspect_err(|err| {
            warn!(target: "eth_rpc", %hash, %err, "eth_getTransactionByHash failed");
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theta_native::{TransactionResult, TxStatus, TxType, test_utils::*};

    fn rpc(chain: MemoryChain) -> EthRpc<MemoryChain> {
        EthRpc::new(Arc::new(chain), FetchConfig::default(), CancellationToken::new())
    }

    #[tokio::test]
    async fn test_malformed_topics_abort_before_fetching() {
        let rpc = rpc(MemoryChain::new().with_empty_blocks(0..=4));
        let filter = GetLogsArgs { topics: Some(vec![serde_json::Value::Null]), ..Default::default() };

        let err = rpc.logs(filter).await.unwrap_err();

        assert!(matches!(err, EthRpcError::InvalidArgument(_)));
        assert_eq!(rpc.client.block_calls(), 0);
    }

    #[tokio::test]
    async fn test_logs_scan_the_margin_adjusted_range() {
        let rpc = rpc(MemoryChain::new().with_empty_blocks(0..=10));

        let logs = rpc.logs(GetLogsArgs::default()).await.unwrap();

        assert!(logs.is_empty());
        // latest..latest at height 10 scans 8..=10.
        assert_eq!(rpc.client.block_calls(), 3);
    }

    #[tokio::test]
    async fn test_unknown_transaction() {
        let err = rpc(MemoryChain::new()).transaction(B256::repeat_byte(1)).await.unwrap_err();
        assert!(matches!(err, EthRpcError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_transaction_outside_its_block() {
        let hash = B256::repeat_byte(2);
        let chain = MemoryChain::new().with_block(block(5, vec![])).with_transaction(
            TransactionResult {
                block_hash: block_hash(5),
                block_height: 5,
                status: TxStatus::Finalized,
                hash,
                tx: Some(opaque(hash, TxType::Slash).tx),
                receipt: None,
            },
        );

        let err = rpc(chain).transaction(hash).await.unwrap_err();
        assert!(matches!(err, EthRpcError::NotFound(_)));
    }
}
