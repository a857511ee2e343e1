//! The [`EthApi`] trait, the Ethereum methods served by the adaptor.

use alloy_primitives::B256;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

use crate::{GetLogsArgs, LogRecord, TransactionRecord};

/// Ethereum JSON-RPC methods answered from the native chain.
#[rpc(server, namespace = "eth")]
pub trait EthApi {
    /// Returns the logs matching the filter.
    #[method(name = "getLogs")]
    async fn get_logs(&self, filter: GetLogsArgs) -> RpcResult<Vec<LogRecord>>;

    /// Returns the transaction with the given hash.
    #[method(name = "getTransactionByHash")]
    async fn get_transaction_by_hash(&self, hash: B256) -> RpcResult<TransactionRecord>;
}
