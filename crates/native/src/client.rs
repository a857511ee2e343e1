//! The [`NativeClient`] seam and its JSON-RPC implementation.

use alloy_primitives::B256;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use url::Url;

use crate::{
    Block, BlockPayload, NativeClientError, NativeClientResult, NotFoundKind, TransactionResult,
    TxStatus, quantity, tx::TransactionResultPayload,
};

/// The capabilities of the native chain the adaptor relies on.
///
/// Implementations must be safe for concurrent use: every in-flight Ethereum call shares one
/// client.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait NativeClient: Debug + Send + Sync {
    /// Returns the current height of the chain.
    async fn current_height(&self) -> NativeClientResult<u64>;

    /// Fetches the block with the given hash.
    async fn block_by_hash(&self, hash: B256) -> NativeClientResult<Block>;

    /// Fetches the block at the given height.
    async fn block_by_height(&self, height: u64) -> NativeClientResult<Block>;

    /// Looks a transaction up by hash.
    async fn transaction(&self, hash: B256) -> NativeClientResult<TransactionResult>;
}

/// The subset of a `theta.GetStatus` result used by the adaptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThetaStatus {
    /// Height of the latest block the node has committed.
    #[serde(with = "quantity::u64_string")]
    pub current_height: u64,
    /// Height of the latest finalized block.
    #[serde(default, with = "quantity::u64_string")]
    pub latest_finalized_block_height: u64,
    /// Whether the node is still catching up.
    #[serde(default)]
    pub syncing: bool,
}

#[derive(Debug, Clone, Serialize)]
struct HashArgs {
    hash: B256,
}

#[derive(Debug, Clone, Serialize)]
struct HeightArgs {
    #[serde(with = "quantity::u64_string")]
    height: u64,
}

#[derive(Debug, Clone, Serialize)]
struct EmptyArgs {}

/// A [`NativeClient`] speaking the node's `theta.*` JSON-RPC methods.
///
/// Params are sent as a single object wrapped in a one element array, the shape the node's
/// RPC server expects.
#[derive(Debug, Clone)]
pub struct ThetaClient {
    client: RpcClient,
}

impl ThetaClient {
    /// Creates a client over the given transport.
    pub const fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Creates a client talking HTTP to the given endpoint.
    pub fn new_http(endpoint: Url) -> Self {
        Self::new(ClientBuilder::default().http(endpoint))
    }

    /// Returns the node status.
    pub async fn status(&self) -> NativeClientResult<ThetaStatus> {
        Ok(self.client.request("theta.GetStatus", (EmptyArgs {},)).await?)
    }

    async fn block<P>(&self, method: &'static str, params: P) -> NativeClientResult<Option<Block>>
    where
        P: Serialize + Clone + Debug + Send + Sync + Unpin + 'static,
    {
        let payload: Option<BlockPayload> = self.client.request(method, (params,)).await?;
        payload.map(BlockPayload::into_block).transpose().map_err(NativeClientError::from)
    }
}

#[async_trait]
impl NativeClient for ThetaClient {
    async fn current_height(&self) -> NativeClientResult<u64> {
        self.status().await.map(|status| status.current_height)
    }

    async fn block_by_hash(&self, hash: B256) -> NativeClientResult<Block> {
        trace!(target: "native", %hash, "theta.GetBlock");
        self.block("theta.GetBlock", HashArgs { hash })
            .await?
            .ok_or(NativeClientError::NotFound(NotFoundKind::BlockHash(hash)))
    }

    async fn block_by_height(&self, height: u64) -> NativeClientResult<Block> {
        trace!(target: "native", height, "theta.GetBlockByHeight");
        self.block("theta.GetBlockByHeight", HeightArgs { height })
            .await?
            .ok_or(NativeClientError::NotFound(NotFoundKind::BlockHeight(height)))
    }

    async fn transaction(&self, hash: B256) -> NativeClientResult<TransactionResult> {
        trace!(target: "native", %hash, "theta.GetTransaction");
        let payload: Option<TransactionResultPayload> =
            self.client.request("theta.GetTransaction", (HashArgs { hash },)).await?;
        let result = payload
            .map(TransactionResult::try_from)
            .transpose()?
            .ok_or(NativeClientError::NotFound(NotFoundKind::Transaction(hash)))?;
        if result.status == TxStatus::NotFound {
            return Err(NativeClientError::NotFound(NotFoundKind::Transaction(hash)));
        }
        Ok(result)
    }
}
