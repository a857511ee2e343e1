//! Fetching blocks that may not be finalized yet.
//!
//! Logs are usually requested right at the chain head, where the node may still be waiting
//! for the blocks to finalize. [`FinalizedFetcher`] absorbs that window by retrying every
//! failed fetch once per block interval, up to a bounded number of attempts. A payload that
//! does not decode fails the fetch at once.

use alloy_primitives::B256;
use backon::{ConstantBuilder, Retryable};
use std::{future::Future, time::Duration};
use theta_native::{Block, NativeClient, NativeClientError};
use tokio_util::sync::CancellationToken;

use crate::{BlockRange, EthRpcError, FetchTarget, Metrics};

/// Retry tuning for [`FinalizedFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Total number of attempts, the first one included. Zero is treated as one.
    pub max_attempts: usize,
    /// Wait between two attempts, one block production interval.
    pub block_interval: Duration,
}

impl FetchConfig {
    /// The default number of attempts.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
    /// The default block production interval of the native chain.
    pub const DEFAULT_BLOCK_INTERVAL: Duration = Duration::from_secs(6);

    const fn attempts(&self) -> usize {
        if self.max_attempts == 0 { 1 } else { self.max_attempts }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            block_interval: Self::DEFAULT_BLOCK_INTERVAL,
        }
    }
}

/// Fetches a block, or a range of blocks, with bounded retries.
///
/// A range attempt succeeds only if every height in it is fetched. A failing height discards
/// the blocks collected so far and the next attempt restarts from the first height, so callers
/// never observe a partial range.
#[derive(Debug)]
pub struct FinalizedFetcher<'a, C: ?Sized> {
    client: &'a C,
    config: FetchConfig,
    cancellation: &'a CancellationToken,
}

impl<'a, C> FinalizedFetcher<'a, C>
where
    C: NativeClient + ?Sized,
{
    /// Creates a fetcher. Once `cancellation` fires, pending fetches fail with
    /// [`EthRpcError::Cancelled`].
    pub const fn new(
        client: &'a C,
        config: FetchConfig,
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self { client, config, cancellation }
    }

    /// Fetches every block the target covers, in height order.
    pub async fn fetch(&self, target: FetchTarget) -> Result<Vec<Block>, EthRpcError> {
        match target {
            FetchTarget::Hash(hash) => self.fetch_block(hash).await.map(|block| vec![block]),
            FetchTarget::Range(range) => self.fetch_range(range).await,
        }
    }

    /// Fetches the block with the given hash.
    pub async fn fetch_block(&self, hash: B256) -> Result<Block, EthRpcError> {
        self.retry(FetchTarget::Hash(hash), || self.client.block_by_hash(hash)).await
    }

    /// Fetches every block in the range.
    pub async fn fetch_range(&self, range: BlockRange) -> Result<Vec<Block>, EthRpcError> {
        self.retry(FetchTarget::Range(range), || async move {
            let mut blocks = Vec::new();
            for height in range.heights() {
                blocks.push(self.client.block_by_height(height).await?);
            }
            Ok(blocks)
        })
        .await
    }

    async fn retry<T, F, Fut>(&self, target: FetchTarget, attempt: F) -> Result<T, EthRpcError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NativeClientError>>,
    {
        let attempts = self.config.attempts();
        let backoff = ConstantBuilder::default()
            .with_delay(self.config.block_interval)
            .with_max_times(attempts - 1);

        let mut failed = 0usize;
        let retried = attempt
            .retry(backoff)
            .when(NativeClientError::is_retryable)
            .notify(|err: &NativeClientError, wait: Duration| {
                failed += 1;
                metrics::counter!(Metrics::FETCH_RETRIES_TOTAL).increment(1);
                warn!(
                    target: "fetcher",
                    %target,
                    attempt = failed,
                    %err,
                    ?wait,
                    "Fetch attempt failed, retrying"
                );
            });

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                debug!(target: "fetcher", %target, "Fetch cancelled");
                Err(EthRpcError::Cancelled(target))
            }
            res = retried => res.map_err(|source| {
                if !source.is_retryable() {
                    error!(
                        target: "fetcher",
                        %target,
                        err = %source,
                        "Fetched payload is undecodable"
                    );
                    return EthRpcError::Client(source);
                }
                metrics::counter!(Metrics::FETCH_EXHAUSTED_TOTAL).increment(1);
                error!(target: "fetcher", %target, attempts, err = %source, "Fetch attempts exhausted");
                EthRpcError::FetchExhausted { target, attempts, source }
            }),
        }
    }
}
