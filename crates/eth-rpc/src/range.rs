//! Block range resolution for `eth_getLogs`.

use alloy_eips::BlockNumberOrTag;
use alloy_primitives::B256;
use derive_more::Display;
use std::{ops::RangeInclusive, str::FromStr};
use theta_native::NativeClient;

use crate::{EthRpcError, GetLogsArgs};

/// Number of blocks subtracted from the start of a resolved range.
///
/// A native block is final once two further blocks have been committed on top of it.
pub const FINALITY_MARGIN: u64 = 2;

/// A concrete, inclusive range of block heights.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{start}..={end}")]
pub struct BlockRange {
    /// First height, inclusive.
    pub start: u64,
    /// Last height, inclusive.
    pub end: u64,
}

impl BlockRange {
    /// Resolves a pair of block tags against the current chain height.
    ///
    /// Resolution never fails. Ends are swapped if out of order and the start is then moved
    /// back by [`FINALITY_MARGIN`], saturating at zero.
    pub fn resolve(from: Option<&str>, to: Option<&str>, current: u64) -> Self {
        let mut start = resolve_tag(from, current);
        let mut end = resolve_tag(to, current);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        Self { start: start.saturating_sub(FINALITY_MARGIN), end }
    }

    /// Returns the heights covered by the range.
    pub const fn heights(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

/// Resolves a single block tag.
///
/// An unset or unrecognized tag resolves to `current`, as do the head-like tags `latest`,
/// `pending`, `safe` and `finalized`. `earliest` resolves to zero and a `0x` hex number to
/// itself.
pub fn resolve_tag(tag: Option<&str>, current: u64) -> u64 {
    match tag.map(BlockNumberOrTag::from_str) {
        Some(Ok(BlockNumberOrTag::Number(height))) => height,
        Some(Ok(BlockNumberOrTag::Earliest)) => 0,
        _ => current,
    }
}

/// The blocks an `eth_getLogs` call scans.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchTarget {
    /// A single block, by hash.
    #[display("block {_0}")]
    Hash(B256),
    /// A range of blocks, by height.
    #[display("blocks {_0}")]
    Range(BlockRange),
}

impl FetchTarget {
    /// Resolves the target of a log filter.
    ///
    /// A non-zero block hash selects that block alone and the chain is not queried. Otherwise the
    /// filter's tags are resolved against the current height.
    pub async fn for_filter<C>(client: &C, filter: &GetLogsArgs) -> Result<Self, EthRpcError>
    where
        C: NativeClient + ?Sized,
    {
        if let Some(hash) = filter.block_hash.filter(|hash| !hash.is_zero()) {
            return Ok(Self::Hash(hash));
        }

        let current = client.current_height().await?;
        let range =
            BlockRange::resolve(filter.from_block.as_deref(), filter.to_block.as_deref(), current);
        info!(target: "eth_rpc", current, start = range.start, end = range.end, "Resolved log range");
        Ok(Self::Range(range))
    }
}
