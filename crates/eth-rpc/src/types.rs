//! Ethereum wire types served by the adaptor.

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The filter object of an `eth_getLogs` call.
///
/// `topics` is untyped: besides the standard list of hashes, callers send a list wrapped in an
/// extra list (`[["0x..", "0x.."]]`). See [`crate::normalize_topics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogsArgs {
    /// First block of the range, as a tag or a hex number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<String>,
    /// Last block of the range, as a tag or a hex number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<String>,
    /// Contract address filter. The zero address matches every contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Raw topic filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<serde_json::Value>>,
    /// Single block filter. Takes precedence over the range when non-zero.
    #[serde(
        default,
        rename = "blockhash",
        alias = "blockHash",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_hash: Option<B256>,
}

/// One entry of an `eth_getLogs` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Always `false`: reorgs are not tracked.
    pub removed: bool,
    /// Position of the log in its receipt.
    #[serde(with = "alloy_serde::quantity")]
    pub log_index: u64,
    /// Position of the transaction in its block.
    #[serde(with = "alloy_serde::quantity")]
    pub transaction_index: u64,
    /// Hash of the emitting transaction.
    pub transaction_hash: B256,
    /// Hash of the containing block.
    pub block_hash: B256,
    /// Height of the containing block.
    #[serde(with = "alloy_serde::quantity")]
    pub block_number: u64,
    /// The receipt's contract address.
    pub address: Address,
    /// Unindexed log data.
    pub data: Bytes,
    /// All topics of the log.
    pub topics: Vec<B256>,
}

/// An `eth_getTransactionByHash` result.
///
/// Fields a transaction kind does not map keep their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Hash of the containing block.
    pub block_hash: B256,
    /// Height of the containing block.
    #[serde(with = "alloy_serde::quantity")]
    pub block_number: u64,
    /// The transaction hash.
    pub hash: B256,
    /// Position in the containing block, `null` while not included.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub transaction_index: Option<u64>,
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// For transfers the fee paid, for contract calls the gas limit.
    pub gas: U256,
    /// Declared gas price.
    pub gas_price: U256,
    /// Amount sent, in TFUEL wei.
    pub value: U256,
    /// Sender sequence number.
    #[serde(with = "alloy_serde::quantity")]
    pub nonce: u64,
    /// Call data.
    pub input: Bytes,
    /// Signature recovery byte.
    #[serde(with = "alloy_serde::quantity")]
    pub v: u64,
    /// Signature `r`.
    pub r: B256,
    /// Signature `s`.
    pub s: B256,
}
