//! EVM receipts attached to smart contract transactions.

use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};

/// A single event emitted during contract execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// The emitting contract.
    #[serde(default)]
    pub address: Address,
    /// Indexed topics, in emission order.
    #[serde(default)]
    pub topics: Vec<B256>,
    /// Unindexed payload.
    #[serde(default)]
    pub data: Bytes,
}

/// The execution result of a smart contract transaction.
///
/// The node encodes receipt fields with upper camel case keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Receipt {
    /// Hash of the transaction this receipt belongs to.
    #[serde(default)]
    pub tx_hash: B256,
    /// Logs emitted, in order. The node sends `null` for an execution without logs.
    #[serde(default, deserialize_with = "nullable_logs")]
    pub logs: Vec<Log>,
    /// Raw EVM return data.
    #[serde(default)]
    pub evm_ret: Bytes,
    /// The contract that was executed, or deployed.
    #[serde(default)]
    pub contract_address: Address,
    /// Gas consumed by the execution.
    #[serde(default, with = "crate::quantity::u64_string")]
    pub gas_used: u64,
    /// EVM error message, empty on success.
    #[serde(default)]
    pub evm_err: String,
}

fn nullable_logs<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<Log>, D::Error> {
    Ok(Option::<Vec<Log>>::deserialize(deserializer)?.unwrap_or_default())
}
