//! Native blocks.
//!
//! `theta.GetBlock` and `theta.GetBlockByHeight` return the block metadata with the transaction
//! list as an adjacent `transactions` field. The two are decoded as separate pieces of a
//! [`BlockPayload`] and merged into a [`Block`] by [`BlockPayload::into_block`], which also
//! decodes every transaction's `raw` payload according to its kind.
//!
//! Only smart contract payloads are required to decode. Any other transaction whose payload
//! does not decode is kept as an [`OpaqueTx`] of its kind.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{NativeTx, OpaqueTx, Receipt, Transaction, TxKind, TxType, quantity};

/// Block metadata, without the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Chain identifier, e.g. `mainnet`.
    #[serde(default)]
    pub chain_id: String,
    /// Consensus epoch.
    #[serde(default, with = "quantity::u64_string")]
    pub epoch: u64,
    /// Block height.
    #[serde(with = "quantity::u64_string")]
    pub height: u64,
    /// Parent block hash.
    #[serde(default)]
    pub parent: B256,
    /// Unix timestamp, in seconds.
    #[serde(default, with = "quantity::u256_string")]
    pub timestamp: U256,
    /// The proposing validator.
    #[serde(default)]
    pub proposer: Address,
    /// Numeric consensus status of the block.
    #[serde(default)]
    pub status: u8,
    /// Block hash.
    pub hash: B256,
}

/// One entry of a block's `transactions` list, before its payload is decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxPayload {
    /// Undecoded transaction body.
    pub raw: serde_json::Value,
    /// Kind tag selecting the decoder for `raw`.
    #[serde(rename = "type")]
    pub kind: TxKind,
    /// Transaction hash.
    pub hash: B256,
    /// Receipt, `null` until the node has produced one.
    #[serde(default)]
    pub receipt: Option<Receipt>,
}

impl TryFrom<TxPayload> for Transaction {
    type Error = serde_json::Error;

    fn try_from(payload: TxPayload) -> Result<Self, Self::Error> {
        let tx = match NativeTx::decode(payload.kind, payload.raw) {
            Ok(tx) => tx,
            Err(err) if payload.kind != TxType::SmartContract => {
                warn!(
                    target: "native",
                    hash = %payload.hash,
                    kind = ?payload.kind,
                    %err,
                    "Undecodable transaction payload, keeping it opaque"
                );
                NativeTx::Opaque(OpaqueTx { kind: payload.kind })
            }
            Err(err) => return Err(err),
        };
        Ok(Self { hash: payload.hash, tx, receipt: payload.receipt })
    }
}

/// The wire form of a block: metadata and transaction list side by side.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockPayload {
    /// The metadata piece.
    #[serde(flatten)]
    pub meta: BlockMeta,
    /// The transaction list piece. The node sends `null` for an empty block.
    #[serde(default)]
    pub transactions: Option<Vec<TxPayload>>,
}

impl BlockPayload {
    /// Merges the metadata and the decoded transaction list into a [`Block`].
    pub fn into_block(self) -> Result<Block, serde_json::Error> {
        let transactions = self
            .transactions
            .unwrap_or_default()
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block { meta: self.meta, transactions })
    }
}

/// A fully decoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block metadata.
    pub meta: BlockMeta,
    /// Transactions, in block order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The block height.
    pub const fn height(&self) -> u64 {
        self.meta.height
    }

    /// The block hash.
    pub const fn hash(&self) -> B256 {
        self.meta.hash
    }

    /// Returns the position of the transaction with the given hash, if present.
    pub fn position_of(&self, tx_hash: B256) -> Option<usize> {
        self.transactions.iter().position(|tx| tx.hash == tx_hash)
    }
}
