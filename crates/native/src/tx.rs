//! Native transactions.
//!
//! The node tags every transaction with a numeric [`TxType`] and ships the payload as an
//! untyped `raw` object next to it. [`NativeTx::decode`] dispatches on the tag into the typed
//! payloads the adaptor understands; every other kind, unknown tags included, is kept as an
//! [`OpaqueTx`].

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::{Receipt, quantity};

/// The closed set of transaction kinds known to the native chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum TxType {
    /// Block reward distribution.
    Coinbase = 0,
    /// Validator slashing.
    Slash = 1,
    /// Multi-input, multi-output value transfer.
    Send = 2,
    /// Reserve fund for off-chain micropayments.
    ReserveFund = 3,
    /// Release a reserved fund.
    ReleaseFund = 4,
    /// Off-chain service payment settlement.
    ServicePayment = 5,
    /// Payment split rule.
    SplitRule = 6,
    /// EVM contract call or deployment.
    SmartContract = 7,
    /// Stake deposit.
    DepositStake = 8,
    /// Stake withdrawal.
    WithdrawStake = 9,
    /// Stake deposit, version 2.
    DepositStakeV2 = 10,
    /// Stake reward distribution rule.
    StakeRewardDistribution = 11,
}

/// The kind tag of a transaction as sent by the node.
///
/// Tags outside of [`TxType`] are kept as [`TxKind::Unknown`] so that a node running a newer
/// protocol version does not make its blocks undecodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxKind {
    /// A kind of the closed [`TxType`] set.
    Known(TxType),
    /// Any other tag.
    Unknown(u8),
}

impl From<TxType> for TxKind {
    fn from(kind: TxType) -> Self {
        Self::Known(kind)
    }
}

impl PartialEq<TxType> for TxKind {
    fn eq(&self, other: &TxType) -> bool {
        matches!(self, Self::Known(kind) if kind == other)
    }
}

/// Coin amounts carried by an input, output or fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins {
    /// Amount of THETA, in wei.
    #[serde(rename = "thetawei", default, with = "quantity::u256_string")]
    pub theta_wei: U256,
    /// Amount of TFUEL, in wei.
    #[serde(rename = "tfuelwei", default, with = "quantity::u256_string")]
    pub tfuel_wei: U256,
}

/// A signed transaction input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// The spending account.
    pub address: Address,
    /// The amount spent.
    #[serde(default)]
    pub coins: Coins,
    /// Account sequence number.
    #[serde(default, with = "quantity::u64_string")]
    pub sequence: u64,
    /// Packed 65 byte `r || s || v` signature. Empty for unsigned inputs.
    #[serde(default)]
    pub signature: Bytes,
}

/// A transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// The receiving account.
    pub address: Address,
    /// The amount received.
    #[serde(default)]
    pub coins: Coins,
}

/// A value transfer between accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTx {
    /// Fee paid for the transfer.
    #[serde(default)]
    pub fee: Coins,
    /// Spending inputs, at least one for a valid transaction.
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    /// Receiving outputs, at least one for a valid transaction.
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

/// An EVM contract call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartContractTx {
    /// The caller, carrying the value sent and the signature.
    pub from: TxInput,
    /// The callee. The zero address deploys a contract.
    pub to: TxOutput,
    /// Gas limit of the call.
    #[serde(default, with = "quantity::u64_string")]
    pub gas_limit: u64,
    /// Gas price, in TFUEL wei.
    #[serde(default, with = "quantity::u256_string")]
    pub gas_price: U256,
    /// Call data.
    #[serde(default)]
    pub data: Bytes,
}

/// A transaction of a kind the adaptor does not map. Only its kind is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpaqueTx {
    /// The kind of the transaction.
    pub kind: TxKind,
}

/// A transaction payload, dispatched by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeTx {
    /// A value transfer.
    Send(SendTx),
    /// A contract call.
    SmartContract(SmartContractTx),
    /// Any other kind.
    Opaque(OpaqueTx),
}

impl NativeTx {
    /// Decodes the `raw` payload of a transaction of the given kind.
    ///
    /// Kinds without a typed payload, and unknown kinds, ignore `raw` entirely.
    pub fn decode(kind: TxKind, raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        match kind {
            TxKind::Known(TxType::Send) => serde_json::from_value(raw).map(Self::Send),
            TxKind::Known(TxType::SmartContract) => {
                serde_json::from_value(raw).map(Self::SmartContract)
            }
            TxKind::Known(
                TxType::Coinbase |
                TxType::Slash |
                TxType::ReserveFund |
                TxType::ReleaseFund |
                TxType::ServicePayment |
                TxType::SplitRule |
                TxType::DepositStake |
                TxType::WithdrawStake |
                TxType::DepositStakeV2 |
                TxType::StakeRewardDistribution,
            ) |
            TxKind::Unknown(_) => Ok(Self::Opaque(OpaqueTx { kind })),
        }
    }

    /// Returns the kind of the payload.
    pub const fn kind(&self) -> TxKind {
        match self {
            Self::Send(_) => TxKind::Known(TxType::Send),
            Self::SmartContract(_) => TxKind::Known(TxType::SmartContract),
            Self::Opaque(tx) => tx.kind,
        }
    }
}

/// A transaction as it appears inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The transaction hash.
    pub hash: B256,
    /// The decoded payload.
    pub tx: NativeTx,
    /// The receipt, once the node has produced one. Only smart contract transactions carry one.
    pub receipt: Option<Receipt>,
}

impl Transaction {
    /// Returns the kind of the transaction.
    pub const fn kind(&self) -> TxKind {
        self.tx.kind()
    }
}

/// The lifecycle status the node reports for a transaction lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// The node has never seen the transaction.
    NotFound,
    /// Waiting in the mempool.
    Pending,
    /// Included in a finalized block.
    Finalized,
    /// Dropped from the mempool.
    Abandoned,
    /// A status this adaptor does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// The result of looking a transaction up by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    /// Hash of the containing block. Zero while the transaction is not included.
    pub block_hash: B256,
    /// Height of the containing block.
    pub block_height: u64,
    /// Lookup status.
    pub status: TxStatus,
    /// The transaction hash.
    pub hash: B256,
    /// The decoded payload, absent when the node omits it.
    pub tx: Option<NativeTx>,
    /// The receipt, if any.
    pub receipt: Option<Receipt>,
}

impl TransactionResult {
    /// Returns the containing block hash, if the transaction has been included.
    pub fn included_in(&self) -> Option<B256> {
        (!self.block_hash.is_zero()).then_some(self.block_hash)
    }
}

/// Wire form of a `theta.GetTransaction` result.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransactionResultPayload {
    #[serde(default)]
    pub(crate) block_hash: B256,
    #[serde(default, with = "quantity::u64_string")]
    pub(crate) block_height: u64,
    #[serde(default)]
    pub(crate) status: TxStatus,
    #[serde(default)]
    pub(crate) hash: B256,
    #[serde(rename = "type")]
    pub(crate) kind: Option<TxKind>,
    #[serde(default, rename = "transaction")]
    pub(crate) raw: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) receipt: Option<Receipt>,
}

impl TryFrom<TransactionResultPayload> for TransactionResult {
    type Error = serde_json::Error;

    fn try_from(payload: TransactionResultPayload) -> Result<Self, Self::Error> {
        let tx = match (payload.kind, payload.raw) {
            (Some(kind), Some(raw)) if !raw.is_null() => Some(NativeTx::decode(kind, raw)?),
            _ => None,
        };
        Ok(Self {
            block_hash: payload.block_hash,
            block_height: payload.block_height,
            status: payload.status,
            hash: payload.hash,
            tx,
            receipt: payload.receipt,
        })
    }
}
