//! An in-memory [`NativeClient`] for tests.

use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    Block, BlockMeta, Coins, Log, NativeClient, NativeClientError, NativeClientResult, NativeTx,
    NotFoundKind, OpaqueTx, Receipt, SendTx, SmartContractTx, Transaction, TransactionResult,
    TxInput, TxKind, TxOutput, TxStatus, TxType,
};

/// A chain held in memory.
///
/// Block fetches can be made to fail a fixed number of times with
/// [`MemoryChain::with_block_failures`], emulating a node that has not finalized the requested
/// blocks yet.
#[derive(Debug, Default)]
pub struct MemoryChain {
    height: u64,
    by_height: HashMap<u64, Block>,
    by_tx_hash: HashMap<B256, TransactionResult>,
    pending_failures: Mutex<usize>,
    block_calls: AtomicUsize,
}

impl MemoryChain {
    /// Creates an empty chain at height zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the height reported by [`NativeClient::current_height`].
    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    /// Adds a block. The chain height is raised to the block height if needed.
    pub fn with_block(mut self, block: Block) -> Self {
        self.height = self.height.max(block.height());
        for tx in &block.transactions {
            self.by_tx_hash.insert(
                tx.hash,
                TransactionResult {
                    block_hash: block.hash(),
                    block_height: block.height(),
                    status: TxStatus::Finalized,
                    hash: tx.hash,
                    tx: Some(tx.tx.clone()),
                    receipt: tx.receipt.clone(),
                },
            );
        }
        self.by_height.insert(block.height(), block);
        self
    }

    /// Adds empty blocks for every height in `heights`.
    pub fn with_empty_blocks(self, heights: impl IntoIterator<Item = u64>) -> Self {
        heights.into_iter().fold(self, |chain, height| chain.with_block(block(height, vec![])))
    }

    /// Registers a transaction lookup result that is not backed by a stored block.
    pub fn with_transaction(mut self, result: TransactionResult) -> Self {
        self.by_tx_hash.insert(result.hash, result);
        self
    }

    /// Makes the next `failures` block fetches fail with a transport error.
    pub fn with_block_failures(mut self, failures: usize) -> Self {
        *self.pending_failures.get_mut().unwrap() = failures;
        self
    }

    /// Returns the number of block fetches served so far, failed ones included.
    pub fn block_calls(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
    }

    fn maybe_fail(&self) -> NativeClientResult<()> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        let mut pending = self.pending_failures.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            return Err(NativeClientError::Transport(alloy_transport::TransportErrorKind::custom_str(
                "block not finalized yet",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl NativeClient for MemoryChain {
    async fn current_height(&self) -> NativeClientResult<u64> {
        Ok(self.height)
    }

    async fn block_by_hash(&self, hash: B256) -> NativeClientResult<Block> {
        self.maybe_fail()?;
        self.by_height
            .values()
            .find(|block| block.hash() == hash)
            .cloned()
            .ok_or(NativeClientError::NotFound(NotFoundKind::BlockHash(hash)))
    }

    async fn block_by_height(&self, height: u64) -> NativeClientResult<Block> {
        self.maybe_fail()?;
        self.by_height
            .get(&height)
            .cloned()
            .ok_or(NativeClientError::NotFound(NotFoundKind::BlockHeight(height)))
    }

    async fn transaction(&self, hash: B256) -> NativeClientResult<TransactionResult> {
        self.by_tx_hash
            .get(&hash)
            .cloned()
            .ok_or(NativeClientError::NotFound(NotFoundKind::Transaction(hash)))
    }
}

/// The hash given to the block at `height` by [`block`].
pub fn block_hash(height: u64) -> B256 {
    keccak256(height.to_be_bytes())
}

/// Builds a block at `height` holding the given transactions.
pub fn block(height: u64, transactions: Vec<Transaction>) -> Block {
    Block {
        meta: BlockMeta {
            chain_id: "privatenet".to_string(),
            height,
            hash: block_hash(height),
            parent: if height == 0 { B256::ZERO } else { block_hash(height - 1) },
            ..Default::default()
        },
        transactions,
    }
}

/// Builds a log with the given topics and data.
pub fn log(address: Address, topics: Vec<B256>, data: &'static [u8]) -> Log {
    Log { address, topics, data: Bytes::from_static(data) }
}

/// Builds a smart contract transaction whose receipt targets `contract` with `logs`.
pub fn contract_call(hash: B256, contract: Address, logs: Option<Vec<Log>>) -> Transaction {
    Transaction {
        hash,
        tx: NativeTx::SmartContract(SmartContractTx {
            from: TxInput { address: Address::repeat_byte(0x01), ..Default::default() },
            to: TxOutput { address: contract, coins: Coins::default() },
            gas_limit: 100_000,
            gas_price: U256::from(4_000_000_000_000u64),
            data: Bytes::new(),
        }),
        receipt: logs.map(|logs| Receipt {
            tx_hash: hash,
            logs,
            contract_address: contract,
            ..Default::default()
        }),
    }
}

/// Builds a value transfer with a single input and output.
pub fn transfer(hash: B256, fee: u64, value: u64, signature: Bytes) -> Transaction {
    Transaction {
        hash,
        tx: NativeTx::Send(SendTx {
            fee: Coins { theta_wei: U256::ZERO, tfuel_wei: U256::from(fee) },
            inputs: vec![TxInput {
                address: Address::repeat_byte(0x0a),
                coins: Coins { theta_wei: U256::ZERO, tfuel_wei: U256::from(value) },
                sequence: 1,
                signature,
            }],
            outputs: vec![TxOutput {
                address: Address::repeat_byte(0x0b),
                coins: Coins { theta_wei: U256::ZERO, tfuel_wei: U256::from(value - fee) },
            }],
        }),
        receipt: None,
    }
}

/// Builds a transaction of a kind without a typed payload.
pub const fn opaque(hash: B256, kind: TxType) -> Transaction {
    let tx = NativeTx::Opaque(OpaqueTx { kind: TxKind::Known(kind) });
    Transaction { hash, tx, receipt: None }
}
