#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod quantity;

mod error;
pub use error::{NativeClientError, NativeClientResult, NotFoundKind};

mod receipt;
pub use receipt::{Log, Receipt};

mod tx;
pub use tx::{
    Coins, NativeTx, OpaqueTx, SendTx, SmartContractTx, Transaction, TransactionResult, TxInput,
    TxKind, TxOutput, TxStatus, TxType,
};

mod block;
pub use block::{Block, BlockMeta, BlockPayload, TxPayload};

mod client;
#[cfg(any(test, feature = "test-utils"))]
pub use client::MockNativeClient;
pub use client::{NativeClient, ThetaClient, ThetaStatus};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
