//! Native transaction to Ethereum transaction translation.

use alloy_primitives::{B256, U256};
use theta_native::{NativeClient, NativeTx, SendTx, SmartContractTx, TransactionResult};

use crate::{EthRpcError, TransactionRecord};

/// Length of a packed `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// The components of a packed signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rsv {
    /// Bytes `0..32`.
    pub r: B256,
    /// Bytes `32..64`.
    pub s: B256,
    /// Byte `64`.
    pub v: u64,
}

impl TryFrom<&[u8]> for Rsv {
    type Error = EthRpcError;

    fn try_from(signature: &[u8]) -> Result<Self, Self::Error> {
        if signature.len() < SIGNATURE_LENGTH {
            return Err(EthRpcError::InvalidSignature(signature.len()));
        }
        Ok(Self {
            r: B256::from_slice(&signature[0..32]),
            s: B256::from_slice(&signature[32..64]),
            v: signature[64].into(),
        })
    }
}

/// Maps native transaction lookups onto Ethereum transaction records.
#[derive(Debug)]
pub struct TransactionTranslator<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C> TransactionTranslator<'a, C>
where
    C: NativeClient + ?Sized,
{
    /// Creates a translator resolving transaction indices through `client`.
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Translates a lookup result, including the transaction's index in its block.
    ///
    /// A transaction that is not included in a block yet has no index.
    pub async fn translate(
        &self,
        result: &TransactionResult,
    ) -> Result<TransactionRecord, EthRpcError> {
        let mut record = Self::map(result)?;
        if let Some(block_hash) = result.included_in() {
            record.transaction_index = Some(self.index_of(block_hash, result.hash).await?);
        }
        Ok(record)
    }

    /// Maps the payload of a lookup result, leaving the transaction index unset.
    pub fn map(result: &TransactionResult) -> Result<TransactionRecord, EthRpcError> {
        let record = TransactionRecord {
            block_hash: result.block_hash,
            block_number: result.block_height,
            hash: result.hash,
            ..Default::default()
        };
        match &result.tx {
            Some(NativeTx::Send(tx)) => Self::map_send(record, tx),
            Some(NativeTx::SmartContract(tx)) => Self::map_smart_contract(record, tx),
            Some(NativeTx::Opaque(_)) | None => Ok(record),
        }
    }

    fn map_send(record: TransactionRecord, tx: &SendTx) -> Result<TransactionRecord, EthRpcError> {
        let (Some(input), Some(output)) = (tx.inputs.first(), tx.outputs.first()) else {
            return Err(EthRpcError::MalformedTransaction(format!(
                "send transaction {} has {} inputs and {} outputs",
                record.hash,
                tx.inputs.len(),
                tx.outputs.len()
            )));
        };
        let rsv = Rsv::try_from(&input.signature[..])?;
        Ok(TransactionRecord {
            from: input.address,
            to: output.address,
            gas: tx.fee.tfuel_wei,
            value: input.coins.tfuel_wei,
            nonce: input.sequence,
            v: rsv.v,
            r: rsv.r,
            s: rsv.s,
            ..record
        })
    }

    fn map_smart_contract(
        record: TransactionRecord,
        tx: &SmartContractTx,
    ) -> Result<TransactionRecord, EthRpcError> {
        let rsv = Rsv::try_from(&tx.from.signature[..])?;
        Ok(TransactionRecord {
            from: tx.from.address,
            to: tx.to.address,
            gas: U256::from(tx.gas_limit),
            gas_price: tx.gas_price,
            value: tx.from.coins.tfuel_wei,
            nonce: tx.from.sequence,
            input: tx.data.clone(),
            v: rsv.v,
            r: rsv.r,
            s: rsv.s,
            ..record
        })
    }

    /// Finds the position of a transaction in the block with the given hash.
    pub async fn index_of(&self, block_hash: B256, tx_hash: B256) -> Result<u64, EthRpcError> {
        let block = self.client.block_by_hash(block_hash).await?;
        block.position_of(tx_hash).map(|index| index as u64).ok_or_else(|| {
            EthRpcError::NotFound(format!("transaction {tx_hash} in block {block_hash}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes};
    use theta_native::{
        MockNativeClient, TxStatus, TxType,
        test_utils::{MemoryChain, block, block_hash, contract_call, opaque, transfer},
    };

    fn signature() -> Bytes {
        let mut raw = vec![0u8; 32];
        raw.extend([0x11; 32]);
        raw.push(5);
        raw.into()
    }

    fn result_of(tx: &theta_native::Transaction, block_height: u64) -> TransactionResult {
        TransactionResult {
            block_hash: block_hash(block_height),
            block_height,
            status: TxStatus::Finalized,
            hash: tx.hash,
            tx: Some(tx.tx.clone()),
            receipt: tx.receipt.clone(),
        }
    }

    #[test]
    fn test_rsv_split() {
        let rsv = Rsv::try_from(&signature()[..]).unwrap();
        assert_eq!(rsv, Rsv { r: B256::ZERO, s: B256::repeat_byte(0x11), v: 5 });
    }

    #[test]
    fn test_short_signature_is_rejected() {
        let err = Rsv::try_from(&[0u8; 64][..]).unwrap_err();
        assert!(matches!(err, EthRpcError::InvalidSignature(64)));

        let err = Rsv::try_from(&[0u8; 0][..]).unwrap_err();
        assert!(matches!(err, EthRpcError::InvalidSignature(0)));
    }

    #[test]
    fn test_map_send() {
        let tx = transfer(B256::repeat_byte(1), 1_000, 5_000, signature());
        let record = TransactionTranslator::<MemoryChain>::map(&result_of(&tx, 4)).unwrap();

        assert_eq!(record.hash, B256::repeat_byte(1));
        assert_eq!(record.block_hash, block_hash(4));
        assert_eq!(record.block_number, 4);
        assert_eq!(record.from, Address::repeat_byte(0x0a));
        assert_eq!(record.to, Address::repeat_byte(0x0b));
        assert_eq!(record.gas, U256::from(1_000));
        assert_eq!(record.value, U256::from(5_000));
        assert_eq!(record.gas_price, U256::ZERO);
        assert_eq!(record.nonce, 1);
        assert_eq!(record.s, B256::repeat_byte(0x11));
        assert_eq!(record.v, 5);
        assert_eq!(record.transaction_index, None);
    }

    #[test]
    fn test_map_smart_contract() {
        let mut tx = contract_call(B256::repeat_byte(2), Address::repeat_byte(0xc0), None);
        if let NativeTx::SmartContract(call) = &mut tx.tx {
            call.from.signature = signature();
            call.from.coins.tfuel_wei = U256::from(42);
            call.data = Bytes::from_static(&[0xa9, 0x05]);
        }
        let record = TransactionTranslator::<MemoryChain>::map(&result_of(&tx, 4)).unwrap();

        assert_eq!(record.from, Address::repeat_byte(0x01));
        assert_eq!(record.to, Address::repeat_byte(0xc0));
        assert_eq!(record.gas, U256::from(100_000));
        assert_eq!(record.gas_price, U256::from(4_000_000_000_000u64));
        assert_eq!(record.value, U256::from(42));
        assert_eq!(record.input, Bytes::from_static(&[0xa9, 0x05]));
        assert_eq!(record.v, 5);
    }

    #[test]
    fn test_map_opaque_sets_only_location() {
        let tx = opaque(B256::repeat_byte(3), TxType::DepositStake);
        let record = TransactionTranslator::<MemoryChain>::map(&result_of(&tx, 9)).unwrap();

        assert_eq!(
            record,
            TransactionRecord {
                block_hash: block_hash(9),
                block_number: 9,
                hash: B256::repeat_byte(3),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_map_send_without_outputs() {
        let mut tx = transfer(B256::repeat_byte(1), 1, 2, signature());
        if let NativeTx::Send(send) = &mut tx.tx {
            send.outputs.clear();
        }
        let err = TransactionTranslator::<MemoryChain>::map(&result_of(&tx, 1)).unwrap_err();
        assert!(matches!(err, EthRpcError::MalformedTransaction(_)));
    }

    #[test]
    fn test_map_unsigned_send() {
        let tx = transfer(B256::repeat_byte(1), 1, 2, Bytes::new());
        let err = TransactionTranslator::<MemoryChain>::map(&result_of(&tx, 1)).unwrap_err();
        assert!(matches!(err, EthRpcError::InvalidSignature(0)));
    }

    #[tokio::test]
    async fn test_translate_resolves_index() {
        let tx = transfer(B256::repeat_byte(7), 1, 2, signature());
        let chain = MemoryChain::new().with_block(block(
            12,
            vec![opaque(B256::repeat_byte(6), TxType::Coinbase), tx.clone()],
        ));

        let record = TransactionTranslator::new(&chain).translate(&result_of(&tx, 12)).await.unwrap();

        assert_eq!(record.transaction_index, Some(1));
    }

    #[tokio::test]
    async fn test_translate_pending_skips_index_lookup() {
        let mut client = MockNativeClient::new();
        client.expect_block_by_hash().never();

        let mut result = result_of(&opaque(B256::repeat_byte(8), TxType::Coinbase), 0);
        result.block_hash = B256::ZERO;
        result.status = TxStatus::Pending;

        let record = TransactionTranslator::new(&client).translate(&result).await.unwrap();
        assert_eq!(record.transaction_index, None);
    }

    #[tokio::test]
    async fn test_index_of_missing_transaction() {
        let chain = MemoryChain::new().with_block(block(3, vec![]));

        let err = TransactionTranslator::new(&chain)
            .index_of(block_hash(3), B256::repeat_byte(1))
            .await
            .unwrap_err();

        assert!(matches!(err, EthRpcError::NotFound(_)));
    }
}
