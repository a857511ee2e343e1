//! Log filtering over fetched blocks.

use alloy_primitives::{Address, B256};
use theta_native::{Block, NativeTx, Receipt};

use crate::{LogRecord, Metrics};

/// Selects the receipt logs of smart contract transactions matching an address and a topic set.
///
/// Topics are matched as a flat set, regardless of their position in the log: a log is
/// emitted once for every pair of equal log topic and filter topic. A log carrying two filter
/// topics is therefore emitted twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogMatcher {
    address: Option<Address>,
    topics: Vec<B256>,
}

impl LogMatcher {
    /// Creates a matcher. A zero address, like no address, matches every contract, and an empty
    /// topic set matches every log.
    pub fn new(address: Option<Address>, topics: Vec<B256>) -> Self {
        Self { address: address.filter(|address| !address.is_zero()), topics }
    }

    /// Collects the matching logs of the given blocks, in block, transaction and log order.
    pub fn collect(&self, blocks: &[Block]) -> Vec<LogRecord> {
        let mut records = Vec::new();
        for block in blocks {
            for (tx_index, tx) in block.transactions.iter().enumerate() {
                match &tx.tx {
                    NativeTx::SmartContract(_) => {}
                    NativeTx::Send(_) | NativeTx::Opaque(_) => continue,
                }

                let Some(receipt) = &tx.receipt else {
                    metrics::counter!(Metrics::MISSING_RECEIPTS_TOTAL).increment(1);
                    error!(
                        target: "eth_rpc",
                        block = block.height(),
                        tx_hash = %tx.hash,
                        "Smart contract transaction has no receipt, skipping"
                    );
                    continue;
                };

                if self.address.is_some_and(|address| address != receipt.contract_address) {
                    continue;
                }

                let record = |log_index: usize| {
                    Self::record(block, tx_index as u64, tx.hash, receipt, log_index)
                };
                for (log_index, log) in receipt.logs.iter().enumerate() {
                    if self.topics.is_empty() {
                        records.push(record(log_index));
                        continue;
                    }
                    for topic in &log.topics {
                        for wanted in &self.topics {
                            if topic == wanted {
                                records.push(record(log_index));
                            }
                        }
                    }
                }
            }
        }
        records
    }

    fn record(
        block: &Block,
        transaction_index: u64,
        transaction_hash: B256,
        receipt: &Receipt,
        log_index: usize,
    ) -> LogRecord {
        let log = &receipt.logs[log_index];
        LogRecord {
            removed: false,
            log_index: log_index as u64,
            transaction_index,
            transaction_hash,
            block_hash: block.hash(),
            block_number: block.height(),
            address: receipt.contract_address,
            data: log.data.clone(),
            topics: log.topics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use theta_native::{
        TxType,
        test_utils::{block, block_hash, contract_call, log, opaque, transfer},
    };

    const CONTRACT: Address = Address::repeat_byte(0xc0);
    const OTHER: Address = Address::repeat_byte(0xc1);

    fn topic(byte: u8) -> B256 {
        B256::with_last_byte(byte)
    }

    fn tx_hash(byte: u8) -> B256 {
        B256::repeat_byte(byte)
    }

    fn blocks() -> Vec<Block> {
        vec![
            block(
                7,
                vec![
                    opaque(tx_hash(0x10), TxType::Coinbase),
                    contract_call(
                        tx_hash(0x11),
                        CONTRACT,
                        Some(vec![
                            log(CONTRACT, vec![topic(1), topic(2)], &[0xaa]),
                            log(CONTRACT, vec![topic(3)], &[0xbb]),
                        ]),
                    ),
                    transfer(tx_hash(0x12), 10, 100, Default::default()),
                ],
            ),
            block(
                8,
                vec![contract_call(
                    tx_hash(0x13),
                    OTHER,
                    Some(vec![log(OTHER, vec![topic(2)], &[0xcc])]),
                )],
            ),
        ]
    }

    #[test]
    fn test_no_filter_emits_every_log() {
        let records = LogMatcher::new(None, vec![]).collect(&blocks());

        assert_eq!(records.len(), 3);
        let first = &records[0];
        assert!(!first.removed);
        assert_eq!(first.log_index, 0);
        assert_eq!(first.transaction_index, 1);
        assert_eq!(first.transaction_hash, tx_hash(0x11));
        assert_eq!(first.block_hash, block_hash(7));
        assert_eq!(first.block_number, 7);
        assert_eq!(first.address, CONTRACT);
        assert_eq!(first.data, Bytes::from_static(&[0xaa]));
        assert_eq!(first.topics, vec![topic(1), topic(2)]);

        assert_eq!(records[1].log_index, 1);
        assert_eq!(records[2].transaction_index, 0);
        assert_eq!(records[2].block_number, 8);
    }

    #[test]
    fn test_address_filter() {
        let records = LogMatcher::new(Some(OTHER), vec![]).collect(&blocks());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, OTHER);
    }

    #[test]
    fn test_zero_address_is_no_filter() {
        let unfiltered = LogMatcher::new(None, vec![]).collect(&blocks());
        let zero = LogMatcher::new(Some(Address::ZERO), vec![]).collect(&blocks());
        assert_eq!(zero, unfiltered);
    }

    #[test]
    fn test_topics_match_any_position() {
        let records = LogMatcher::new(None, vec![topic(2)]).collect(&blocks());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].transaction_hash, tx_hash(0x11));
        assert_eq!(records[1].transaction_hash, tx_hash(0x13));
    }

    #[test]
    fn test_log_matching_two_topics_is_emitted_twice() {
        let records = LogMatcher::new(Some(CONTRACT), vec![topic(1), topic(2)]).collect(&blocks());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
        assert_eq!(records[0].log_index, 0);
    }

    #[test]
    fn test_unmatched_topic() {
        assert!(LogMatcher::new(None, vec![topic(9)]).collect(&blocks()).is_empty());
    }

    #[test]
    fn test_undecodable_neighbours_keep_contract_logs() {
        let payload: theta_native::BlockPayload = serde_json::from_value(serde_json::json!({
            "height": "21",
            "hash": "0x0000000000000000000000000000000000000000000000000000000000000015",
            "transactions": [
                {
                    "raw": { "something": "new" },
                    "type": 12,
                    "hash": "0x00000000000000000000000000000000000000000000000000000000000000a0",
                    "receipt": null
                },
                {
                    "raw": { "fee": "garbage" },
                    "type": 2,
                    "hash": "0x00000000000000000000000000000000000000000000000000000000000000a1",
                    "receipt": null
                },
                {
                    "raw": {
                        "from": { "address": "0x2e833968e5bb786ae419c4d13189fb081cc43bab" },
                        "to": { "address": "0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0" }
                    },
                    "type": 7,
                    "hash": "0x00000000000000000000000000000000000000000000000000000000000000a2",
                    "receipt": {
                        "Logs": [{
                            "address": "0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0",
                            "topics": [
                                "0x0000000000000000000000000000000000000000000000000000000000000001"
                            ],
                            "data": "0xaa"
                        }],
                        "ContractAddress": "0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0"
                    }
                }
            ]
        }))
        .unwrap();
        let blocks = vec![payload.into_block().unwrap()];

        let records = LogMatcher::new(Some(CONTRACT), vec![topic(1)]).collect(&blocks);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_index, 2);
        assert_eq!(records[0].block_number, 21);
        assert_eq!(records[0].data, Bytes::from_static(&[0xaa]));
    }

    #[test]
    fn test_transaction_without_receipt_is_skipped() {
        let blocks = vec![block(
            3,
            vec![
                contract_call(tx_hash(0x20), CONTRACT, None),
                contract_call(
                    tx_hash(0x21),
                    CONTRACT,
                    Some(vec![log(CONTRACT, vec![topic(1)], &[])]),
                ),
            ],
        )];

        let records = LogMatcher::new(None, vec![]).collect(&blocks);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_hash, tx_hash(0x21));
        assert_eq!(records[0].transaction_index, 1);
    }
}
