//! Helper functions for deriving the Merkle roots and bloom carried in a block
//! header.

use crate::{constants::EMPTY_OMMER_ROOT_HASH, Header, Receipt, Transaction};
use alloy_primitives::{keccak256, Bloom, B256};
use alloy_trie::{HashBuilder, Nibbles};

/// Adjusts the index of an item for RLP encoding.
pub const fn adjust_index_for_rlp(i: usize, len: usize) -> usize {
    if i > 0x7f {
        i
    } else if i == 0x7f || i + 1 == len {
        0
    } else {
        i + 1
    }
}

/// Computes the ordered trie root of the given items, keyed by their
/// RLP-encoded index, with a custom value encoder.
///
/// The trie is built in an ephemeral hash builder; nothing is persisted.
pub fn ordered_trie_root_with_encoder<T, F>(items: &[T], mut encode: F) -> B256
where
    F: FnMut(&T, &mut Vec<u8>),
{
    if items.is_empty() {
        return alloy_trie::EMPTY_ROOT_HASH;
    }

    let mut value_buffer = Vec::new();

    let mut hb = HashBuilder::default();
    let items_len = items.len();
    for i in 0..items_len {
        let index = adjust_index_for_rlp(i, items_len);

        let index_buffer = alloy_rlp::encode_fixed_size(&index);

        value_buffer.clear();
        encode(&items[index], &mut value_buffer);

        hb.add_leaf(Nibbles::unpack(&index_buffer), &value_buffer);
    }

    hb.root()
}

/// Calculates the receipts root of a block.
///
/// `eip658` selects the fork-gated receipt encoding: a status byte from
/// Byzantium onward, the post-transaction state root before it.
pub fn calculate_receipt_root(receipts: &[Receipt], eip658: bool) -> B256 {
    ordered_trie_root_with_encoder(receipts, |receipt, buf| receipt.encode_for_trie(eip658, buf))
}

/// Calculates the transactions root of a block body.
///
/// Transaction payloads are already in their canonical encoded form, so they
/// are inserted into the trie verbatim.
pub fn calculate_transaction_root(transactions: &[Transaction]) -> B256 {
    ordered_trie_root_with_encoder(transactions, |tx, buf| buf.extend_from_slice(&tx.payload))
}

/// Calculates the root hash of the ommer headers.
pub fn calculate_ommers_root(ommers: &[Header]) -> B256 {
    if ommers.is_empty() {
        return EMPTY_OMMER_ROOT_HASH
    }
    let mut ommers_rlp = Vec::new();
    alloy_rlp::encode_list(ommers, &mut ommers_rlp);
    keccak256(ommers_rlp)
}

/// Folds the blooms of the given receipts into the block's logs bloom.
pub fn calculate_logs_bloom(receipts: &[Receipt]) -> Bloom {
    receipts.iter().fold(Bloom::ZERO, |bloom, receipt| bloom | receipt.bloom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EMPTY_RECEIPTS, EMPTY_ROOT_HASH, EMPTY_TRANSACTIONS};
    use alloy_primitives::{Address, Bytes, Log, LogData, TxHash};

    fn receipts(n: usize) -> Vec<Receipt> {
        (0..n)
            .map(|i| Receipt {
                tx_hash: TxHash::repeat_byte(i as u8),
                success: i % 2 == 0,
                post_state: Some(B256::repeat_byte(i as u8)),
                cumulative_gas_used: 21_000 * (i as u64 + 1),
                logs: vec![Log {
                    address: Address::repeat_byte(i as u8),
                    data: LogData::new_unchecked(vec![B256::repeat_byte(0x40 + i as u8)], Default::default()),
                }],
                bloom: Bloom::repeat_byte(1u8 << (i % 8)),
                block_hash: None,
            })
            .collect()
    }

    #[test]
    fn empty_receipts_yield_empty_trie_hash() {
        assert_eq!(calculate_receipt_root(&[], true), EMPTY_RECEIPTS);
        assert_eq!(calculate_receipt_root(&[], false), EMPTY_RECEIPTS);
        assert_eq!(alloy_trie::EMPTY_ROOT_HASH, EMPTY_ROOT_HASH);
    }

    #[test]
    fn receipt_root_is_a_function_of_receipts_and_mode() {
        let set = receipts(3);
        assert_eq!(calculate_receipt_root(&set, true), calculate_receipt_root(&set.clone(), true));
        // The encoding mode flips the root for the same receipts.
        assert_ne!(calculate_receipt_root(&set, true), calculate_receipt_root(&set, false));
    }

    #[test]
    fn receipt_root_is_position_sensitive() {
        let set = receipts(3);
        let mut reversed = set.clone();
        reversed.reverse();
        assert_ne!(calculate_receipt_root(&set, true), calculate_receipt_root(&reversed, true));
    }

    #[test]
    fn receipt_root_ignores_lookup_metadata() {
        let set = receipts(2);
        let mut stamped = set.clone();
        for receipt in &mut stamped {
            receipt.block_hash = Some(B256::repeat_byte(0xbb));
        }
        assert_eq!(calculate_receipt_root(&set, true), calculate_receipt_root(&stamped, true));
    }

    #[test]
    fn logs_bloom_is_the_or_of_receipt_blooms() {
        let set = receipts(4);
        let bloom = calculate_logs_bloom(&set);
        for receipt in &set {
            assert_eq!(bloom | receipt.bloom, bloom);
        }
        assert_eq!(calculate_logs_bloom(&[]), Bloom::ZERO);
    }

    #[test]
    fn empty_ommers_root_is_the_empty_list_hash() {
        assert_eq!(calculate_ommers_root(&[]), EMPTY_OMMER_ROOT_HASH);
        let ommers = vec![Header::default()];
        assert_ne!(calculate_ommers_root(&ommers), EMPTY_OMMER_ROOT_HASH);
    }

    #[test]
    fn transaction_root_of_empty_body_is_empty_trie_hash() {
        assert_eq!(calculate_transaction_root(&[]), EMPTY_TRANSACTIONS);
        let txs = vec![Transaction::new(Bytes::from_static(&[0xc0]))];
        assert_ne!(calculate_transaction_root(&txs), EMPTY_TRANSACTIONS);
    }

    #[test]
    fn index_adjustment_matches_canonical_ordering() {
        // Single item: index 0 stays 0.
        assert_eq!(adjust_index_for_rlp(0, 1), 0);
        // Short lists rotate the first position to the end.
        assert_eq!(adjust_index_for_rlp(0, 3), 1);
        assert_eq!(adjust_index_for_rlp(2, 3), 0);
        // Large indices are untouched.
        assert_eq!(adjust_index_for_rlp(0x80, 0x100), 0x80);
    }
}
