use alloy_primitives::{BlockHash, Bloom, Log, TxHash, B256};
use alloy_rlp::{BufMut, Encodable};
use serde::{Deserialize, Serialize};

/// Receipt containing the result of a transaction's execution.
///
/// The consensus encoding is fork dependent: from Byzantium onward
/// ([EIP-658](https://eips.ethereum.org/EIPS/eip-658)) the first field is the
/// status code, before it the intermediate state root. Both are carried so the
/// caller can pick the encoding for the receipt's block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash of the transaction this receipt belongs to.
    pub tx_hash: TxHash,
    /// Whether the transaction executed successfully.
    ///
    /// This is the `statusCode` serialized from Byzantium onward.
    pub success: bool,
    /// Root of the state trie after this transaction, serialized before Byzantium.
    pub post_state: Option<B256>,
    /// Gas used by the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    /// Logs emitted by the transaction.
    pub logs: Vec<Log>,
    /// Bloom filter over the log addresses and topics.
    pub bloom: Bloom,
    /// Hash of the block this receipt was sealed into.
    ///
    /// Lookup metadata, stamped before persistence; not part of the consensus
    /// encoding.
    pub block_hash: Option<BlockHash>,
}

impl Receipt {
    /// Recalculates the bloom filter from the receipt's logs.
    pub fn bloom_slow(&self) -> Bloom {
        alloy_primitives::logs_bloom(self.logs.iter())
    }

    /// Returns the length of the RLP-encoded receipt fields, without an RLP header.
    pub fn rlp_encoded_fields_length(&self, eip658: bool) -> usize {
        let state_field = if eip658 {
            self.success.length()
        } else {
            self.post_state.unwrap_or_default().length()
        };
        state_field + self.cumulative_gas_used.length() + self.bloom.length() + self.logs.length()
    }

    /// RLP-encodes the receipt fields without an RLP header.
    pub fn rlp_encode_fields(&self, eip658: bool, out: &mut dyn BufMut) {
        if eip658 {
            self.success.encode(out);
        } else {
            self.post_state.unwrap_or_default().encode(out);
        }
        self.cumulative_gas_used.encode(out);
        self.bloom.encode(out);
        self.logs.encode(out);
    }

    /// Encodes the receipt the way it is inserted into the receipt trie.
    pub fn encode_for_trie(&self, eip658: bool, out: &mut dyn BufMut) {
        alloy_rlp::Header { list: true, payload_length: self.rlp_encoded_fields_length(eip658) }
            .encode(out);
        self.rlp_encode_fields(eip658, out);
    }
}
