use crate::constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_RECEIPTS, EMPTY_ROOT_HASH, EMPTY_TRANSACTIONS};
use alloy_primitives::{keccak256, Address, BlockHash, BlockNumber, Bloom, Bytes, B256, B64, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable};
use derive_more::{AsRef, Deref};
use serde::{Deserialize, Serialize};

/// Block header.
///
/// During processing the header is assembled incrementally: the receipts root,
/// logs bloom and state root are only known after execution. Once every field
/// is final the header is sealed with [`Header::seal_slow`] and becomes
/// immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// The Keccak 256-bit hash of the parent block's header.
    pub parent_hash: B256,
    /// The Keccak 256-bit hash of the ommers list portion of this block.
    pub ommers_hash: B256,
    /// The 160-bit address to which all fees collected from the successful mining of this block
    /// are transferred.
    pub beneficiary: Address,
    /// The Keccak 256-bit hash of the root node of the state trie, after all transactions and
    /// rewards are applied.
    pub state_root: B256,
    /// The Keccak 256-bit hash of the root node of the trie structure populated with each
    /// transaction in the transactions list portion of the block.
    pub transactions_root: B256,
    /// The Keccak 256-bit hash of the root node of the trie structure populated with the receipts
    /// of each transaction in the transactions list portion of the block.
    pub receipts_root: B256,
    /// The bloom filter composed from indexable information (logger address and log topics)
    /// contained in each log entry from the receipts of each transaction in the transactions list.
    pub logs_bloom: Bloom,
    /// A scalar value corresponding to the difficulty level of this block.
    pub difficulty: U256,
    /// A scalar value equal to the number of ancestor blocks. The genesis block has a number of
    /// zero.
    pub number: BlockNumber,
    /// A scalar value equal to the current limit of gas expenditure per block.
    pub gas_limit: u64,
    /// A scalar value equal to the total gas used in transactions in this block.
    pub gas_used: u64,
    /// A scalar value equal to the reasonable output of Unix's time() at this block's inception.
    pub timestamp: u64,
    /// An arbitrary byte array containing data relevant to this block.
    pub extra_data: Bytes,
    /// A 256-bit hash which, combined with the nonce, proves that a sufficient amount of
    /// computation has been carried out on this block.
    pub mix_hash: B256,
    /// A 64-bit value which, combined with the mix hash, proves that a sufficient amount of
    /// computation has been carried out on this block.
    pub nonce: B64,
    /// A scalar representing EIP-1559 base fee which can move up or down each block according
    /// to a formula which is a function of gas used in parent block and gas target of parent
    /// block. Not present before London.
    pub base_fee_per_gas: Option<u64>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            parent_hash: B256::ZERO,
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            beneficiary: Address::ZERO,
            state_root: EMPTY_ROOT_HASH,
            transactions_root: EMPTY_TRANSACTIONS,
            receipts_root: EMPTY_RECEIPTS,
            logs_bloom: Bloom::ZERO,
            difficulty: U256::ZERO,
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: B256::ZERO,
            nonce: B64::ZERO,
            base_fee_per_gas: None,
        }
    }
}

impl Header {
    /// Heavy function that will calculate the hash of the fully encoded header.
    pub fn hash_slow(&self) -> BlockHash {
        keccak256(alloy_rlp::encode(self))
    }

    /// Seal the header with its hash, locking all fields.
    pub fn seal_slow(self) -> SealedHeader {
        let hash = self.hash_slow();
        SealedHeader { header: self, hash }
    }

    /// Seal the header with a known hash.
    ///
    /// WARNING: the hash is not verified against the header fields.
    pub const fn seal(self, hash: BlockHash) -> SealedHeader {
        SealedHeader { header: self, hash }
    }

    fn rlp_payload_length(&self) -> usize {
        let mut length = 0;
        length += self.parent_hash.length();
        length += self.ommers_hash.length();
        length += self.beneficiary.length();
        length += self.state_root.length();
        length += self.transactions_root.length();
        length += self.receipts_root.length();
        length += self.logs_bloom.length();
        length += self.difficulty.length();
        length += self.number.length();
        length += self.gas_limit.length();
        length += self.gas_used.length();
        length += self.timestamp.length();
        length += self.extra_data.length();
        length += self.mix_hash.length();
        length += self.nonce.length();
        if let Some(base_fee) = self.base_fee_per_gas {
            length += base_fee.length();
        }
        length
    }
}

impl Encodable for Header {
    fn encode(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.parent_hash.encode(out);
        self.ommers_hash.encode(out);
        self.beneficiary.encode(out);
        self.state_root.encode(out);
        self.transactions_root.encode(out);
        self.receipts_root.encode(out);
        self.logs_bloom.encode(out);
        self.difficulty.encode(out);
        self.number.encode(out);
        self.gas_limit.encode(out);
        self.gas_used.encode(out);
        self.timestamp.encode(out);
        self.extra_data.encode(out);
        self.mix_hash.encode(out);
        self.nonce.encode(out);
        // The base fee is a trailing field: pre-London headers omit it entirely.
        if let Some(base_fee) = self.base_fee_per_gas {
            base_fee.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        payload_length + length_of_length(payload_length) + 1
    }
}

impl Decodable for Header {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let rlp_head = alloy_rlp::Header::decode(buf)?;
        if !rlp_head.list {
            return Err(alloy_rlp::Error::UnexpectedString)
        }
        let started_len = buf.len();
        let mut this = Self {
            parent_hash: Decodable::decode(buf)?,
            ommers_hash: Decodable::decode(buf)?,
            beneficiary: Decodable::decode(buf)?,
            state_root: Decodable::decode(buf)?,
            transactions_root: Decodable::decode(buf)?,
            receipts_root: Decodable::decode(buf)?,
            logs_bloom: Decodable::decode(buf)?,
            difficulty: Decodable::decode(buf)?,
            number: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            gas_used: Decodable::decode(buf)?,
            timestamp: Decodable::decode(buf)?,
            extra_data: Decodable::decode(buf)?,
            mix_hash: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            base_fee_per_gas: None,
        };
        if started_len - buf.len() < rlp_head.payload_length {
            this.base_fee_per_gas = Some(Decodable::decode(buf)?);
        }
        let consumed = started_len - buf.len();
        if consumed != rlp_head.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: rlp_head.payload_length,
                got: consumed,
            })
        }
        Ok(this)
    }
}

/// A [`Header`] that is sealed at a precalculated hash, use [`SealedHeader::unseal`] if you want
/// to modify the header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref, Serialize, Deserialize)]
pub struct SealedHeader {
    /// Locked header hash.
    hash: BlockHash,
    /// Locked header fields.
    #[as_ref]
    #[deref]
    header: Header,
}

impl SealedHeader {
    /// Creates the sealed header with the corresponding block hash.
    ///
    /// WARNING: the hash is not verified against the header fields.
    pub const fn new(header: Header, hash: BlockHash) -> Self {
        Self { hash, header }
    }

    /// Returns the sealed header fields.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the header hash.
    pub const fn hash(&self) -> BlockHash {
        self.hash
    }

    /// Extract the raw header, which can be modified again.
    pub fn unseal(self) -> Header {
        self.header
    }

    /// This is the inverse of [`Header::seal_slow`]: returns the raw header and hash.
    pub fn split(self) -> (Header, BlockHash) {
        (self.header, self.hash)
    }
}

impl Default for SealedHeader {
    fn default() -> Self {
        Header::default().seal_slow()
    }
}

impl Encodable for SealedHeader {
    fn encode(&self, out: &mut dyn BufMut) {
        self.header.encode(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealing_is_deterministic() {
        let header = Header { number: 100, gas_limit: 8_000_000, ..Default::default() };
        let sealed = header.clone().seal_slow();
        assert_eq!(sealed.hash(), header.hash_slow());
        assert_eq!(sealed.header(), &header);
    }

    #[test]
    fn hash_depends_on_every_finalized_field() {
        let base = Header { number: 1, ..Default::default() };
        let mut with_receipts = base.clone();
        with_receipts.receipts_root = B256::repeat_byte(0x11);
        let mut with_state = base.clone();
        with_state.state_root = B256::repeat_byte(0x22);
        let mut with_nonce = base.clone();
        with_nonce.nonce = B64::with_last_byte(1);

        let hashes =
            [base.hash_slow(), with_receipts.hash_slow(), with_state.hash_slow(), with_nonce.hash_slow()];
        for (i, a) in hashes.iter().enumerate() {
            for b in hashes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn header_rlp_roundtrip() {
        let header = Header {
            parent_hash: B256::repeat_byte(0xab),
            beneficiary: Address::repeat_byte(0x42),
            difficulty: U256::from(131_072u64),
            number: 1_920_000,
            gas_limit: 4_712_388,
            gas_used: 21_000,
            timestamp: 1_469_020_840,
            extra_data: Bytes::from_static(b"dao-hard-fork"),
            nonce: B64::with_last_byte(0x39),
            ..Default::default()
        };
        let encoded = alloy_rlp::encode(&header);
        assert_eq!(encoded.len(), header.length());
        let decoded = Header::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn header_rlp_roundtrip_with_base_fee() {
        let header = Header {
            number: 12_965_000,
            base_fee_per_gas: Some(1_000_000_000),
            ..Default::default()
        };
        let encoded = alloy_rlp::encode(&header);
        let decoded = Header::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded.base_fee_per_gas, Some(1_000_000_000));
        assert_eq!(decoded, header);
        // The trailing field must change the hash.
        assert_ne!(header.hash_slow(), Header { base_fee_per_gas: None, ..header }.hash_slow());
    }
}
