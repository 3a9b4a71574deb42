use crate::{Header, SealedHeader, Transaction};
use alloy_primitives::{BlockHash, BlockNumber};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

/// Ethereum full block: a header, the transaction sequence and the ommer
/// headers included by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header.
    pub header: Header,
    /// Transactions in this block, in execution order.
    pub body: Vec<Transaction>,
    /// Ommer headers.
    pub ommers: Vec<Header>,
}

impl Block {
    /// Seals the block by computing the header hash.
    pub fn seal_slow(self) -> SealedBlock {
        SealedBlock { header: self.header.seal_slow(), body: self.body, ommers: self.ommers }
    }

    /// Seals the block with a known header hash.
    ///
    /// WARNING: the hash is not verified against the header fields.
    pub fn seal(self, hash: BlockHash) -> SealedBlock {
        SealedBlock { header: self.header.seal(hash), body: self.body, ommers: self.ommers }
    }
}

/// Sealed block composed of the block's sealed header and unsealed body.
#[derive(Debug, Clone, PartialEq, Eq, Deref, Serialize, Deserialize)]
pub struct SealedBlock {
    /// Locked block header.
    #[deref]
    pub header: SealedHeader,
    /// Transactions, in execution order.
    pub body: Vec<Transaction>,
    /// Ommer headers.
    pub ommers: Vec<Header>,
}

impl SealedBlock {
    /// Creates a sealed block from its parts.
    pub const fn new(header: SealedHeader, body: Vec<Transaction>, ommers: Vec<Header>) -> Self {
        Self { header, body, ommers }
    }

    /// Returns the block hash.
    pub const fn hash(&self) -> BlockHash {
        self.header.hash()
    }

    /// Returns the block number.
    pub fn number(&self) -> BlockNumber {
        self.header.number
    }

    /// True for the genesis block, which carries its own pre-seeded state.
    pub fn is_genesis(&self) -> bool {
        self.header.number == 0
    }

    /// Unseal the block, making the header mutable again.
    pub fn unseal(self) -> Block {
        Block { header: self.header.unseal(), body: self.body, ommers: self.ommers }
    }
}

impl Default for SealedBlock {
    fn default() -> Self {
        Block::default().seal_slow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;

    #[test]
    fn seal_unseal_roundtrip() {
        let block = Block {
            header: Header { number: 7, ..Default::default() },
            body: vec![Transaction::new(Bytes::from_static(&[0x01]))],
            ommers: vec![Header { number: 6, ..Default::default() }],
        };
        let sealed = block.clone().seal_slow();
        assert_eq!(sealed.number(), 7);
        assert!(!sealed.is_genesis());
        assert_eq!(sealed.hash(), block.header.hash_slow());
        assert_eq!(sealed.unseal(), block);
    }
}
