use alloy_primitives::{keccak256, Bytes, TxHash};
use serde::{Deserialize, Serialize};

/// A signed transaction in its canonical encoded form.
///
/// The block processor never interprets the payload: execution semantics are
/// the transaction executor's business. All the processor relies on is the
/// transaction hash, which is expected to have been stamped by whoever decoded
/// the transaction from the wire or the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Keccak hash of the encoded payload, if it has been computed.
    pub hash: Option<TxHash>,
    /// The canonical encoded transaction: the RLP list for legacy transactions,
    /// the EIP-2718 typed envelope otherwise.
    pub payload: Bytes,
}

impl Transaction {
    /// Creates a transaction from its encoded payload, stamping the hash.
    pub fn new(payload: Bytes) -> Self {
        let hash = keccak256(&payload);
        Self { hash: Some(hash), payload }
    }

    /// Creates a transaction whose hash has not been computed yet.
    pub const fn unhashed(payload: Bytes) -> Self {
        Self { hash: None, payload }
    }

    /// Returns the transaction hash, if stamped.
    pub const fn hash(&self) -> Option<TxHash> {
        self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_keccak_of_payload() {
        let payload = Bytes::from_static(&[0xf8, 0x6b, 0x01]);
        let tx = Transaction::new(payload.clone());
        assert_eq!(tx.hash, Some(keccak256(&payload)));
        assert_eq!(Transaction::unhashed(payload).hash, None);
    }
}
