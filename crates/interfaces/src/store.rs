use crate::ProviderError;
use alloy_primitives::TxHash;
use sable_primitives::Receipt;

/// Persistent sink for processed-transaction receipts.
///
/// Writes are idempotent per transaction hash: storing the same hash twice
/// overwrites the previous receipt.
pub trait ReceiptStore {
    /// Persists the receipt of a processed transaction.
    fn store_processed_transaction(
        &mut self,
        tx_hash: TxHash,
        receipt: Receipt,
    ) -> Result<(), ProviderError>;
}
