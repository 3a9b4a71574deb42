use alloy_primitives::{Address, B256, U256};
use sable_primitives::BlockNumber;
use thiserror::Error;

/// Failures raised by the state, storage and store collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The requested snapshot version is not on the store's version stack.
    #[error("unknown snapshot version {0}")]
    UnknownSnapshot(usize),
    /// The state provider has no trie for the requested root.
    #[error("unknown state root {0}")]
    UnknownStateRoot(B256),
    /// An account lookup failed.
    #[error("account {0} not found")]
    AccountNotFound(Address),
    /// A balance mutation would underflow.
    #[error("balance of {address} is less than {amount}")]
    InsufficientBalance {
        /// The account whose balance was mutated.
        address: Address,
        /// The amount that could not be subtracted.
        amount: U256,
    },
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(String),
}

/// Errors surfaced by block processing.
///
/// [`BlockProcessingError::InvalidBlock`] is the only failure the batch driver
/// models: it rolls the batch back and re-surfaces the error. Every other
/// variant also triggers a rollback before propagating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockProcessingError {
    /// The processed block was rejected by post-execution validation.
    #[error("block #{number} ({hash}) rejected by post-execution validation")]
    InvalidBlock {
        /// Number of the suggested block.
        number: BlockNumber,
        /// Hash of the suggested block.
        hash: B256,
    },
    /// A transaction reached the processor without a hash.
    #[error("transaction {index} in block #{block_number} has no hash")]
    InvalidTransaction {
        /// Number of the block containing the transaction.
        block_number: BlockNumber,
        /// Position of the transaction in the block.
        index: usize,
    },
    /// A collaborator failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl BlockProcessingError {
    /// Returns `true` if the error is the modeled post-execution rejection.
    pub const fn is_invalid_block(&self) -> bool {
        matches!(self, Self::InvalidBlock { .. })
    }
}
