//! Contracts between the block processor and its collaborators.
//!
//! The processor is the single writer during a batch: mutating collaborators
//! (executor, state and storage providers, backing stores) are owned and
//! driven through `&mut`, pure ones (validator, reward calculator) can be
//! shared read-only.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod consensus;
pub use consensus::{BlockReward, BlockValidator, RewardCalculator, RewardKind};

mod error;
pub use error::{BlockProcessingError, ProviderError};

mod executor;
pub use executor::{
    NoopTraceListener, TraceListener, TransactionExecutor, TransactionOutcome, TransactionTrace,
};

mod state;
pub use state::{SnapshotableStore, StateProvider, StorageProvider};

mod store;
pub use store::ReceiptStore;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
