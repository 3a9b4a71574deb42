//! Commonly used types for block processing.
//!
//! Blocks move through the processing pipeline in two shapes: a mutable
//! [`Header`] that is finalized field by field while a block executes, and a
//! [`SealedHeader`]/[`SealedBlock`] pair that locks the header at its hash once
//! every field is known. Receipt and ommer roots are derived in [`proofs`].

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

pub mod constants;

mod block;
pub use block::{Block, SealedBlock};

mod header;
pub use header::{Header, SealedHeader};

pub mod proofs;

mod receipt;
pub use receipt::Receipt;

mod transaction;
pub use transaction::Transaction;

pub use alloy_primitives::{
    keccak256, Address, BlockHash, BlockNumber, Bloom, Bytes, Log, LogData, TxHash, B256, B64, U256,
};
