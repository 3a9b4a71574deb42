//! The consensus-critical block processing pipeline.
//!
//! [`BlockProcessor::process`] drives a batch of suggested blocks through
//! transaction execution, derives the receipts root, bloom and state root for
//! each, applies consensus rewards and one-shot fork transitions, and finally
//! either commits both backing stores durably or rewinds everything to the
//! snapshot taken at batch entry. A batch is all-or-nothing: no partial
//! effects survive a failed or read-only run.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod options;
pub use options::ProcessingOptions;

mod processor;
pub use processor::BlockProcessor;

mod rewards;
pub use rewards::EthashRewardCalculator;

mod snapshot;
pub use snapshot::BatchSnapshot;
