//! The chain specification: which protocol rules are active at which block.
//!
//! All fork lookups in the processing pipeline go through
//! [`ChainSpec::spec_at`], which resolves the hardfork schedule into a
//! per-block [`ForkSpec`]. The DAO transition is the only one-shot,
//! non-numeric fork action and is kept as a named table ([`DaoFork`]).

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod hardfork;
pub use hardfork::Hardfork;

mod spec;
pub use spec::{ChainSpec, ChainSpecBuilder, DaoFork, ForkSpec, DAO_FORK_BENEFICIARY, MAINNET};
