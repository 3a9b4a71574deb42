//! Ethereum protocol-related constants.

use alloy_primitives::{b256, B256};

/// Multiplier for converting ether to wei.
pub const ETH_TO_WEI: u64 = 1_000_000_000_000_000_000;

/// The initial base fee as defined in [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559).
pub const EIP1559_INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// Root hash of an empty trie: `keccak256(rlp(""))`.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Ommer root of an empty list: `keccak256(rlp([]))`.
pub const EMPTY_OMMER_ROOT_HASH: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");

/// Transactions root of an empty block body.
pub const EMPTY_TRANSACTIONS: B256 = EMPTY_ROOT_HASH;

/// Receipts root of a block with no transactions.
pub const EMPTY_RECEIPTS: B256 = EMPTY_ROOT_HASH;
