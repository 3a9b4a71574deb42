use alloy_primitives::{Address, U256};
use sable_primitives::SealedBlock;

/// What a reward entry is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardKind {
    /// The block reward credited to the beneficiary.
    Block,
    /// The reward credited to an ommer's author.
    Ommer,
}

/// A single consensus reward: credit `value` to `address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReward {
    /// The credited account.
    pub address: Address,
    /// The reward value in wei.
    pub value: U256,
    /// What the reward is paid for.
    pub kind: RewardKind,
}

/// Computes the consensus rewards for a block: one entry for the miner plus
/// one per ommer author, with fork-dependent values. Pure.
///
/// The returned order is the application order; the calculator defines
/// tie-breaks.
pub trait RewardCalculator: Send + Sync {
    /// Calculates the rewards for the given block.
    fn calculate_rewards(&self, block: &SealedBlock) -> Vec<BlockReward>;
}

/// Post-execution block validation. Pure.
pub trait BlockValidator: Send + Sync {
    /// Compares the processed block against the suggested one, returning
    /// `false` if the block must be rejected.
    fn validate_processed_block(&self, processed: &SealedBlock, suggested: &SealedBlock) -> bool;
}
