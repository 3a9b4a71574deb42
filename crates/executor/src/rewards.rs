use alloy_primitives::U256;
use sable_chainspec::ChainSpec;
use sable_interfaces::{BlockReward, RewardCalculator, RewardKind};
use sable_primitives::SealedBlock;
use std::sync::Arc;

/// The proof-of-work reward schedule.
///
/// The miner is credited the fork's base reward plus 1/32 of it per included
/// ommer; each ommer author is credited `base * (8 - distance) / 8` where
/// `distance` is how many blocks behind the ommer is.
#[derive(Debug, Clone)]
pub struct EthashRewardCalculator {
    chain_spec: Arc<ChainSpec>,
}

impl EthashRewardCalculator {
    /// Creates a calculator for the given chain.
    pub const fn new(chain_spec: Arc<ChainSpec>) -> Self {
        Self { chain_spec }
    }
}

impl RewardCalculator for EthashRewardCalculator {
    fn calculate_rewards(&self, block: &SealedBlock) -> Vec<BlockReward> {
        let base = self.chain_spec.spec_at(block.number()).block_reward;
        if base.is_zero() {
            return Vec::new()
        }

        let mut rewards = Vec::with_capacity(1 + block.ommers.len());
        let miner = base + base / U256::from(32) * U256::from(block.ommers.len());
        rewards.push(BlockReward { address: block.beneficiary, value: miner, kind: RewardKind::Block });

        for ommer in &block.ommers {
            let distance = block.number().saturating_sub(ommer.number);
            if distance > 8 {
                continue
            }
            let value = base * U256::from(8 - distance) / U256::from(8);
            rewards.push(BlockReward { address: ommer.beneficiary, value, kind: RewardKind::Ommer });
        }
        rewards
    }
}
