use crate::Hardfork;
use alloy_primitives::{address, Address, U256};
use once_cell::sync::Lazy;
use sable_primitives::{constants::EIP1559_INITIAL_BASE_FEE, BlockNumber, Header};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Block reward under Frontier rules: 5 ether.
const FRONTIER_BLOCK_REWARD: U256 = U256::from_limbs([5_000_000_000_000_000_000, 0, 0, 0]);

/// Block reward from Byzantium (EIP-649): 3 ether.
const BYZANTIUM_BLOCK_REWARD: U256 = U256::from_limbs([3_000_000_000_000_000_000, 0, 0, 0]);

/// Block reward from Constantinople (EIP-1234): 2 ether.
const CONSTANTINOPLE_BLOCK_REWARD: U256 = U256::from_limbs([2_000_000_000_000_000_000, 0, 0, 0]);

/// The address all DAO balances were migrated to at the fork block.
pub const DAO_FORK_BENEFICIARY: Address = address!("bf4ed7b27f1d666546e30d74d50d173d20bca754");

/// The Ethereum mainnet spec.
///
/// The DAO account table is provisioned from the client's chain configuration
/// at startup, alongside the genesis allocation.
pub static MAINNET: Lazy<ChainSpec> = Lazy::new(|| ChainSpec {
    chain_id: 1,
    hardforks: BTreeMap::from([
        (Hardfork::Frontier, 0),
        (Hardfork::Homestead, 1_150_000),
        (Hardfork::Dao, 1_920_000),
        (Hardfork::Tangerine, 2_463_000),
        (Hardfork::SpuriousDragon, 2_675_000),
        (Hardfork::Byzantium, 4_370_000),
        (Hardfork::Constantinople, 7_280_000),
        (Hardfork::Petersburg, 7_280_000),
        (Hardfork::Istanbul, 9_069_000),
        (Hardfork::MuirGlacier, 9_200_000),
        (Hardfork::Berlin, 12_244_000),
        (Hardfork::London, 12_965_000),
        (Hardfork::ArrowGlacier, 13_773_000),
        (Hardfork::GrayGlacier, 15_050_000),
    ]),
    dao_fork: None,
});

/// The rules in force for a single block.
///
/// Resolved once per block by [`ChainSpec::spec_at`]; everything downstream
/// branches on these fields rather than comparing block numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkSpec {
    /// Receipts carry a status code instead of a post-transaction state root
    /// ([EIP-658](https://eips.ethereum.org/EIPS/eip-658), Byzantium).
    pub is_eip658_enabled: bool,
    /// Empty-account touch semantics of EIP-158 (Spurious Dragon) apply to
    /// balance mutations.
    pub is_state_clear_enabled: bool,
    /// The base block reward credited to the beneficiary.
    pub block_reward: U256,
}

/// The DAO irregular state change: at the activation block, the entire balance
/// of every drained account is moved to the beneficiary before any transaction
/// executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoFork {
    /// The block at which the migration runs.
    pub activation_block: BlockNumber,
    /// Accounts whose balances are drained.
    pub drained_accounts: Vec<Address>,
    /// The account the drained balances are credited to.
    pub beneficiary: Address,
}

/// An Ethereum chain specification: the hardfork activation schedule plus
/// one-shot transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpec {
    chain_id: u64,
    hardforks: BTreeMap<Hardfork, BlockNumber>,
    dao_fork: Option<DaoFork>,
}

impl ChainSpec {
    /// Returns the chain id.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the first block number of the hardfork.
    pub fn fork_block(&self, fork: Hardfork) -> Option<BlockNumber> {
        self.hardforks.get(&fork).copied()
    }

    /// Returns `true` if the given fork is active at the given block.
    pub fn fork_active(&self, fork: Hardfork, block: BlockNumber) -> bool {
        self.fork_block(fork).is_some_and(|activation| activation <= block)
    }

    /// Returns the DAO transition table, if this chain performs one.
    pub const fn dao_fork(&self) -> Option<&DaoFork> {
        self.dao_fork.as_ref()
    }

    /// Returns the block at which the DAO transition runs, if any.
    pub fn dao_block_number(&self) -> Option<BlockNumber> {
        self.dao_fork.as_ref().map(|dao| dao.activation_block)
    }

    /// The base fee the genesis header must carry: the EIP-1559 initial base
    /// fee when London is active from genesis, nothing otherwise.
    pub fn initial_base_fee(&self) -> Option<u64> {
        self.fork_active(Hardfork::London, 0).then_some(EIP1559_INITIAL_BASE_FEE)
    }

    /// Constructs the genesis block header for this chain.
    ///
    /// The state root is left at the empty root; seeding it is the business
    /// of whoever applies the genesis allocation.
    pub fn genesis_header(&self) -> Header {
        Header { base_fee_per_gas: self.initial_base_fee(), ..Default::default() }
    }

    /// Resolves the rules in force at the given block.
    pub fn spec_at(&self, block: BlockNumber) -> ForkSpec {
        let block_reward = if self.fork_active(Hardfork::Constantinople, block) {
            CONSTANTINOPLE_BLOCK_REWARD
        } else if self.fork_active(Hardfork::Byzantium, block) {
            BYZANTIUM_BLOCK_REWARD
        } else {
            FRONTIER_BLOCK_REWARD
        };
        ForkSpec {
            is_eip658_enabled: self.fork_active(Hardfork::Byzantium, block),
            is_state_clear_enabled: self.fork_active(Hardfork::SpuriousDragon, block),
            block_reward,
        }
    }

    /// Returns a [`ChainSpecBuilder`] to help build custom specs.
    pub fn builder() -> ChainSpecBuilder {
        ChainSpecBuilder::default()
    }
}

/// A helper to build custom chain specs.
#[derive(Debug, Default)]
pub struct ChainSpecBuilder {
    chain_id: u64,
    hardforks: BTreeMap<Hardfork, BlockNumber>,
    dao_fork: Option<DaoFork>,
}

impl ChainSpecBuilder {
    /// Returns a builder initialized with the mainnet schedule.
    pub fn mainnet() -> Self {
        Self {
            chain_id: MAINNET.chain_id,
            hardforks: MAINNET.hardforks.clone(),
            dao_fork: MAINNET.dao_fork.clone(),
        }
    }

    /// Sets the chain id.
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Inserts the given fork at the given block number.
    pub fn with_fork(mut self, fork: Hardfork, block: BlockNumber) -> Self {
        self.hardforks.insert(fork, block);
        self
    }

    /// Declares the DAO transition. Also records [`Hardfork::Dao`] in the
    /// schedule so the two never disagree.
    pub fn with_dao_fork(mut self, dao: DaoFork) -> Self {
        self.hardforks.insert(Hardfork::Dao, dao.activation_block);
        self.dao_fork = Some(dao);
        self
    }

    /// Enables Frontier.
    pub fn frontier_activated(mut self) -> Self {
        self.hardforks.insert(Hardfork::Frontier, 0);
        self
    }

    /// Enables Homestead.
    pub fn homestead_activated(mut self) -> Self {
        self = self.frontier_activated();
        self.hardforks.insert(Hardfork::Homestead, 0);
        self
    }

    /// Enables Tangerine Whistle.
    pub fn tangerine_whistle_activated(mut self) -> Self {
        self = self.homestead_activated();
        self.hardforks.insert(Hardfork::Tangerine, 0);
        self
    }

    /// Enables Spurious Dragon.
    pub fn spurious_dragon_activated(mut self) -> Self {
        self = self.tangerine_whistle_activated();
        self.hardforks.insert(Hardfork::SpuriousDragon, 0);
        self
    }

    /// Enables Byzantium.
    pub fn byzantium_activated(mut self) -> Self {
        self = self.spurious_dragon_activated();
        self.hardforks.insert(Hardfork::Byzantium, 0);
        self
    }

    /// Enables Constantinople.
    pub fn constantinople_activated(mut self) -> Self {
        self = self.byzantium_activated();
        self.hardforks.insert(Hardfork::Constantinople, 0);
        self
    }

    /// Enables Petersburg.
    pub fn petersburg_activated(mut self) -> Self {
        self = self.constantinople_activated();
        self.hardforks.insert(Hardfork::Petersburg, 0);
        self
    }

    /// Enables Istanbul.
    pub fn istanbul_activated(mut self) -> Self {
        self = self.petersburg_activated();
        self.hardforks.insert(Hardfork::Istanbul, 0);
        self
    }

    /// Enables Berlin.
    pub fn berlin_activated(mut self) -> Self {
        self = self.istanbul_activated();
        self.hardforks.insert(Hardfork::Berlin, 0);
        self
    }

    /// Enables London.
    pub fn london_activated(mut self) -> Self {
        self = self.berlin_activated();
        self.hardforks.insert(Hardfork::London, 0);
        self
    }

    /// Build a [`ChainSpec`].
    pub fn build(self) -> ChainSpec {
        ChainSpec { chain_id: self.chain_id, hardforks: self.hardforks, dao_fork: self.dao_fork }
    }
}

impl From<&ChainSpec> for ChainSpecBuilder {
    fn from(value: &ChainSpec) -> Self {
        Self {
            chain_id: value.chain_id,
            hardforks: value.hardforks.clone(),
            dao_fork: value.dao_fork.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_fork_schedule() {
        assert!(MAINNET.fork_active(Hardfork::Frontier, 0));
        assert!(!MAINNET.fork_active(Hardfork::Homestead, 1_149_999));
        assert!(MAINNET.fork_active(Hardfork::Homestead, 1_150_000));
        assert_eq!(MAINNET.fork_block(Hardfork::Dao), Some(1_920_000));
    }

    #[test]
    fn eip658_flips_at_byzantium() {
        assert!(!MAINNET.spec_at(4_369_999).is_eip658_enabled);
        assert!(MAINNET.spec_at(4_370_000).is_eip658_enabled);
    }

    #[test]
    fn block_reward_schedule() {
        assert_eq!(MAINNET.spec_at(0).block_reward, FRONTIER_BLOCK_REWARD);
        assert_eq!(MAINNET.spec_at(4_370_000).block_reward, BYZANTIUM_BLOCK_REWARD);
        assert_eq!(MAINNET.spec_at(7_280_000).block_reward, CONSTANTINOPLE_BLOCK_REWARD);
    }

    #[test]
    fn london_chains_seed_the_initial_base_fee() {
        let spec = ChainSpec::builder().london_activated().build();
        assert_eq!(spec.initial_base_fee(), Some(EIP1559_INITIAL_BASE_FEE));
        assert_eq!(spec.genesis_header().base_fee_per_gas, Some(EIP1559_INITIAL_BASE_FEE));
        // Mainnet activated London long after genesis.
        assert_eq!(MAINNET.initial_base_fee(), None);
        assert_eq!(MAINNET.genesis_header().base_fee_per_gas, None);
    }

    #[test]
    fn dao_fork_keeps_schedule_in_sync() {
        let dao = DaoFork {
            activation_block: 1_920_000,
            drained_accounts: vec![Address::repeat_byte(0xda)],
            beneficiary: DAO_FORK_BENEFICIARY,
        };
        let spec = ChainSpec::builder().homestead_activated().with_dao_fork(dao.clone()).build();
        assert_eq!(spec.dao_block_number(), Some(1_920_000));
        assert_eq!(spec.fork_block(Hardfork::Dao), Some(1_920_000));
        assert_eq!(spec.dao_fork(), Some(&dao));
    }

    #[test]
    fn builder_activations_are_cumulative() {
        let spec = ChainSpec::builder().byzantium_activated().build();
        assert!(spec.fork_active(Hardfork::SpuriousDragon, 0));
        assert!(spec.fork_active(Hardfork::Byzantium, 0));
        assert!(!spec.fork_active(Hardfork::Constantinople, 0));
        assert!(spec.spec_at(0).is_eip658_enabled);
        assert!(spec.spec_at(0).is_state_clear_enabled);
    }
}
