use crate::ProviderError;
use alloy_primitives::{Address, B256, U256};
use sable_chainspec::ForkSpec;

/// The world-state view the processor mutates.
///
/// Writes accumulate in memory until [`StateProvider::commit`] folds them into
/// the backing trie and updates the state root; [`StateProvider::commit_tree`]
/// then pushes the finalized trie nodes down to the backing store.
pub trait StateProvider {
    /// The current state root.
    fn state_root(&self) -> B256;

    /// Repoints the provider at a different state root.
    ///
    /// Used for branch realignment and snapshot restore; discards nothing by
    /// itself, callers are expected to [`reset`](StateProvider::reset) first.
    fn set_state_root(&mut self, root: B256);

    /// Discards all in-memory writes, keeping the current root.
    fn reset(&mut self);

    /// Folds dirty trie nodes into the backing store and updates the state
    /// root, under the given fork's rules.
    fn commit(&mut self, spec: &ForkSpec) -> Result<(), ProviderError>;

    /// Finalizes the tree structure, pushing it to the backing store's write
    /// layer. Durability is the store's decision.
    fn commit_tree(&mut self) -> Result<(), ProviderError>;

    /// Returns `true` if the account exists.
    fn account_exists(&self, address: Address) -> Result<bool, ProviderError>;

    /// Creates an account with the given initial balance.
    fn create_account(&mut self, address: Address, balance: U256) -> Result<(), ProviderError>;

    /// Returns the account's balance, zero if the account does not exist.
    fn balance(&self, address: Address) -> Result<U256, ProviderError>;

    /// Adds `value` to the account's balance under the given fork's rules.
    fn add_to_balance(
        &mut self,
        address: Address,
        value: U256,
        spec: &ForkSpec,
    ) -> Result<(), ProviderError>;

    /// Subtracts `value` from the account's balance under the given fork's
    /// rules.
    fn subtract_from_balance(
        &mut self,
        address: Address,
        value: U256,
        spec: &ForkSpec,
    ) -> Result<(), ProviderError>;
}

/// The contract-storage view the processor resets and commits alongside the
/// state provider.
pub trait StorageProvider {
    /// Discards all in-memory writes.
    fn reset(&mut self);

    /// Commits the storage tries to the backing store's write layer.
    fn commit_trees(&mut self) -> Result<(), ProviderError>;
}

/// A key/value store supporting versioned undo.
///
/// Versions form a stack: [`take_snapshot`](SnapshotableStore::take_snapshot)
/// pushes, [`restore`](SnapshotableStore::restore) pops back to an earlier
/// version. [`commit`](SnapshotableStore::commit) durably persists the current
/// state and invalidates all outstanding version markers.
pub trait SnapshotableStore {
    /// Captures the current version, returning a marker valid until the next
    /// `restore` or `commit`.
    fn take_snapshot(&mut self) -> usize;

    /// Rewinds the store to the given version marker.
    fn restore(&mut self, version: usize) -> Result<(), ProviderError>;

    /// Durably persists the store.
    ///
    /// Durability is per store: committing the state and code stores is not
    /// transactional across the two. A write batch spanning both column
    /// families would close that gap.
    fn commit(&mut self) -> Result<(), ProviderError>;
}
