use alloy_primitives::B256;
use sable_interfaces::{ProviderError, SnapshotableStore, StateProvider, StorageProvider};
use tracing::{error, trace};

/// A snapshot of the two backing stores and the state root, giving a batch
/// all-or-nothing semantics.
///
/// The snapshot must be explicitly disposed of with [`BatchSnapshot::commit`]
/// or [`BatchSnapshot::restore`] before it is dropped; dropping it without
/// either is a bug and trips a debug assertion.
#[derive(Debug)]
#[must_use = "a batch snapshot must be committed or restored"]
pub struct BatchSnapshot {
    state_db_version: usize,
    code_db_version: usize,
    state_root: B256,
    disposed: bool,
}

impl BatchSnapshot {
    /// Captures the current versions of both stores and the state root.
    pub fn capture(
        state_db: &mut dyn SnapshotableStore,
        code_db: &mut dyn SnapshotableStore,
        state: &dyn StateProvider,
    ) -> Self {
        let state_db_version = state_db.take_snapshot();
        let code_db_version = code_db.take_snapshot();
        let state_root = state.state_root();
        trace!(
            target: "processor",
            state_db_version,
            code_db_version,
            root = %state_root,
            "Captured batch snapshot"
        );
        Self { state_db_version, code_db_version, state_root, disposed: false }
    }

    /// The state root recorded at capture time.
    pub const fn state_root(&self) -> B256 {
        self.state_root
    }

    /// Rewinds both stores to the captured versions, discards the in-memory
    /// writes of the storage and state providers, and repoints the state at
    /// the captured root.
    pub fn restore(
        mut self,
        state_db: &mut dyn SnapshotableStore,
        code_db: &mut dyn SnapshotableStore,
        state: &mut dyn StateProvider,
        storage: &mut dyn StorageProvider,
    ) -> Result<(), ProviderError> {
        self.disposed = true;
        state_db.restore(self.state_db_version)?;
        code_db.restore(self.code_db_version)?;
        storage.reset();
        state.reset();
        state.set_state_root(self.state_root);
        trace!(target: "processor", root = %self.state_root, "Restored batch snapshot");
        Ok(())
    }

    /// Durably persists both stores.
    ///
    /// The two commits are sequential, not transactional across the stores;
    /// a write batch spanning both column families would close that gap.
    pub fn commit(
        mut self,
        state_db: &mut dyn SnapshotableStore,
        code_db: &mut dyn SnapshotableStore,
    ) -> Result<(), ProviderError> {
        self.disposed = true;
        state_db.commit()?;
        code_db.commit()?;
        trace!(target: "processor", "Committed batch");
        Ok(())
    }
}

impl Drop for BatchSnapshot {
    fn drop(&mut self) {
        if !self.disposed {
            error!(
                target: "processor",
                root = %self.state_root,
                "batch snapshot dropped without commit or restore"
            );
            debug_assert!(false, "batch snapshot dropped without commit or restore");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use sable_interfaces::test_utils::{MockStateProvider, MockStorageProvider, VersionedKvStore};

    #[test]
    fn restore_rewinds_stores_and_state() {
        let mut state_db = VersionedKvStore::default();
        let mut code_db = VersionedKvStore::default();
        let mut state =
            MockStateProvider::new().with_account(Address::repeat_byte(1), U256::from(7));
        let mut storage = MockStorageProvider::default();
        let root = state.state_root();

        let snapshot = BatchSnapshot::capture(&mut state_db, &mut code_db, &state);
        state_db.insert(b"key".to_vec(), b"value".to_vec());
        state.set_state_root(B256::repeat_byte(0xee));

        snapshot.restore(&mut state_db, &mut code_db, &mut state, &mut storage).unwrap();
        assert!(state_db.data().is_empty());
        assert_eq!(state.state_root(), root);
        assert_eq!(storage.resets(), 1);
        // The version stack is unwound as well.
        assert_eq!(state_db.snapshot_count(), 0);
    }

    #[test]
    fn commit_persists_both_stores() {
        let mut state_db = VersionedKvStore::default();
        let mut code_db = VersionedKvStore::default();
        let state = MockStateProvider::new();

        let snapshot = BatchSnapshot::capture(&mut state_db, &mut code_db, &state);
        state_db.insert(b"node".to_vec(), b"rlp".to_vec());
        code_db.insert(b"hash".to_vec(), b"code".to_vec());
        snapshot.commit(&mut state_db, &mut code_db).unwrap();

        assert_eq!(state_db.durable(), state_db.data());
        assert_eq!(code_db.durable(), code_db.data());
        assert_eq!(state_db.snapshot_count(), 0);
    }

    #[test]
    #[should_panic(expected = "dropped without commit or restore")]
    fn dropping_an_undisposed_snapshot_is_a_bug() {
        let mut state_db = VersionedKvStore::default();
        let mut code_db = VersionedKvStore::default();
        let state = MockStateProvider::new();
        let snapshot = BatchSnapshot::capture(&mut state_db, &mut code_db, &state);
        drop(snapshot);
    }
}
