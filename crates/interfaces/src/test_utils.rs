//! In-memory collaborator implementations for testing the processing pipeline.
//!
//! Every double that a processor takes ownership of is a thin handle around
//! shared state, so tests keep a clone and inspect the collaborator after the
//! batch ran.

use crate::{
    BlockValidator, ProviderError, ReceiptStore, SnapshotableStore, StateProvider,
    StorageProvider, TraceListener, TransactionExecutor, TransactionOutcome, TransactionTrace,
};
use alloy_primitives::{keccak256, Address, Bytes, Log, TxHash, B256, U256};
use parking_lot::Mutex;
use sable_chainspec::ForkSpec;
use sable_primitives::{BlockNumber, Header, Receipt, SealedBlock, Transaction};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

/// A versioned in-memory key/value store.
///
/// Snapshots clone the working map onto a stack; `commit` copies the working
/// map into a separate durable map, which is what tests inspect to tell
/// "rolled back" from "persisted".
#[derive(Debug, Clone, Default)]
pub struct VersionedKvStore {
    inner: Arc<Mutex<KvInner>>,
}

#[derive(Debug, Default)]
struct KvInner {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    snapshots: Vec<BTreeMap<Vec<u8>, Vec<u8>>>,
    durable: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl VersionedKvStore {
    /// Writes a key/value pair into the working map.
    pub fn insert(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.inner.lock().data.insert(key.into(), value.into());
    }

    /// Returns the working map.
    pub fn data(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.inner.lock().data.clone()
    }

    /// Returns the durably committed map.
    pub fn durable(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.inner.lock().durable.clone()
    }

    /// Number of snapshots currently on the version stack.
    pub fn snapshot_count(&self) -> usize {
        self.inner.lock().snapshots.len()
    }
}

impl SnapshotableStore for VersionedKvStore {
    fn take_snapshot(&mut self) -> usize {
        let mut inner = self.inner.lock();
        let snapshot = inner.data.clone();
        inner.snapshots.push(snapshot);
        inner.snapshots.len() - 1
    }

    fn restore(&mut self, version: usize) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock();
        if version >= inner.snapshots.len() {
            return Err(ProviderError::UnknownSnapshot(version))
        }
        inner.data = inner.snapshots[version].clone();
        inner.snapshots.truncate(version);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock();
        inner.durable = inner.data.clone();
        inner.snapshots.clear();
        Ok(())
    }
}

/// A state provider backed by a balance map per state root.
///
/// Pending writes live in a journal until `commit` folds them into the
/// committed map, derives a new root from its contents and remembers the map
/// under that root, so `set_state_root` can reseat the provider on any
/// previously committed state. `commit_tree` mirrors the committed state into
/// the backing [`VersionedKvStore`], if one is attached.
#[derive(Debug, Clone)]
pub struct MockStateProvider {
    inner: Arc<Mutex<StateInner>>,
}

#[derive(Debug)]
struct StateInner {
    versions: HashMap<B256, BTreeMap<Address, U256>>,
    committed: BTreeMap<Address, U256>,
    journal: BTreeMap<Address, U256>,
    root: B256,
    store: Option<VersionedKvStore>,
}

fn balances_root(balances: &BTreeMap<Address, U256>) -> B256 {
    let mut preimage = Vec::with_capacity(balances.len() * 52);
    for (address, balance) in balances {
        preimage.extend_from_slice(address.as_slice());
        preimage.extend_from_slice(&balance.to_be_bytes::<32>());
    }
    keccak256(preimage)
}

fn encode_balances(balances: &BTreeMap<Address, U256>) -> Vec<u8> {
    let mut out = Vec::with_capacity(balances.len() * 52);
    for (address, balance) in balances {
        out.extend_from_slice(address.as_slice());
        out.extend_from_slice(&balance.to_be_bytes::<32>());
    }
    out
}

impl MockStateProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        let committed = BTreeMap::new();
        let root = balances_root(&committed);
        let versions = HashMap::from([(root, committed.clone())]);
        Self {
            inner: Arc::new(Mutex::new(StateInner {
                versions,
                committed,
                journal: BTreeMap::new(),
                root,
                store: None,
            })),
        }
    }

    /// Mirrors committed state into the given store on `commit_tree`.
    pub fn with_store(self, store: VersionedKvStore) -> Self {
        self.inner.lock().store = Some(store);
        self
    }

    /// Seeds an account into the committed state.
    pub fn with_account(self, address: Address, balance: U256) -> Self {
        {
            let mut inner = self.inner.lock();
            inner.committed.insert(address, balance);
            inner.root = balances_root(&inner.committed);
            let (root, committed) = (inner.root, inner.committed.clone());
            inner.versions.insert(root, committed);
        }
        self
    }

    /// Returns the committed balance of the account.
    pub fn balance_of(&self, address: Address) -> U256 {
        self.inner.lock().committed.get(&address).copied().unwrap_or_default()
    }

    /// Returns the committed balances.
    pub fn committed(&self) -> BTreeMap<Address, U256> {
        self.inner.lock().committed.clone()
    }
}

impl Default for MockStateProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StateProvider for MockStateProvider {
    fn state_root(&self) -> B256 {
        self.inner.lock().root
    }

    fn set_state_root(&mut self, root: B256) {
        let mut inner = self.inner.lock();
        inner.committed = inner.versions.get(&root).cloned().unwrap_or_default();
        inner.root = root;
    }

    fn reset(&mut self) {
        self.inner.lock().journal.clear();
    }

    fn commit(&mut self, _spec: &ForkSpec) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock();
        let journal = std::mem::take(&mut inner.journal);
        inner.committed.extend(journal);
        inner.root = balances_root(&inner.committed);
        let (root, committed) = (inner.root, inner.committed.clone());
        inner.versions.insert(root, committed);
        Ok(())
    }

    fn commit_tree(&mut self) -> Result<(), ProviderError> {
        let inner = self.inner.lock();
        if let Some(store) = &inner.store {
            store.insert(inner.root.as_slice().to_vec(), encode_balances(&inner.committed));
        }
        Ok(())
    }

    fn account_exists(&self, address: Address) -> Result<bool, ProviderError> {
        let inner = self.inner.lock();
        Ok(inner.journal.contains_key(&address) || inner.committed.contains_key(&address))
    }

    fn create_account(&mut self, address: Address, balance: U256) -> Result<(), ProviderError> {
        self.inner.lock().journal.insert(address, balance);
        Ok(())
    }

    fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        let inner = self.inner.lock();
        Ok(inner
            .journal
            .get(&address)
            .or_else(|| inner.committed.get(&address))
            .copied()
            .unwrap_or_default())
    }

    fn add_to_balance(
        &mut self,
        address: Address,
        value: U256,
        _spec: &ForkSpec,
    ) -> Result<(), ProviderError> {
        let current = self.balance(address)?;
        self.inner.lock().journal.insert(address, current + value);
        Ok(())
    }

    fn subtract_from_balance(
        &mut self,
        address: Address,
        value: U256,
        _spec: &ForkSpec,
    ) -> Result<(), ProviderError> {
        let current = self.balance(address)?;
        let updated = current
            .checked_sub(value)
            .ok_or(ProviderError::InsufficientBalance { address, amount: value })?;
        self.inner.lock().journal.insert(address, updated);
        Ok(())
    }
}

/// A storage provider that only counts calls.
#[derive(Debug, Clone, Default)]
pub struct MockStorageProvider {
    inner: Arc<Mutex<StorageInner>>,
}

#[derive(Debug, Default)]
struct StorageInner {
    resets: usize,
    tree_commits: usize,
}

impl MockStorageProvider {
    /// Number of times `reset` was called.
    pub fn resets(&self) -> usize {
        self.inner.lock().resets
    }

    /// Number of times `commit_trees` was called.
    pub fn tree_commits(&self) -> usize {
        self.inner.lock().tree_commits
    }
}

impl StorageProvider for MockStorageProvider {
    fn reset(&mut self) {
        self.inner.lock().resets += 1;
    }

    fn commit_trees(&mut self) -> Result<(), ProviderError> {
        self.inner.lock().tree_commits += 1;
        Ok(())
    }
}

/// A transaction executor with scripted behavior.
///
/// Each execution burns `gas_per_tx`, emits the configured logs, and
/// optionally credits an account, which is how tests make execution leave a
/// mark on the state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExecutor {
    /// Gas charged per transaction.
    pub gas_per_tx: u64,
    /// Logs emitted by every transaction.
    pub logs: Vec<Log>,
    /// Account credited by every transaction.
    pub credit: Option<(Address, U256)>,
}

impl ScriptedExecutor {
    /// An executor that burns the given gas per transaction.
    pub fn new(gas_per_tx: u64) -> Self {
        Self { gas_per_tx, ..Default::default() }
    }

    /// Emits the given logs from every transaction.
    pub fn with_logs(mut self, logs: Vec<Log>) -> Self {
        self.logs = logs;
        self
    }

    /// Credits the account on every transaction.
    pub fn with_credit(mut self, address: Address, value: U256) -> Self {
        self.credit = Some((address, value));
        self
    }
}

impl TransactionExecutor for ScriptedExecutor {
    fn execute(
        &mut self,
        state: &mut dyn StateProvider,
        _storage: &mut dyn StorageProvider,
        index: usize,
        transaction: &Transaction,
        _header: &Header,
        trace: bool,
    ) -> Result<TransactionOutcome, ProviderError> {
        if let Some((address, value)) = self.credit {
            if state.account_exists(address)? {
                state.add_to_balance(address, value, &ForkSpec::default())?;
            } else {
                state.create_account(address, value)?;
            }
        }
        let tx_hash = transaction.hash.unwrap_or_default();
        let receipt = Receipt {
            tx_hash,
            success: true,
            post_state: None,
            cumulative_gas_used: self.gas_per_tx * (index as u64 + 1),
            logs: self.logs.clone(),
            bloom: alloy_primitives::logs_bloom(self.logs.iter()),
            block_hash: None,
        };
        let trace = trace.then(|| TransactionTrace(Bytes::copy_from_slice(tx_hash.as_slice())));
        Ok(TransactionOutcome { receipt, trace })
    }
}

/// A validator that rejects blocks at a scripted number.
#[derive(Debug, Clone, Default)]
pub struct ScriptedValidator {
    reject_number: Option<BlockNumber>,
}

impl ScriptedValidator {
    /// A validator that accepts everything.
    pub const fn accept_all() -> Self {
        Self { reject_number: None }
    }

    /// A validator that rejects the block with the given number.
    pub const fn reject_at(number: BlockNumber) -> Self {
        Self { reject_number: Some(number) }
    }
}

impl BlockValidator for ScriptedValidator {
    fn validate_processed_block(&self, _processed: &SealedBlock, suggested: &SealedBlock) -> bool {
        self.reject_number != Some(suggested.number())
    }
}

/// A receipt store that records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingReceiptStore {
    inner: Arc<Mutex<Vec<(TxHash, Receipt)>>>,
}

impl RecordingReceiptStore {
    /// Returns all stored receipts, in insertion order.
    pub fn stored(&self) -> Vec<(TxHash, Receipt)> {
        self.inner.lock().clone()
    }

    /// Returns `true` if nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl ReceiptStore for RecordingReceiptStore {
    fn store_processed_transaction(
        &mut self,
        tx_hash: TxHash,
        receipt: Receipt,
    ) -> Result<(), ProviderError> {
        self.inner.lock().push((tx_hash, receipt));
        Ok(())
    }
}

/// A trace listener that traces a scripted set of transactions and records
/// what it receives.
#[derive(Debug, Default)]
pub struct RecordingTraceListener {
    wanted: HashSet<TxHash>,
    /// Traces received, in delivery order.
    pub traces: Vec<(TxHash, TransactionTrace)>,
}

impl RecordingTraceListener {
    /// Traces exactly the given transactions.
    pub fn tracing(wanted: impl IntoIterator<Item = TxHash>) -> Self {
        Self { wanted: wanted.into_iter().collect(), traces: Vec::new() }
    }
}

impl TraceListener for RecordingTraceListener {
    fn should_trace(&self, tx_hash: &TxHash) -> bool {
        self.wanted.contains(tx_hash)
    }

    fn record_trace(&mut self, tx_hash: &TxHash, trace: TransactionTrace) {
        self.traces.push((*tx_hash, trace));
    }
}

/// An executor that fails every execution, for exercising collaborator-error
/// paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingExecutor;

impl TransactionExecutor for FailingExecutor {
    fn execute(
        &mut self,
        _state: &mut dyn StateProvider,
        _storage: &mut dyn StorageProvider,
        _index: usize,
        _transaction: &Transaction,
        _header: &Header,
        _trace: bool,
    ) -> Result<TransactionOutcome, ProviderError> {
        Err(ProviderError::Database("scripted executor failure".to_owned()))
    }
}
