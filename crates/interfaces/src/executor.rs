use crate::{ProviderError, StateProvider, StorageProvider};
use alloy_primitives::{Bytes, TxHash};
use sable_primitives::{Header, Receipt, Transaction};

/// An opaque execution trace emitted by the transaction executor when tracing
/// was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionTrace(pub Bytes);

/// The result of executing a single transaction.
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    /// The receipt produced by the execution.
    pub receipt: Receipt,
    /// The trace, present iff tracing was requested.
    pub trace: Option<TransactionTrace>,
}

/// Executes transactions against the state and storage providers.
///
/// Deterministic given identical providers and fork rules. The providers are
/// handed in per call: the processor is the single writer during a batch and
/// lends them out for the duration of one transaction.
pub trait TransactionExecutor {
    /// Executes the transaction at position `index` of the block described by
    /// `header`, mutating the providers in place.
    ///
    /// `trace` requests an execution trace; untraced executions must not pay
    /// for trace collection.
    fn execute(
        &mut self,
        state: &mut dyn StateProvider,
        storage: &mut dyn StorageProvider,
        index: usize,
        transaction: &Transaction,
        header: &Header,
        trace: bool,
    ) -> Result<TransactionOutcome, ProviderError>;
}

/// Decides per transaction whether a trace should be collected, and receives
/// the traces that were.
pub trait TraceListener {
    /// Returns `true` if the transaction should be traced.
    fn should_trace(&self, tx_hash: &TxHash) -> bool;

    /// Records a collected trace.
    fn record_trace(&mut self, tx_hash: &TxHash, trace: TransactionTrace);
}

/// A listener that never requests tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTraceListener;

impl TraceListener for NoopTraceListener {
    fn should_trace(&self, _tx_hash: &TxHash) -> bool {
        false
    }

    fn record_trace(&mut self, _tx_hash: &TxHash, _trace: TransactionTrace) {}
}
