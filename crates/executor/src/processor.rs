use crate::{BatchSnapshot, ProcessingOptions};
use alloy_primitives::{B256, U256};
use sable_chainspec::{ChainSpec, ForkSpec};
use sable_interfaces::{
    BlockProcessingError, BlockValidator, ProviderError, ReceiptStore, RewardCalculator,
    SnapshotableStore, StateProvider, StorageProvider, TraceListener, TransactionExecutor,
};
use sable_primitives::{proofs, BlockNumber, Header, Receipt, SealedBlock};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Advances world state by processing batches of suggested blocks.
///
/// The processor owns mutable views of the state and storage providers and
/// the two backing stores for the duration of a batch; it is the sole writer.
/// Execution is strictly sequential: transactions in declared order within a
/// block, blocks in input order within a batch.
pub struct BlockProcessor<E> {
    chain_spec: Arc<ChainSpec>,
    executor: E,
    validator: Arc<dyn BlockValidator>,
    reward_calculator: Arc<dyn RewardCalculator>,
    state: Box<dyn StateProvider>,
    storage: Box<dyn StorageProvider>,
    state_db: Box<dyn SnapshotableStore>,
    code_db: Box<dyn SnapshotableStore>,
    receipt_store: Box<dyn ReceiptStore>,
}

impl<E> BlockProcessor<E>
where
    E: TransactionExecutor,
{
    /// Creates a new block processor over the given collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_spec: Arc<ChainSpec>,
        executor: E,
        validator: Arc<dyn BlockValidator>,
        reward_calculator: Arc<dyn RewardCalculator>,
        state: Box<dyn StateProvider>,
        storage: Box<dyn StorageProvider>,
        state_db: Box<dyn SnapshotableStore>,
        code_db: Box<dyn SnapshotableStore>,
        receipt_store: Box<dyn ReceiptStore>,
    ) -> Self {
        Self {
            chain_spec,
            executor,
            validator,
            reward_calculator,
            state,
            storage,
            state_db,
            code_db,
            receipt_store,
        }
    }

    /// Processes the suggested blocks in order, starting from
    /// `branch_state_root` (or the current state root if absent).
    ///
    /// On success the backing stores are committed durably, unless
    /// [`ProcessingOptions::read_only_chain`] is set, in which case the batch
    /// is rolled back and the returned blocks are the only output. On any
    /// error the batch is rolled back to the pre-batch snapshot before the
    /// error is re-surfaced, so no partial effects survive.
    ///
    /// The returned blocks are in one-to-one positional correspondence with
    /// the input.
    pub fn process(
        &mut self,
        branch_state_root: Option<B256>,
        suggested: &[SealedBlock],
        options: ProcessingOptions,
        listener: &mut dyn TraceListener,
    ) -> Result<Vec<SealedBlock>, BlockProcessingError> {
        if suggested.is_empty() {
            return Ok(Vec::new())
        }

        debug!(
            target: "processor",
            blocks = suggested.len(),
            first = suggested[0].number(),
            branch_root = ?branch_state_root,
            read_only = options.read_only_chain,
            "Processing batch"
        );

        let snapshot =
            BatchSnapshot::capture(self.state_db.as_mut(), self.code_db.as_mut(), self.state.as_ref());
        self.realign_branch(branch_state_root);

        match self.process_blocks(suggested, options, listener) {
            Ok(processed) if options.read_only_chain => {
                snapshot.restore(
                    self.state_db.as_mut(),
                    self.code_db.as_mut(),
                    self.state.as_mut(),
                    self.storage.as_mut(),
                )?;
                debug!(target: "processor", blocks = processed.len(), "Read-only batch rolled back");
                Ok(processed)
            }
            Ok(processed) => {
                snapshot.commit(self.state_db.as_mut(), self.code_db.as_mut())?;
                debug!(target: "processor", blocks = processed.len(), "Batch committed");
                Ok(processed)
            }
            Err(err) => {
                warn!(target: "processor", %err, "Block processing failed, restoring snapshot");
                snapshot.restore(
                    self.state_db.as_mut(),
                    self.code_db.as_mut(),
                    self.state.as_mut(),
                    self.storage.as_mut(),
                )?;
                Err(err)
            }
        }
    }

    fn process_blocks(
        &mut self,
        suggested: &[SealedBlock],
        options: ProcessingOptions,
        listener: &mut dyn TraceListener,
    ) -> Result<Vec<SealedBlock>, BlockProcessingError> {
        let mut processed = Vec::with_capacity(suggested.len());
        for block in suggested {
            processed.push(self.process_one(block, options, listener)?);
        }
        Ok(processed)
    }

    /// Processes a single block and returns the processed, sealed result.
    fn process_one(
        &mut self,
        suggested: &SealedBlock,
        options: ProcessingOptions,
        listener: &mut dyn TraceListener,
    ) -> Result<SealedBlock, BlockProcessingError> {
        if suggested.is_genesis() {
            // Genesis carries its own pre-seeded state; pass it through and
            // persist the executor's tries.
            debug!(target: "processor", hash = %suggested.hash(), "Passing through genesis block");
            let spec = self.chain_spec.spec_at(0);
            self.state.commit(&spec)?;
            self.state.commit_tree()?;
            self.storage.commit_trees()?;
            return Ok(suggested.clone())
        }

        // The suggested transactions root has been checked by the
        // pre-execution validator pass.
        debug_assert_eq!(
            proofs::calculate_transaction_root(&suggested.body),
            suggested.transactions_root,
            "suggested transactions root was not pre-validated"
        );

        trace!(target: "processor", number = suggested.number(), hash = %suggested.hash(), "Processing block");

        self.apply_dao_fork(suggested.number())?;

        let spec = self.chain_spec.spec_at(suggested.number());
        let mut header = build_working_header(suggested);

        let receipts = self.execute_transactions(suggested, &header, listener)?;

        self.apply_receipts(&mut header, &receipts, &spec);

        self.apply_rewards(suggested, &spec)?;

        self.state.commit(&spec)?;
        header.state_root = self.state.state_root();
        header.transactions_root = suggested.transactions_root;

        let processed =
            SealedBlock::new(header.seal_slow(), suggested.body.clone(), suggested.ommers.clone());

        if !options.read_only_chain && !options.no_validation {
            if !self.validator.validate_processed_block(&processed, suggested) {
                return Err(BlockProcessingError::InvalidBlock {
                    number: suggested.number(),
                    hash: suggested.hash(),
                })
            }
        }

        if options.store_receipts {
            let block_hash = processed.hash();
            for mut receipt in receipts {
                receipt.block_hash = Some(block_hash);
                let tx_hash = receipt.tx_hash;
                self.receipt_store.store_processed_transaction(tx_hash, receipt)?;
            }
        }

        self.state.commit_tree()?;
        self.storage.commit_trees()?;

        Ok(processed)
    }

    /// Repoints the in-memory state at the requested branch root, discarding
    /// uncommitted writes. A no-op when the root is absent or already current.
    fn realign_branch(&mut self, branch_state_root: Option<B256>) {
        let Some(root) = branch_state_root else { return };
        if root == self.state.state_root() {
            return
        }
        debug!(
            target: "processor",
            current = %self.state.state_root(),
            requested = %root,
            "Realigning state to branch root"
        );
        self.storage.reset();
        self.state.reset();
        self.state.set_state_root(root);
    }

    /// Runs every transaction of the block through the executor, in order.
    fn execute_transactions(
        &mut self,
        block: &SealedBlock,
        header: &Header,
        listener: &mut dyn TraceListener,
    ) -> Result<Vec<Receipt>, BlockProcessingError> {
        let mut receipts = Vec::with_capacity(block.body.len());
        for (index, transaction) in block.body.iter().enumerate() {
            let hash = transaction.hash.ok_or(BlockProcessingError::InvalidTransaction {
                block_number: block.number(),
                index,
            })?;
            let should_trace = listener.should_trace(&hash);
            let outcome = self.executor.execute(
                self.state.as_mut(),
                self.storage.as_mut(),
                index,
                transaction,
                header,
                should_trace,
            )?;
            if should_trace {
                if let Some(collected) = outcome.trace {
                    listener.record_trace(&hash, collected);
                }
            }
            trace!(
                target: "processor",
                %hash,
                index,
                gas = outcome.receipt.cumulative_gas_used,
                "Executed transaction"
            );
            receipts.push(outcome.receipt);
        }
        Ok(receipts)
    }

    /// Derives the receipts root and logs bloom from the block's receipts and
    /// writes them onto the working header.
    fn apply_receipts(&self, header: &mut Header, receipts: &[Receipt], spec: &ForkSpec) {
        header.receipts_root = proofs::calculate_receipt_root(receipts, spec.is_eip658_enabled);
        header.logs_bloom = proofs::calculate_logs_bloom(receipts);
    }

    /// Applies the consensus rewards for the block, creating recipient
    /// accounts as needed.
    fn apply_rewards(
        &mut self,
        block: &SealedBlock,
        spec: &ForkSpec,
    ) -> Result<(), ProviderError> {
        for reward in self.reward_calculator.calculate_rewards(block) {
            trace!(
                target: "processor",
                address = %reward.address,
                value = %reward.value,
                kind = ?reward.kind,
                "Applying reward"
            );
            if self.state.account_exists(reward.address)? {
                self.state.add_to_balance(reward.address, reward.value, spec)?;
            } else {
                self.state.create_account(reward.address, reward.value)?;
            }
        }
        Ok(())
    }

    /// Performs the DAO balance migration when the block is the transition
    /// block. Runs before any transaction of that block.
    fn apply_dao_fork(&mut self, number: BlockNumber) -> Result<(), ProviderError> {
        let Some(dao) = self.chain_spec.dao_fork().filter(|dao| dao.activation_block == number)
        else {
            return Ok(())
        };

        info!(target: "processor", block = number, "Applying DAO hardfork balance migration");
        let spec = self.chain_spec.spec_at(number);

        let mut drained = U256::ZERO;
        for address in &dao.drained_accounts {
            let balance = self.state.balance(*address)?;
            self.state.subtract_from_balance(*address, balance, &spec)?;
            drained += balance;
        }

        if self.state.account_exists(dao.beneficiary)? {
            self.state.add_to_balance(dao.beneficiary, drained, &spec)?;
        } else {
            self.state.create_account(dao.beneficiary, drained)?;
        }
        Ok(())
    }
}

/// Reconstructs a working header from the suggested one, without trusting the
/// fields the pipeline recomputes.
fn build_working_header(suggested: &SealedBlock) -> Header {
    Header {
        parent_hash: suggested.parent_hash,
        ommers_hash: suggested.ommers_hash,
        beneficiary: suggested.beneficiary,
        state_root: B256::ZERO,
        transactions_root: B256::ZERO,
        receipts_root: B256::ZERO,
        logs_bloom: Default::default(),
        difficulty: suggested.difficulty,
        number: suggested.number,
        gas_limit: suggested.gas_limit,
        gas_used: suggested.gas_used,
        timestamp: suggested.timestamp,
        extra_data: suggested.extra_data.clone(),
        mix_hash: suggested.mix_hash,
        nonce: suggested.nonce,
        base_fee_per_gas: suggested.base_fee_per_gas,
    }
}
