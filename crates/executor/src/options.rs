use std::ops::{BitOr, BitOrAssign};

/// Options controlling how a batch of blocks is processed and disposed of.
///
/// Flags are independent and combinable with `|`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Always roll the batch back after processing; the returned blocks are
    /// the only output.
    pub read_only_chain: bool,
    /// Skip post-execution validation of processed blocks.
    pub no_validation: bool,
    /// Persist receipts to the transaction store.
    pub store_receipts: bool,
}

impl ProcessingOptions {
    /// No options set.
    pub const NONE: Self =
        Self { read_only_chain: false, no_validation: false, store_receipts: false };

    /// Roll back after processing.
    pub const READ_ONLY_CHAIN: Self =
        Self { read_only_chain: true, no_validation: false, store_receipts: false };

    /// Skip post-execution validation.
    pub const NO_VALIDATION: Self =
        Self { read_only_chain: false, no_validation: true, store_receipts: false };

    /// Persist receipts.
    pub const STORE_RECEIPTS: Self =
        Self { read_only_chain: false, no_validation: false, store_receipts: true };
}

impl BitOr for ProcessingOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            read_only_chain: self.read_only_chain || rhs.read_only_chain,
            no_validation: self.no_validation || rhs.no_validation,
            store_receipts: self.store_receipts || rhs.store_receipts,
        }
    }
}

impl BitOrAssign for ProcessingOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_independently() {
        let options = ProcessingOptions::READ_ONLY_CHAIN | ProcessingOptions::STORE_RECEIPTS;
        assert!(options.read_only_chain);
        assert!(options.store_receipts);
        assert!(!options.no_validation);

        let mut options = ProcessingOptions::NONE;
        options |= ProcessingOptions::NO_VALIDATION;
        assert_eq!(options, ProcessingOptions::NO_VALIDATION);
        assert_eq!(ProcessingOptions::default(), ProcessingOptions::NONE);
    }
}
