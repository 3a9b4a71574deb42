use serde::{Deserialize, Serialize};
use std::fmt;

/// The name of an Ethereum hardfork.
///
/// Ordered chronologically, which makes the enum usable as a `BTreeMap` key
/// for the activation schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Hardfork {
    /// Frontier: the original protocol rules.
    Frontier,
    /// Homestead.
    Homestead,
    /// The DAO fork: a one-block irregular state change.
    Dao,
    /// Tangerine Whistle (EIP-150).
    Tangerine,
    /// Spurious Dragon (EIP-155/158/161/170).
    SpuriousDragon,
    /// Byzantium, including the EIP-658 receipt status code.
    Byzantium,
    /// Constantinople.
    Constantinople,
    /// Petersburg.
    Petersburg,
    /// Istanbul.
    Istanbul,
    /// Muir Glacier.
    MuirGlacier,
    /// Berlin.
    Berlin,
    /// London, including EIP-1559.
    London,
    /// Arrow Glacier.
    ArrowGlacier,
    /// Gray Glacier.
    GrayGlacier,
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardforks_are_chronologically_ordered() {
        assert!(Hardfork::Frontier < Hardfork::Homestead);
        assert!(Hardfork::SpuriousDragon < Hardfork::Byzantium);
        assert!(Hardfork::Byzantium < Hardfork::Constantinople);
        assert!(Hardfork::London < Hardfork::GrayGlacier);
    }
}
