//! Wire-level symbol types exchanged between the encoder and recoverer.
//!
//! The original implementation conflated "source symbol", "repair
//! symbol" and "not yet received" via runtime type checks on a single
//! list. Here they are distinct types, and the receiver's sparse window
//! holds an explicit `Slot` sum type rather than `Option<dyn Any>`.

/// A decrypted short-header packet payload, keyed by packet number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSymbol {
    pub packet_number: u64,
    pub data: Vec<u8>,
}

/// A repair payload: a GF(256) linear combination over the protected
/// window, plus the metadata needed to regenerate its coding vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairSymbol {
    /// Packet number of the newest source symbol in the protected window.
    pub fss_esi: u64,
    /// Number of source symbols in the protected window.
    pub nss: u8,
    /// 8-bit PRNG seed identifying this repair symbol within its batch.
    pub repair_key: u8,
    /// The linear-combination payload.
    pub data: Vec<u8>,
}

/// One slot in the receiver's sparse source-symbol window.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Source(SourceSymbol),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn as_source(&self) -> Option<&SourceSymbol> {
        match self {
            Slot::Source(s) => Some(s),
            Slot::Empty => None,
        }
    }
}
