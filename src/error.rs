use thiserror::Error;

/// Failures surfaced by the FEC subsystem above the solver's own
/// [`crate::fec::SolveError`] (which is an expected, retryable outcome,
/// not an error in this enum).
#[derive(Debug, Error)]
pub enum FecError {
    #[error("malformed repair symbol: {0}")]
    MalformedRepairSymbol(String),
}

/// Failures from parsing or building wire packets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("packet shorter than its header")]
    Truncated,
    #[error("unknown packet type byte 0x{0:02x}")]
    UnknownPacketType(u8),
}

/// Failures loading configuration from TOML.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
