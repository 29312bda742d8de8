//! Runtime configuration, loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for the windowed GF(256) FEC scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FecConfig {
    /// Number of source payloads kept in the sender's encoding window.
    pub ew_size: u8,
    /// Source packets between batches of repair packets.
    pub fec_pace: u32,
    /// Repair packets emitted per batch.
    pub num_repair: u32,
    /// Upper bound on the fraction of rows used in dense coefficient
    /// generation (out of 255); see `coeffs::gen_coeffs`.
    pub fec_max_density: u8,
}

impl Default for FecConfig {
    fn default() -> Self {
        Self {
            ew_size: 5,
            fec_pace: 2,
            num_repair: 2,
            fec_max_density: crate::fec::FEC_MAX_DENSITY,
        }
    }
}

impl FecConfig {
    /// Parses a `[fec]` table out of a TOML document, falling back to
    /// defaults for any field left unspecified.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default)]
            fec: FecConfig,
        }
        let wrapper: Wrapper = toml::from_str(input)?;
        Ok(wrapper.fec)
    }

    /// Loads configuration from a TOML file on disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
