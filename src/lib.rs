// QuicFuscate FEC Library
//
// A windowed GF(256) forward error correction scheme for QUIC
// short-header packets: sender-side repair generation, receiver-side
// buffering and Gaussian-elimination recovery, and the wire framing
// that lets repair packets travel the same datagram path as data.

pub mod config;
pub mod error;
pub mod fec;
pub mod packet;

pub use config::FecConfig;
pub use error::{ConfigError, FecError, PacketError};
