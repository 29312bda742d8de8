//! Repair-packet framing.
//!
//! Repair packets are deliberately isomorphic to short-header data
//! packets: both share the same header layout, and a repair packet
//! overwrites the last four header bytes (otherwise reserved) with
//! `nss`, `repair_key`, and a truncated `fss_esi`. This lets a repair
//! packet be built and sent through the exact same datagram path as a
//! regular short-header packet, grounded on
//! `examples/original_source/src/aioquic/quic/packet_builder.py`'s
//! `build_repair_packet`/`_end_packet`/`start_packet`, with the Rust
//! surface (`PacketType`, header struct, `serialize`) following
//! `rust/core/src/quic_packet.rs`'s framing style.

use crate::error::PacketError;

/// Distinguishes a short-header data packet from a repair packet. Both
/// share the same on-wire header layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketType {
    Short = 0x40,
    Repair = 0x41,
}

impl PacketType {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x40 => Some(PacketType::Short),
            0x41 => Some(PacketType::Repair),
            _ => None,
        }
    }
}

pub fn is_repair_header(packet_type: PacketType) -> bool {
    packet_type == PacketType::Repair
}

pub fn is_long_header(first_byte: u8) -> bool {
    first_byte & 0x80 != 0
}

/// Minimal stand-in for the 1-RTT AEAD keys a real QUIC stack would
/// supply. This crate treats sealing/opening as an external concern
/// (spec.md's "out of scope" boundary) and only needs a seam to call
/// through.
pub trait CryptoContext {
    fn seal(&mut self, packet_number: u64, header: &[u8], payload: &[u8]) -> Vec<u8>;
    fn open(&mut self, packet_number: u64, header: &[u8], payload: &[u8]) -> Result<Vec<u8>, PacketError>;
}

/// A `CryptoContext` that performs no encryption, for tests and for
/// running this crate's FEC layer ahead of a real AEAD implementation.
pub struct NullCrypto;

impl CryptoContext for NullCrypto {
    fn seal(&mut self, _packet_number: u64, _header: &[u8], payload: &[u8]) -> Vec<u8> {
        payload.to_vec()
    }

    fn open(&mut self, _packet_number: u64, _header: &[u8], payload: &[u8]) -> Result<Vec<u8>, PacketError> {
        Ok(payload.to_vec())
    }
}

/// Builds and parses short-header/repair datagrams for one connection
/// side. Owns the peer connection id and the rolling packet-number
/// counter, and records the last finalized short-header payload for the
/// FEC encoder to pick up.
pub struct PacketBuilder {
    peer_cid: Vec<u8>,
    next_packet_number: u64,
    pub current_short_header_packet_payload: Option<Vec<u8>>,
    pub current_short_header_packet_num: u64,
}

impl PacketBuilder {
    pub fn new(peer_cid: Vec<u8>) -> Self {
        Self {
            peer_cid,
            next_packet_number: 0,
            current_short_header_packet_payload: None,
            current_short_header_packet_num: 0,
        }
    }

    fn header_size(&self) -> usize {
        3 + 2 + self.peer_cid.len()
    }

    /// Builds one short-header data packet and advances the packet
    /// number. Records the plaintext payload so a `FecEncoder` can pick
    /// it up via `on_short_header_packet`.
    pub fn build_short_header_packet(
        &mut self,
        crypto: &mut dyn CryptoContext,
        payload: &[u8],
    ) -> (u64, Vec<u8>) {
        let packet_number = self.next_packet_number;
        self.next_packet_number += 1;

        let header_size = self.header_size();
        let mut header = vec![0u8; header_size];
        header[0] = PacketType::Short as u8;
        header[1..1 + self.peer_cid.len()].copy_from_slice(&self.peer_cid);
        header[header_size - 2..].copy_from_slice(&(packet_number as u16).to_be_bytes());

        let sealed = crypto.seal(packet_number, &header, payload);
        let mut out = header;
        out.extend_from_slice(&sealed);

        self.current_short_header_packet_payload = Some(payload.to_vec());
        self.current_short_header_packet_num = packet_number;

        (packet_number, out)
    }

    /// Builds a repair packet carrying `payload`, overwriting the last
    /// four header bytes with `nss`, `repair_key`, and a truncated
    /// `fss_esi`, per the layout comment in `build_repair_packet`.
    pub fn build_repair_packet(
        &mut self,
        crypto: &mut dyn CryptoContext,
        fss_esi: u64,
        nss: u8,
        repair_key: u8,
        payload: &[u8],
    ) -> Vec<u8> {
        let header_size = self.header_size();
        let mut header = vec![0u8; header_size];
        header[0] = PacketType::Repair as u8;
        header[1..1 + self.peer_cid.len()].copy_from_slice(&self.peer_cid);

        header[header_size - 4] = nss;
        header[header_size - 3] = repair_key;
        header[header_size - 2..].copy_from_slice(&(fss_esi as u16).to_be_bytes());

        let sealed = crypto.seal(fss_esi, &header, payload);
        let mut out = header;
        out.extend_from_slice(&sealed);
        out
    }

    /// Parses a received datagram's type and header length, without
    /// opening the sealed payload.
    pub fn peek_header(&self, data: &[u8]) -> Result<(PacketType, usize), PacketError> {
        let header_size = self.header_size();
        if data.len() < header_size {
            return Err(PacketError::Truncated);
        }
        let packet_type =
            PacketType::from_byte(data[0]).ok_or(PacketError::UnknownPacketType(data[0]))?;
        Ok((packet_type, header_size))
    }
}

impl crate::fec::RepairPacketSink for PacketBuilder {
    fn build_repair_packet(
        &mut self,
        crypto: &mut dyn CryptoContext,
        fss_esi: u64,
        nss: u8,
        repair_key: u8,
        payload: &[u8],
    ) {
        PacketBuilder::build_repair_packet(self, crypto, fss_esi, nss, repair_key, payload);
    }
}
