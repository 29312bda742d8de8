//! Sender-side FEC encoder: maintains the sliding window of recent source
//! payloads and emits repair packets at the configured pace.

use std::collections::VecDeque;

use log::debug;

use crate::config::FecConfig;
use crate::packet::CryptoContext;

use super::coeffs::gen_coeffs;
use super::linear::linear_combination;

/// Narrow callback the packet builder implements so the encoder never
/// reaches into the builder's internal buffers (Design Notes: "Encoder
/// coupling to the packet builder").
pub trait RepairPacketSink {
    fn build_repair_packet(
        &mut self,
        crypto: &mut dyn CryptoContext,
        fss_esi: u64,
        nss: u8,
        repair_key: u8,
        payload: &[u8],
    );
}

/// Sender-side encoding window and pacing state.
pub struct FecEncoder {
    config: FecConfig,
    window: VecDeque<Vec<u8>>,
    last_packet_num: Option<u64>,
    src_cnt: u32,
    repair_key: u8,
}

impl FecEncoder {
    pub fn new(config: FecConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.ew_size as usize),
            config,
            last_packet_num: None,
            src_cnt: 0,
            repair_key: 0,
        }
    }

    /// Call once per finalized short-header packet, with a copy of its
    /// plaintext payload. Idempotent on repeated calls with the same
    /// `packet_number` (spec.md P8).
    pub fn on_short_header_packet(
        &mut self,
        packet_number: u64,
        payload: &[u8],
        sink: &mut dyn RepairPacketSink,
        crypto: &mut dyn CryptoContext,
    ) {
        if self.last_packet_num == Some(packet_number) {
            return;
        }

        self.window.push_back(payload.to_vec());
        self.last_packet_num = Some(packet_number);
        self.src_cnt += 1;

        while self.window.len() > self.config.ew_size as usize {
            self.window.pop_front();
        }

        if self.window.len() == self.config.ew_size as usize && self.src_cnt >= self.config.fec_pace
        {
            self.src_cnt = 0;
            for _ in 0..self.config.num_repair {
                self.emit_repair(sink, crypto);
            }
        }
    }

    fn emit_repair(&mut self, sink: &mut dyn RepairPacketSink, crypto: &mut dyn CryptoContext) {
        let repair_key = self.repair_key;
        self.repair_key = self.repair_key.wrapping_add(1);

        let fss_esi = self
            .last_packet_num
            .expect("emit_repair only called once a source has been recorded");
        let nss = self.window.len() as u8;

        let coeffs = gen_coeffs(repair_key, nss as usize, self.config.fec_max_density);
        let refs: Vec<&[u8]> = self.window.iter().map(|v| v.as_slice()).collect();
        let payload = linear_combination(&refs, &coeffs);

        debug!(
            "fec encoder: emitting repair fss_esi={} nss={} repair_key={}",
            fss_esi, nss, repair_key
        );
        sink.build_repair_packet(crypto, fss_esi, nss, repair_key, &payload);
    }
}
